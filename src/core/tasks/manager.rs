use std::{
    collections::BTreeMap,
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use serde_json::Value;
use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    api::ApiClient,
    core::models::Tag,
};

/// Runs network work off the UI thread. Results come back over a channel
/// and are drained once per frame; the UI never blocks on a request.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));
        let (sender, receiver) = mpsc::channel();
        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }
        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// Startup fan-out: the four fetches are issued together with no
    /// ordering dependency. The entity list and field schema gate the
    /// initial render; tag schema and news degrade to empty on failure.
    pub fn load_initial_data(&self, api: ApiClient) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            runtime.block_on(async {
                let (list, defs, tag_defs, news) = tokio::join!(
                    api.get_all_data(),
                    api.get_defs(),
                    api.get_tags_defs(),
                    api.get_news(),
                );

                let _ = sender.send(TaskResult::CharactersLoaded(list.map_err(|e| e.to_string())));
                let _ = sender.send(TaskResult::FieldDefsLoaded(defs.map_err(|e| e.to_string())));
                let _ =
                    sender.send(TaskResult::TagDefsLoaded(tag_defs.map_err(|e| e.to_string())));
                let _ = sender.send(TaskResult::NewsLoaded(news.unwrap_or_else(|e| {
                    eprintln!("[API] news fetch failed, continuing without: {}", e);
                    Vec::new()
                })));
            });
        });
    }

    /// Full list reload after a mutation; no local patching.
    pub fn reload_characters(&self, api: ApiClient) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result =
                runtime.block_on(async { api.get_all_data().await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::CharactersReloaded(result));
        });
    }

    pub fn update_guest_tags(&self, api: ApiClient, id: String, tags: BTreeMap<String, Vec<Tag>>) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime
                .block_on(async { api.update_guest_tags(&id, &tags).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::GuestTagsUpdated(result));
        });
    }

    pub fn load_edit_data(&self, api: ApiClient, id: String, password: String) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime
                .block_on(async { api.get_edit_data(&id, &password).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::EditDataLoaded(result));
        });
    }

    pub fn submit_entry(&self, api: ApiClient, payload: Value, updating: bool) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                let call = if updating { api.update(payload).await } else { api.register(payload).await };
                call.map_err(|e| e.to_string())
            });
            let _ = sender.send(TaskResult::SubmissionComplete { updating, result });
        });
    }

    pub fn send_inquiry(&self, api: ApiClient, char_id: String, message: String) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime
                .block_on(async { api.send_inquiry(&char_id, &message).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::InquirySent(result));
        });
    }

    pub fn resolve_inquiry(&self, api: ApiClient, inquiry_id: String, message: String) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                api.resolve_inquiry(&inquiry_id, &message).await.map_err(|e| e.to_string())
            });
            let _ = sender.send(TaskResult::InquiryResolved(result));
        });
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}
