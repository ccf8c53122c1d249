use eframe::egui;

use super::{
    detail_modal::{
        DetailAction,
        DetailModal,
    },
    error_modal::ErrorModal,
    message_overlay::MessageOverlay,
    news_banner::NewsBanner,
    register_modal::{
        RegisterAction,
        RegisterModal,
    },
    settings::SettingsData,
    table::{
        character_table,
        ListState,
    },
    tag_editor_modal::{
        TagEditorAction,
        TagEditorModal,
    },
    theme::{
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
    },
};
use crate::{
    api::ApiClient,
    core::{
        cache::CharacterCache,
        tasks::{
            TaskManager,
            TaskResult,
        },
        NewsItem,
    },
    persistence::{
        load_json_or_default,
        save_json,
    },
    schema::{
        build_field_schema,
        build_tag_schema,
        FieldSchema,
        SchemaIssue,
        TagSchema,
    },
};

pub struct Modals {
    pub detail: DetailModal,
    pub tag_editor: TagEditorModal,
    pub register: RegisterModal,
    pub error: ErrorModal,
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            detail: DetailModal::new(),
            tag_editor: TagEditorModal::new(),
            register: RegisterModal::new(),
            error: ErrorModal::new(),
        }
    }
}

/// The whole application state, owned in one place: cache, schemas, list
/// view state, modals, and the background task manager.
pub struct ChardexApp {
    api: Option<ApiClient>,

    // Session data
    pub cache: CharacterCache,
    pub field_schema: FieldSchema,
    pub tag_schema: TagSchema,
    pub news: Vec<NewsItem>,

    // Startup progress. The list and the field schema gate the first
    // render; tag schema and news are best-effort.
    list_loaded: bool,
    defs_loaded: bool,
    pub load_error: Option<String>,
    reloading: bool,

    // Configuration
    pub settings: SettingsData,

    // UI state
    pub list_state: ListState,
    pub theme: Theme,
    pub message_overlay: MessageOverlay,
    pub news_banner: NewsBanner,
    pub modals: Modals,

    task_manager: TaskManager,
}

impl ChardexApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = load_json_or_default::<SettingsData>("settings.json");
        let theme = Theme::paddock();

        set_theme(&cc.egui_ctx, theme.clone());

        // Apply the saved theme preference.
        cc.egui_ctx.set_theme(if settings.dark_mode {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        });
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = if settings.dark_mode {
                egui::ThemePreference::Dark
            } else {
                egui::ThemePreference::Light
            };
        });

        let task_manager = TaskManager::new();
        let mut message_overlay = MessageOverlay::new();
        let mut load_error = None;

        let api = if settings.api_url.is_empty() {
            load_error = Some(
                "The API endpoint is not configured. Set \"api_url\" in settings.json.".to_string(),
            );
            None
        } else {
            Some(ApiClient::new(&settings.api_url))
        };

        if let Some(api) = &api {
            println!("[API] endpoint: {}", api.endpoint());
            task_manager.load_initial_data(api.clone());
            message_overlay.set_message("Loading registry…".to_string());
        }

        Self {
            api,
            cache: CharacterCache::default(),
            field_schema: FieldSchema::default(),
            tag_schema: TagSchema::default(),
            news: Vec::new(),
            list_loaded: false,
            defs_loaded: false,
            load_error,
            reloading: false,
            settings,
            list_state: ListState::default(),
            theme,
            message_overlay,
            news_banner: NewsBanner::new(),
            modals: Modals::default(),
            task_manager,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.list_loaded && self.defs_loaded
    }

    pub fn open_detail(&mut self, index: usize) {
        if let Some(character) = self.cache.get(index) {
            self.modals.detail.open(character.clone());
        }
    }

    fn save_settings(&self) {
        if let Err(e) = save_json(&self.settings, "settings.json") {
            eprintln!("Failed to save settings: {}", e);
        }
    }

    fn log_schema_issues(kind: &str, issues: &[SchemaIssue]) {
        for issue in issues {
            println!("[Schema] {}: {}", kind, issue);
        }
    }

    fn finish_loading_step(&mut self) {
        if self.is_ready() || self.load_error.is_some() {
            self.message_overlay.clear_message();
        }
    }

    fn reload_characters(&mut self) {
        if let Some(api) = self.api.clone() {
            self.reloading = true;
            self.task_manager.reload_characters(api);
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::CharactersLoaded(result) => {
                match result {
                    Ok(rows) => {
                        self.cache.load(rows);
                        self.list_loaded = true;
                        self.list_state.mark_dirty();
                    }
                    Err(error) => self.load_error = Some(error),
                }
                self.finish_loading_step();
            }

            TaskResult::FieldDefsLoaded(result) => {
                match result {
                    Ok(rows) => {
                        let (schema, issues) = build_field_schema(&rows);
                        Self::log_schema_issues("field defs", &issues);
                        self.field_schema = schema;
                        self.defs_loaded = true;
                    }
                    Err(error) => self.load_error = Some(error),
                }
                self.finish_loading_step();
            }

            TaskResult::TagDefsLoaded(result) => match result {
                Ok(rows) => {
                    let (schema, issues) = build_tag_schema(&rows);
                    Self::log_schema_issues("tag defs", &issues);
                    self.tag_schema = schema;
                }
                Err(error) => {
                    // Best-effort: tag editing degrades, the list still works.
                    eprintln!("[API] tag defs fetch failed, tag editing disabled: {}", error);
                    self.tag_schema = TagSchema::default();
                }
            },

            TaskResult::NewsLoaded(items) => {
                self.news = items;
            }

            TaskResult::CharactersReloaded(result) => {
                self.reloading = false;
                match result {
                    Ok(rows) => {
                        self.cache.load(rows);
                        self.list_state.mark_dirty();
                        self.modals.detail.refresh(&self.cache);
                    }
                    Err(error) => {
                        self.modals.error.show_error(
                            "Refresh Error",
                            "Unable to reload the character list",
                            Some(&error),
                        );
                    }
                }
            }

            TaskResult::GuestTagsUpdated(result) => {
                let succeeded = result.is_ok();
                self.modals.tag_editor.save_finished(result);
                if succeeded {
                    println!("[Tags] updated, reloading list");
                    self.reload_characters();
                }
            }

            TaskResult::EditDataLoaded(result) => {
                self.modals.register.auth_finished(result);
            }

            TaskResult::SubmissionComplete { updating, result } => {
                let succeeded = result.is_ok();
                self.modals.register.submission_finished(result);
                if succeeded {
                    println!(
                        "[API] {} complete, reloading list",
                        if updating { "update" } else { "registration" }
                    );
                    self.reload_characters();
                }
            }

            TaskResult::InquirySent(result) => {
                self.modals.register.inquiry_finished(result);
            }

            TaskResult::InquiryResolved(result) => {
                self.modals.register.resolve_finished(result);
            }
        }
    }

    fn handle_top_bar_action(&mut self, action: TopBarAction) {
        match action {
            TopBarAction::NewEntry => {
                self.modals.register.open_new(&self.field_schema);
            }
            TopBarAction::Refresh => {
                self.reload_characters();
            }
            TopBarAction::ImportBackup(path) => {
                let parsed = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|text| {
                        serde_json::from_str::<serde_json::Value>(&text).map_err(|e| e.to_string())
                    });
                match parsed {
                    Ok(data) => {
                        self.modals.register.open_import(&self.field_schema, &data);
                    }
                    Err(error) => {
                        self.modals.error.show_error(
                            "Import Error",
                            "Could not read the backup file. Pick a backup exported by this app.",
                            Some(&error),
                        );
                    }
                }
            }
        }
    }

    fn sync_theme_preference(&mut self, ctx: &egui::Context) {
        let dark_mode = ctx.style().visuals.dark_mode;
        if dark_mode != self.settings.dark_mode {
            self.settings.dark_mode = dark_mode;
            self.save_settings();
        }
    }
}

impl eframe::App for ChardexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        self.sync_theme_preference(ctx);

        if let Some(action) = TopBar::show(ctx, self.is_ready(), self.reloading, self.cache.len()) {
            self.handle_top_bar_action(action);
        }

        let news = std::mem::take(&mut self.news);
        self.news_banner.show(ctx, &news, &self.theme);
        self.news = news;

        character_table(ctx, self);

        if let Some(action) =
            self.modals.detail.show(ctx, &self.theme, &self.field_schema, &self.tag_schema)
        {
            match action {
                DetailAction::EditEntry(id) => {
                    self.modals.register.open_edit(&self.field_schema, id);
                }
                DetailAction::EditTags(id) => {
                    if let Some(character) = self.cache.get_by_id(&id) {
                        let character = character.clone();
                        self.modals.tag_editor.open(&character, &self.tag_schema);
                    }
                }
            }
        }

        if let Some(TagEditorAction::Save { id, tags }) =
            self.modals.tag_editor.show(ctx, &self.theme)
        {
            if let Some(api) = self.api.clone() {
                self.task_manager.update_guest_tags(api, id, tags);
            }
        }

        if let Some(action) = self.modals.register.show(ctx, &self.theme) {
            if let Some(api) = self.api.clone() {
                match action {
                    RegisterAction::Submit { payload, updating } => {
                        self.task_manager.submit_entry(api, payload, updating);
                    }
                    RegisterAction::Authenticate { id, password } => {
                        self.task_manager.load_edit_data(api, id, password);
                    }
                    RegisterAction::SendInquiry { char_id, message } => {
                        self.task_manager.send_inquiry(api, char_id, message);
                    }
                    RegisterAction::ResolveInquiry { inquiry_id, message } => {
                        self.task_manager.resolve_inquiry(api, inquiry_id, message);
                    }
                }
            }
        }

        self.message_overlay.show(ctx, &self.theme);
        self.modals.error.show(ctx);
    }
}
