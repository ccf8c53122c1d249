use serde_json::Value;

use crate::{
    core::models::{
        CharacterRow,
        NewsItem,
    },
    schema::DefRow,
};

/// Everything a background task can report back to the UI thread. Errors
/// cross the channel as strings; the UI only ever shows them.
#[derive(Debug)]
pub enum TaskResult {
    CharactersLoaded(Result<Vec<CharacterRow>, String>),
    FieldDefsLoaded(Result<Vec<DefRow>, String>),
    TagDefsLoaded(Result<Vec<DefRow>, String>),
    /// Best-effort: a failed news fetch arrives as an empty list.
    NewsLoaded(Vec<NewsItem>),

    CharactersReloaded(Result<Vec<CharacterRow>, String>),
    GuestTagsUpdated(Result<(), String>),

    EditDataLoaded(Result<Value, String>),
    SubmissionComplete { updating: bool, result: Result<(), String> },

    InquirySent(Result<String, String>),
    InquiryResolved(Result<(), String>),
}
