//! Remote gateway: every exchange with the registry is a POST of
//! `{ "action": ..., "payload": ... }` against one endpoint. The response
//! carries a `status` field plus action-specific data; a non-2xx transport
//! response and a non-"success" status are the same failure as far as the
//! client is concerned. No retries, no backoff.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{
    json,
    Value,
};

use crate::{
    core::models::{
        CharacterRow,
        NewsItem,
        Tag,
    },
    core::ChardexError,
    schema::DefRow,
};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ApiClient { client: Client::new(), endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, action: &str, payload: Value) -> Result<Value, ChardexError> {
        let body = json!({ "action": action, "payload": payload });
        println!("[API] request: {}", action);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ChardexError::Api(format!("HTTP {} from '{}'", response.status(), action)));
        }

        let value: Value = response.json().await?;
        check_envelope(action, value)
    }

    pub async fn get_all_data(&self) -> Result<Vec<CharacterRow>, ChardexError> {
        extract(self.call("getAllData", json!({})).await?, "list")
    }

    pub async fn get_defs(&self) -> Result<Vec<DefRow>, ChardexError> {
        extract(self.call("getDefs", json!({})).await?, "defs")
    }

    pub async fn get_tags_defs(&self) -> Result<Vec<DefRow>, ChardexError> {
        extract(self.call("getTagsDefs", json!({})).await?, "defs")
    }

    pub async fn get_news(&self) -> Result<Vec<NewsItem>, ChardexError> {
        extract(self.call("getNews", json!({})).await?, "news")
    }

    /// Full replacement of one entity's tag mapping. Categories missing
    /// from `tags` are emptied server-side.
    pub async fn update_guest_tags(
        &self,
        id: &str,
        tags: &BTreeMap<String, Vec<Tag>>,
    ) -> Result<(), ChardexError> {
        self.call("updateGuestTags", json!({ "id": id, "tags": tags })).await.map(|_| ())
    }

    /// Password-gated fetch of the full editable record.
    pub async fn get_edit_data(&self, id: &str, password: &str) -> Result<Value, ChardexError> {
        extract(self.call("getEditData", json!({ "id": id, "password": password })).await?, "data")
    }

    pub async fn register(&self, payload: Value) -> Result<(), ChardexError> {
        self.call("register", payload).await.map(|_| ())
    }

    pub async fn update(&self, payload: Value) -> Result<(), ChardexError> {
        self.call("update", payload).await.map(|_| ())
    }

    pub async fn send_inquiry(&self, char_id: &str, message: &str) -> Result<String, ChardexError> {
        extract(
            self.call("sendInquiry", json!({ "char_id": char_id, "message": message })).await?,
            "inquiry_id",
        )
    }

    pub async fn resolve_inquiry(&self, inquiry_id: &str, message: &str) -> Result<(), ChardexError> {
        self.call("resolveInquiry", json!({ "inquiry_id": inquiry_id, "message": message }))
            .await
            .map(|_| ())
    }
}

fn check_envelope(action: &str, value: Value) -> Result<Value, ChardexError> {
    match value.get("status").and_then(Value::as_str) {
        Some("success") => Ok(value),
        _ => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("the server reported an error");
            Err(ChardexError::Api(format!("{}: {}", action, message)))
        }
    }
}

fn extract<T: DeserializeOwned>(mut value: Value, field: &'static str) -> Result<T, ChardexError> {
    let field_value = match value.get_mut(field) {
        Some(field_value) => field_value.take(),
        None => return Err(ChardexError::MissingField(field)),
    };
    Ok(serde_json::from_value(field_value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_passes_through() {
        let value = json!({ "status": "success", "list": [] });
        assert!(check_envelope("getAllData", value).is_ok());
    }

    #[test]
    fn non_success_status_surfaces_the_server_message() {
        let value = json!({ "status": "error", "message": "wrong password" });
        let error = check_envelope("getEditData", value).unwrap_err();
        assert_eq!(error.to_string(), "API error: getEditData: wrong password");
    }

    #[test]
    fn missing_status_is_a_failure_too() {
        let error = check_envelope("getDefs", json!({})).unwrap_err();
        assert!(error.to_string().contains("getDefs"));
    }

    #[test]
    fn extract_pulls_typed_fields() {
        let value = json!({ "status": "success", "inquiry_id": "REQ_001" });
        let id: String = extract(value, "inquiry_id").unwrap();
        assert_eq!(id, "REQ_001");
    }

    #[test]
    fn extract_reports_missing_fields() {
        let value = json!({ "status": "success" });
        let error = extract::<Vec<CharacterRow>>(value, "list").unwrap_err();
        assert!(matches!(error, ChardexError::MissingField("list")));
    }

    #[test]
    fn character_rows_deserialize_from_a_list_response() {
        let value = json!({
            "status": "success",
            "list": [
                { "id": "chr_001", "name": "Oguri Cap", "is_tag_locked": "false" }
            ]
        });
        let rows: Vec<CharacterRow> = extract(value, "list").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "chr_001");
    }
}
