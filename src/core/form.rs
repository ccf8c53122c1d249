use serde_json::{
    json,
    Map,
    Value,
};

use crate::schema::{
    FieldSchema,
    CATEGORY_SLOTS,
    FREE_ITEMS_CATEGORY,
};

/// One editable input produced from the field schema. The same binding is
/// used to populate the form on edit and to collect the value on submit.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    pub category_id: String,
    pub key: String,
    pub label: String,
    pub value: String,
}

/// User-addable label/value row in the free-items category.
#[derive(Debug, Clone, Default)]
pub struct FreeFieldRow {
    pub label: String,
    pub value: String,
}

/// Working state of the create/edit form. Bindings are laid out in the
/// fixed slot order (ext_001, ext_002, ext_003); categories outside the
/// known slots produce no bindings.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub edit_id: Option<String>,
    pub is_en_main: bool,
    pub name_kana: String,
    pub name_en: String,
    pub name_hk: String,
    pub trainer_name: String,
    pub image_url: String,
    pub password: String,
    pub bindings: Vec<FieldBinding>,
    pub free_rows: Vec<FreeFieldRow>,
}

impl FormState {
    pub fn from_schema(schema: &FieldSchema) -> Self {
        let mut bindings = Vec::new();
        for slot in &CATEGORY_SLOTS {
            if let Some(category) = schema.get(slot.id) {
                for field in &category.fields {
                    bindings.push(FieldBinding {
                        category_id: category.id.clone(),
                        key: field.key.clone(),
                        label: field.label.clone(),
                        value: String::new(),
                    });
                }
            }
        }
        FormState { bindings, ..FormState::default() }
    }

    /// Which API action a submission of this form targets.
    pub fn action(&self) -> &'static str {
        if self.edit_id.is_some() {
            "update"
        } else {
            "register"
        }
    }

    pub fn add_free_row(&mut self) {
        self.free_rows.push(FreeFieldRow::default());
    }

    pub fn remove_free_row(&mut self, index: usize) {
        if index < self.free_rows.len() {
            self.free_rows.remove(index);
        }
    }

    /// Required-field checks, nothing more: the main name (selected by
    /// `is_en_main`) and the edit password must be present.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_en_main {
            if self.name_en.trim().is_empty() {
                return Err("Name (English) is required when the English name is primary.".to_string());
            }
        } else if self.name_kana.trim().is_empty() {
            return Err("Name (kana) is required when the kana name is primary.".to_string());
        }

        if self.password.is_empty() {
            return Err("An edit password is required.".to_string());
        }

        Ok(())
    }

    /// Flat submission payload for `register`/`update`. Dynamic fields are
    /// bucketed per category and empty values dropped; free rows are kept
    /// only when both label and value are filled in.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();

        if let Some(id) = &self.edit_id {
            payload.insert("id".to_string(), json!(id));
        }
        payload.insert("is_en_main".to_string(), json!(self.is_en_main));
        payload.insert("name_kana".to_string(), json!(self.name_kana));
        payload.insert("name_en".to_string(), json!(self.name_en));
        payload.insert("name_hk".to_string(), json!(self.name_hk));
        payload.insert("trainer_name".to_string(), json!(self.trainer_name));
        payload.insert("image_url".to_string(), json!(self.image_url));
        payload.insert("password".to_string(), json!(self.password));

        for binding in &self.bindings {
            if binding.value.is_empty() {
                continue;
            }
            let category = payload
                .entry(binding.category_id.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = category {
                fields.insert(binding.key.clone(), json!(binding.value));
            }
        }

        if !self.free_rows.is_empty() {
            let free: Vec<Value> = self
                .free_rows
                .iter()
                .filter(|row| !row.label.is_empty() && !row.value.is_empty())
                .map(|row| json!({ "label": row.label, "value": row.value }))
                .collect();

            let category = payload
                .entry(FREE_ITEMS_CATEGORY.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = category {
                fields.insert("free".to_string(), Value::Array(free));
            }
        }

        Value::Object(payload)
    }

    /// Backup serialization of the submission: the password is stripped and
    /// an absent id is not written.
    pub fn export_json(&self) -> Value {
        let mut payload = self.to_payload();
        if let Value::Object(fields) = &mut payload {
            fields.remove("password");
            if fields.get("id").map_or(true, |id| id.as_str().map_or(true, str::is_empty)) {
                fields.remove("id");
            }
        }
        payload
    }

    pub fn backup_filename() -> String {
        format!("backup_{}.json", chrono::Local::now().timestamp_millis())
    }

    /// Populate the form from an edit payload (or imported backup). The
    /// password is auto-filled only when one was used to fetch the data.
    pub fn fill(&mut self, data: &Value, password: &str) {
        let text = |key: &str| -> String {
            data.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
        };

        self.is_en_main = super::models::loose_bool(data.get("is_en_main"));
        self.name_kana = text("name_kana");
        self.name_en = text("name_en");
        self.name_hk = text("name_hk");
        self.trainer_name = text("trainer_name");
        self.image_url = text("image_url");

        if !password.is_empty() {
            self.password = password.to_string();
        }

        for binding in &mut self.bindings {
            binding.value = data
                .get(&binding.category_id)
                .and_then(|category| category.get(&binding.key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
        }

        self.free_rows.clear();
        if let Some(free) = data
            .get(FREE_ITEMS_CATEGORY)
            .and_then(|category| category.get("free"))
            .and_then(Value::as_array)
        {
            for item in free {
                self.free_rows.push(FreeFieldRow {
                    label: item.get("label").and_then(Value::as_str).unwrap_or_default().to_string(),
                    value: item.get("value").and_then(Value::as_str).unwrap_or_default().to_string(),
                });
            }
        }
    }

    /// Load a backup file into the form as a fresh registration: the id is
    /// discarded, the names get a re-entry marker, and the password is
    /// cleared so a new one has to be set.
    pub fn import_backup(&mut self, data: &Value) {
        self.edit_id = None;
        self.fill(data, "");
        self.password.clear();

        if !self.name_kana.is_empty() {
            self.name_kana.push_str(" (再登録)");
        }
        if !self.name_en.is_empty() {
            self.name_en.push_str(" (Re-entry)");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::build_field_schema;

    fn schema() -> FieldSchema {
        let rows: Vec<crate::schema::DefRow> = serde_json::from_value(json!([
            { "col_id": "ext_001", "category_name": "Basic", "items": ["cv_name"] },
            { "col_id": "ext_003", "category_name": "Misc", "items": ["image_color"] },
        ]))
        .unwrap();
        build_field_schema(&rows).0
    }

    fn set_binding(form: &mut FormState, key: &str, value: &str) {
        let binding = form.bindings.iter_mut().find(|b| b.key == key).unwrap();
        binding.value = value.to_string();
    }

    #[test]
    fn bindings_follow_slot_order() {
        let form = FormState::from_schema(&schema());
        let keys: Vec<&str> = form.bindings.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["cv_name", "image_color"]);
        assert_eq!(form.bindings[0].category_id, "ext_001");
        assert_eq!(form.bindings[1].category_id, "ext_003");
    }

    #[test]
    fn half_filled_free_rows_are_dropped_from_the_payload() {
        let mut form = FormState::from_schema(&schema());
        form.name_kana = "テスト".to_string();
        form.password = "pw".to_string();
        form.free_rows = vec![
            FreeFieldRow { label: "color".to_string(), value: "red".to_string() },
            FreeFieldRow { label: String::new(), value: "blue".to_string() },
            FreeFieldRow { label: "size".to_string(), value: String::new() },
        ];

        let payload = form.to_payload();
        assert_eq!(payload["ext_003"]["free"], json!([{ "label": "color", "value": "red" }]));
    }

    #[test]
    fn missing_password_fails_validation() {
        let mut form = FormState::from_schema(&schema());
        form.name_kana = "ユキ".to_string();
        set_binding(&mut form, "cv_name", "Yuki");
        form.free_rows.push(FreeFieldRow { label: "food".to_string(), value: "taiyaki".to_string() });

        assert!(form.validate().is_err());
    }

    #[test]
    fn register_payload_shape_matches_the_wire_contract() {
        let mut form = FormState::from_schema(&schema());
        form.name_kana = "ユキ".to_string();
        set_binding(&mut form, "cv_name", "Yuki");
        form.free_rows.push(FreeFieldRow { label: "food".to_string(), value: "taiyaki".to_string() });
        form.password = "secret".to_string();

        assert!(form.validate().is_ok());
        assert_eq!(form.action(), "register");

        let payload = form.to_payload();
        assert_eq!(payload["name_kana"], "ユキ");
        assert_eq!(payload["ext_001"], json!({ "cv_name": "Yuki" }));
        assert_eq!(payload["ext_003"], json!({ "free": [{ "label": "food", "value": "taiyaki" }] }));
        assert_eq!(payload["password"], "secret");
        assert!(payload.get("id").is_none());
    }

    #[test]
    fn conditional_required_name_follows_the_main_name_flag() {
        let mut form = FormState::from_schema(&schema());
        form.password = "pw".to_string();
        form.is_en_main = true;
        form.name_kana = "カナ".to_string();
        assert!(form.validate().is_err());

        form.name_en = "Kana".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn update_action_when_editing() {
        let mut form = FormState::from_schema(&schema());
        form.edit_id = Some("chr_001".to_string());
        assert_eq!(form.action(), "update");
        assert_eq!(form.to_payload()["id"], "chr_001");
    }

    #[test]
    fn export_strips_password_and_absent_id() {
        let mut form = FormState::from_schema(&schema());
        form.name_kana = "テスト".to_string();
        form.password = "secret".to_string();

        let exported = form.export_json();
        assert!(exported.get("password").is_none());
        assert!(exported.get("id").is_none());
        assert_eq!(exported["name_kana"], "テスト");
    }

    #[test]
    fn import_resets_to_register_mode_with_reentry_marker() {
        let mut form = FormState::from_schema(&schema());
        form.edit_id = Some("chr_001".to_string());
        form.password = "old".to_string();

        form.import_backup(&json!({
            "id": "chr_001",
            "name_kana": "ユキ",
            "name_en": "Yuki",
            "ext_001": { "cv_name": "Yuki" },
            "ext_003": { "free": [{ "label": "food", "value": "taiyaki" }] }
        }));

        assert!(form.edit_id.is_none());
        assert!(form.password.is_empty());
        assert_eq!(form.name_kana, "ユキ (再登録)");
        assert_eq!(form.name_en, "Yuki (Re-entry)");
        assert_eq!(form.bindings[0].value, "Yuki");
        assert_eq!(form.free_rows.len(), 1);
        assert_eq!(form.action(), "register");
    }

    #[test]
    fn fill_populates_bindings_and_free_rows() {
        let mut form = FormState::from_schema(&schema());
        form.fill(
            &json!({
                "is_en_main": "true",
                "name_en": "Gold Ship",
                "ext_001": { "cv_name": "Ueda" },
                "ext_003": { "image_color": "white", "free": [{ "label": "quirk", "value": "unpredictable" }] }
            }),
            "pw",
        );

        assert!(form.is_en_main);
        assert_eq!(form.name_en, "Gold Ship");
        assert_eq!(form.password, "pw");
        assert_eq!(form.bindings[0].value, "Ueda");
        assert_eq!(form.bindings[1].value, "white");
        assert_eq!(form.free_rows[0].label, "quirk");
    }
}
