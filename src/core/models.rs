use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// Who attached a tag. Owner tags come from the entry's registrant and are
/// immutable for everyone else; participant tags are fair game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOrigin {
    Owner,
    Participant,
}

impl Default for TagOrigin {
    fn default() -> Self {
        TagOrigin::Participant
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "type", default)]
    pub origin: TagOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "message")]
    pub text: String,
}

/// Raw entity row as returned by `getAllData`. Booleans may arrive as the
/// strings "true"/"false" depending on how the sheet serialized them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_kana: Option<String>,
    #[serde(default)]
    pub name_hk: Option<String>,
    #[serde(default)]
    pub is_en_main: Option<Value>,
    #[serde(default)]
    pub trainer_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags_json: Option<BTreeMap<String, Vec<Tag>>>,
    #[serde(default)]
    pub is_tag_locked: Option<Value>,
    /// Extended-field objects keyed by category id (ext_001, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

pub(crate) fn loose_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub name_kana: Option<String>,
    pub name_hk: Option<String>,
    pub is_en_main: bool,
    pub trainer_name: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: Option<String>,
    /// category id -> field key -> value
    pub extended: BTreeMap<String, BTreeMap<String, String>>,
    pub free_fields: Vec<FreeField>,
    /// category id -> tags, in server order
    pub tags: BTreeMap<String, Vec<Tag>>,
    pub tag_edit_locked: bool,
}

impl Character {
    pub fn from_row(row: CharacterRow) -> Self {
        let is_en_main = loose_bool(row.is_en_main.as_ref());
        let name_en = non_empty(row.name_en);
        let name_kana = non_empty(row.name_kana);

        // The sheet computes the display name; derive it when absent.
        let name = non_empty(row.name)
            .or_else(|| if is_en_main { name_en.clone() } else { name_kana.clone() })
            .or_else(|| if is_en_main { name_kana.clone() } else { name_en.clone() })
            .unwrap_or_else(|| row.id.clone());

        let mut extended = BTreeMap::new();
        let mut free_fields = Vec::new();

        for (category_id, value) in row.extra {
            let Value::Object(entries) = value else {
                continue;
            };
            let mut fields = BTreeMap::new();
            for (key, entry) in entries {
                match entry {
                    Value::Array(items) if key == "free" => {
                        for item in items {
                            if let Ok(field) = serde_json::from_value::<FreeField>(item) {
                                free_fields.push(field);
                            }
                        }
                    }
                    Value::String(text) if !text.is_empty() => {
                        fields.insert(key, text);
                    }
                    _ => {}
                }
            }
            if !fields.is_empty() {
                extended.insert(category_id, fields);
            }
        }

        Character {
            id: row.id,
            name,
            name_en,
            name_kana,
            name_hk: non_empty(row.name_hk),
            is_en_main,
            trainer_name: non_empty(row.trainer_name),
            image_url: non_empty(row.image_url),
            updated_at: non_empty(row.updated_at),
            extended,
            free_fields,
            tags: row.tags_json.unwrap_or_default(),
            tag_edit_locked: loose_bool(row.is_tag_locked.as_ref()),
        }
    }

    /// All tag names across categories, category membership discarded.
    /// This is the set the filter engine matches against.
    pub fn flattened_tag_names(&self) -> HashSet<&str> {
        self.tags.values().flatten().map(|tag| tag.name.as_str()).collect()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row_from_json(value: Value) -> CharacterRow {
        serde_json::from_value(value).expect("valid row")
    }

    #[test]
    fn converts_row_with_extended_fields_and_tags() {
        let row = row_from_json(json!({
            "id": "chr_001",
            "name": "スペシャルデー",
            "name_kana": "スペシャルデー",
            "is_en_main": "false",
            "ext_001": { "cv_name": "Yuki", "birthday": "" },
            "ext_003": { "image_color": "red", "free": [
                { "label": "food", "value": "taiyaki" }
            ]},
            "tags_json": {
                "tag_001": [
                    { "name": "sprinter", "type": "owner" },
                    { "name": "fan favorite", "type": "participant" }
                ]
            },
            "is_tag_locked": false
        }));

        let character = Character::from_row(row);
        assert_eq!(character.name, "スペシャルデー");
        assert!(!character.is_en_main);
        assert_eq!(character.extended["ext_001"]["cv_name"], "Yuki");
        // Empty values are not carried into the normalized record.
        assert!(!character.extended["ext_001"].contains_key("birthday"));
        assert_eq!(character.extended["ext_003"]["image_color"], "red");
        assert_eq!(character.free_fields, vec![FreeField {
            label: "food".to_string(),
            value: "taiyaki".to_string(),
        }]);
        assert_eq!(character.tag_count(), 2);
        assert!(!character.tag_edit_locked);

        let names = character.flattened_tag_names();
        assert!(names.contains("sprinter"));
        assert!(names.contains("fan favorite"));
    }

    #[test]
    fn derives_display_name_from_main_name_flag() {
        let row = row_from_json(json!({
            "id": "chr_002",
            "name_en": "Daring Tact",
            "name_kana": "デアリングタクト",
            "is_en_main": true
        }));
        assert_eq!(Character::from_row(row).name, "Daring Tact");

        let row = row_from_json(json!({
            "id": "chr_003",
            "name_en": "Daring Tact",
            "name_kana": "デアリングタクト",
            "is_en_main": "false"
        }));
        assert_eq!(Character::from_row(row).name, "デアリングタクト");
    }

    #[test]
    fn lenient_bool_accepts_strings_and_defaults_false() {
        assert!(loose_bool(Some(&json!(true))));
        assert!(loose_bool(Some(&json!("true"))));
        assert!(!loose_bool(Some(&json!("false"))));
        assert!(!loose_bool(Some(&json!(1))));
        assert!(!loose_bool(None));
    }

    #[test]
    fn tag_origin_defaults_to_participant() {
        let tag: Tag = serde_json::from_value(json!({ "name": "stayer" })).unwrap();
        assert_eq!(tag.origin, TagOrigin::Participant);

        let tag: Tag =
            serde_json::from_value(json!({ "name": "stayer", "type": "owner" })).unwrap();
        assert_eq!(tag.origin, TagOrigin::Owner);
    }
}
