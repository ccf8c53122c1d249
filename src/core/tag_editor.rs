use std::collections::BTreeMap;

use thiserror::Error;

use super::models::{
    Character,
    Tag,
    TagOrigin,
};
use crate::schema::TagSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagEditError {
    #[error("Tag editing is locked for this entry.")]
    Locked,

    #[error("The tag \"{0}\" is already set.")]
    Duplicate(String),

    #[error("No tag category accepts new tags.")]
    NoFreeCategory,

    #[error("Owner tags cannot be removed.")]
    OwnerImmutable,

    #[error("Enter a tag name.")]
    EmptyName,
}

/// One entry of the editor's working list. The origin category id is kept
/// so owner tags can be re-bucketed into their original category on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTag {
    pub name: String,
    pub origin: TagOrigin,
    pub category_id: String,
}

/// Disposable working copy of one character's tags. Opened from the full
/// current tag set, mutated by add/remove, and either discarded or turned
/// into a full-replacement payload — the remote contract replaces the
/// whole tag mapping, so the working list must always start complete.
#[derive(Debug, Clone)]
pub struct TagEditor {
    character_id: String,
    working: Vec<WorkingTag>,
    free_category: Option<String>,
}

impl TagEditor {
    /// Copy a character's tags into a flat working list. Lock-flagged
    /// characters never produce an editor.
    pub fn open(character: &Character, schema: &TagSchema) -> Result<Self, TagEditError> {
        if character.tag_edit_locked {
            return Err(TagEditError::Locked);
        }

        let mut working = Vec::new();
        // Schema row order first so the list reads like the detail view;
        // categories the schema no longer knows keep their tags anyway.
        for category in schema.categories() {
            if let Some(tags) = character.tags.get(&category.id) {
                for tag in tags {
                    working.push(WorkingTag {
                        name: tag.name.clone(),
                        origin: tag.origin,
                        category_id: category.id.clone(),
                    });
                }
            }
        }
        for (category_id, tags) in &character.tags {
            if schema.get(category_id).is_some() {
                continue;
            }
            for tag in tags {
                working.push(WorkingTag {
                    name: tag.name.clone(),
                    origin: tag.origin,
                    category_id: category_id.clone(),
                });
            }
        }

        Ok(TagEditor {
            character_id: character.id.clone(),
            working,
            free_category: schema.free_category().map(|category| category.id.clone()),
        })
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn tags(&self) -> &[WorkingTag] {
        &self.working
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn can_remove(&self, index: usize) -> bool {
        self.working.get(index).map_or(false, |tag| tag.origin == TagOrigin::Participant)
    }

    /// Add a participant tag to the resolved free category. Fails closed
    /// when the schema has no free category, and rejects names already in
    /// the working list regardless of their origin.
    pub fn add(&mut self, name: &str) -> Result<(), TagEditError> {
        let Some(free_category) = self.free_category.clone() else {
            return Err(TagEditError::NoFreeCategory);
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(TagEditError::EmptyName);
        }
        if self.working.iter().any(|tag| tag.name == name) {
            return Err(TagEditError::Duplicate(name.to_string()));
        }

        self.working.push(WorkingTag {
            name: name.to_string(),
            origin: TagOrigin::Participant,
            category_id: free_category,
        });
        Ok(())
    }

    /// Remove a participant tag. Owner tags are refused here too, not just
    /// hidden in the UI.
    pub fn remove(&mut self, index: usize) -> Result<(), TagEditError> {
        match self.working.get(index) {
            Some(tag) if tag.origin == TagOrigin::Participant => {
                self.working.remove(index);
                Ok(())
            }
            Some(_) => Err(TagEditError::OwnerImmutable),
            None => Ok(()),
        }
    }

    /// Re-bucket the working list into the full replacement mapping sent
    /// via `updateGuestTags`. Categories not represented in the working
    /// list are implicitly emptied by the server.
    pub fn to_payload(&self) -> BTreeMap<String, Vec<Tag>> {
        let mut payload: BTreeMap<String, Vec<Tag>> = BTreeMap::new();
        for tag in &self.working {
            payload
                .entry(tag.category_id.clone())
                .or_default()
                .push(Tag { name: tag.name.clone(), origin: tag.origin });
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        core::models::CharacterRow,
        schema::build_tag_schema,
    };

    fn schema() -> TagSchema {
        let rows: Vec<crate::schema::DefRow> = serde_json::from_value(json!([
            { "col_id": "tag_001", "category_name": "Aptitude", "items": ["sprinter", "stayer"], "is_fixed": true },
            { "col_id": "tag_002", "category_name": "Impressions", "items": ["cool", "cute"], "is_fixed": false },
        ]))
        .unwrap();
        build_tag_schema(&rows).0
    }

    fn character(locked: bool) -> Character {
        let row: CharacterRow = serde_json::from_value(json!({
            "id": "chr_001",
            "name": "Oguri Cap",
            "is_tag_locked": locked,
            "tags_json": {
                "tag_001": [{ "name": "sprinter", "type": "owner" }],
                "tag_002": [{ "name": "big eater", "type": "participant" }]
            }
        }))
        .unwrap();
        Character::from_row(row)
    }

    #[test]
    fn open_copies_the_full_tag_set() {
        let editor = TagEditor::open(&character(false), &schema()).unwrap();
        assert_eq!(editor.tags().len(), 2);
        assert_eq!(editor.tags()[0].name, "sprinter");
        assert_eq!(editor.tags()[0].category_id, "tag_001");
        assert_eq!(editor.tags()[1].origin, TagOrigin::Participant);
    }

    #[test]
    fn locked_characters_never_open() {
        let result = TagEditor::open(&character(true), &schema());
        assert!(matches!(result, Err(TagEditError::Locked)));
    }

    #[test]
    fn duplicates_are_rejected_whatever_their_origin() {
        let mut editor = TagEditor::open(&character(false), &schema()).unwrap();
        let before = editor.tags().len();

        // "sprinter" is an owner tag, "big eater" a participant tag; both
        // block re-adding the same name.
        assert_eq!(editor.add("sprinter"), Err(TagEditError::Duplicate("sprinter".to_string())));
        assert_eq!(editor.add("big eater"), Err(TagEditError::Duplicate("big eater".to_string())));
        assert_eq!(editor.tags().len(), before);

        // Case-sensitive comparison: a different casing is a new tag.
        assert!(editor.add("Sprinter").is_ok());
    }

    #[test]
    fn new_tags_land_in_the_first_free_category() {
        let mut editor = TagEditor::open(&character(false), &schema()).unwrap();
        editor.add("heroic").unwrap();

        let added = editor.tags().last().unwrap();
        assert_eq!(added.category_id, "tag_002");
        assert_eq!(added.origin, TagOrigin::Participant);
    }

    #[test]
    fn add_fails_closed_without_a_free_category() {
        let rows: Vec<crate::schema::DefRow> = serde_json::from_value(json!([
            { "col_id": "tag_001", "items": ["sprinter"], "is_fixed": true },
        ]))
        .unwrap();
        let (all_fixed, _) = build_tag_schema(&rows);

        let mut editor = TagEditor::open(&character(false), &all_fixed).unwrap();
        assert_eq!(editor.add("heroic"), Err(TagEditError::NoFreeCategory));
    }

    #[test]
    fn owner_tags_survive_any_operation_sequence() {
        let mut editor = TagEditor::open(&character(false), &schema()).unwrap();

        assert!(!editor.can_remove(0));
        assert_eq!(editor.remove(0), Err(TagEditError::OwnerImmutable));

        editor.add("heroic").unwrap();
        editor.remove(1).unwrap(); // "big eater", participant
        editor.add("legend").unwrap();

        let payload = editor.to_payload();
        let aptitude = &payload["tag_001"];
        assert_eq!(aptitude.len(), 1);
        assert_eq!(aptitude[0].name, "sprinter");
        assert_eq!(aptitude[0].origin, TagOrigin::Owner);
    }

    #[test]
    fn save_payload_rebuckets_by_category() {
        let mut editor = TagEditor::open(&character(false), &schema()).unwrap();
        editor.add("heroic").unwrap();

        let payload = editor.to_payload();
        assert_eq!(payload["tag_001"].len(), 1);
        let impressions: Vec<&str> = payload["tag_002"].iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(impressions, vec!["big eater", "heroic"]);

        // Wire shape: {name, type} items.
        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["tag_002"][1], json!({ "name": "heroic", "type": "participant" }));
    }

    #[test]
    fn removing_every_participant_tag_empties_its_category() {
        let mut editor = TagEditor::open(&character(false), &schema()).unwrap();
        editor.remove(1).unwrap();

        let payload = editor.to_payload();
        // The category disappears from the mapping; the server contract
        // empties categories that are not represented.
        assert!(!payload.contains_key("tag_002"));
        assert!(payload.contains_key("tag_001"));
    }
}
