use std::collections::BTreeSet;

use super::models::Character;

/// Active tag selection for the list view. Names match by exact string
/// identity in any tag category; the category is not part of the key.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    selected: BTreeSet<String>,
}

impl TagFilter {
    pub fn toggle(&mut self, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// AND semantics: every selected name must be present in the
    /// character's flattened tag set. An empty selection passes everything.
    pub fn matches(&self, character: &Character) -> bool {
        if self.selected.is_empty() {
            return true;
        }
        let names = character.flattened_tag_names();
        self.selected.iter().all(|selected| names.contains(selected.as_str()))
    }
}

/// Stable filter over the cache: returns the indices of the characters that
/// pass, in their original relative order. Pure function of its inputs.
pub fn apply_filter(characters: &[Character], filter: &TagFilter) -> Vec<usize> {
    characters
        .iter()
        .enumerate()
        .filter(|(_, character)| filter.matches(character))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::models::CharacterRow;

    fn characters() -> Vec<Character> {
        let rows: Vec<CharacterRow> = serde_json::from_value(json!([
            {
                "id": "chr_001",
                "name": "Oguri Cap",
                "tags_json": {
                    "tag_001": [{ "name": "miler" }, { "name": "gray" }],
                    "tag_002": [{ "name": "big eater", "type": "owner" }]
                }
            },
            {
                "id": "chr_002",
                "name": "Gold Ship",
                "tags_json": {
                    "tag_001": [{ "name": "stayer" }, { "name": "gray" }]
                }
            },
            {
                "id": "chr_003",
                "name": "Vodka",
                "tags_json": {}
            }
        ]))
        .unwrap();
        rows.into_iter().map(Character::from_row).collect()
    }

    fn filter_of(names: &[&str]) -> TagFilter {
        let mut filter = TagFilter::default();
        for name in names {
            filter.toggle(name);
        }
        filter
    }

    #[test]
    fn empty_filter_is_the_identity() {
        let characters = characters();
        let visible = apply_filter(&characters, &TagFilter::default());
        assert_eq!(visible, vec![0, 1, 2]);
    }

    #[test]
    fn single_tag_matches_across_categories() {
        let characters = characters();
        // "big eater" lives in tag_002; selection does not care.
        let visible = apply_filter(&characters, &filter_of(&["big eater"]));
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn conjunction_requires_every_selected_tag() {
        let characters = characters();
        assert_eq!(apply_filter(&characters, &filter_of(&["gray"])), vec![0, 1]);
        assert_eq!(apply_filter(&characters, &filter_of(&["gray", "stayer"])), vec![1]);
        assert_eq!(apply_filter(&characters, &filter_of(&["gray", "stayer", "miler"])), Vec::<usize>::new());
    }

    #[test]
    fn order_is_preserved_and_cache_untouched() {
        let characters = characters();
        let filter = filter_of(&["gray"]);
        let first = apply_filter(&characters, &filter);
        let second = apply_filter(&characters, &filter);
        assert_eq!(first, second);
        assert_eq!(characters.len(), 3);
        assert_eq!(characters[0].name, "Oguri Cap");
    }

    #[test]
    fn toggle_flips_selection() {
        let mut filter = TagFilter::default();
        filter.toggle("gray");
        assert!(filter.is_selected("gray"));
        filter.toggle("gray");
        assert!(filter.is_empty());
    }
}
