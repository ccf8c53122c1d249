use std::collections::BTreeSet;

use super::search;
use crate::core::{
    filter::{
        apply_filter,
        TagFilter,
    },
    Character,
};

/// Search and tag-filter state of the list view. `visible_indices` is the
/// derived view into the cache, rebuilt lazily when something changed.
pub struct ListState {
    search: String,
    filter: TagFilter,
    visible_indices: Vec<usize>,
    dirty: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: TagFilter::default(),
            visible_indices: Vec::new(),
            dirty: true,
        }
    }
}

impl ListState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.dirty = true;
        }
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    pub fn toggle_tag(&mut self, name: &str) {
        self.filter.toggle(name);
        self.dirty = true;
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.dirty = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Every tag name present in the cache, the universe the filter chips
    /// are drawn from.
    pub fn available_tags(characters: &[Character]) -> BTreeSet<String> {
        characters
            .iter()
            .flat_map(|character| character.tags.values().flatten())
            .map(|tag| tag.name.clone())
            .collect()
    }

    pub fn ensure_indices(&mut self, characters: &[Character]) {
        let needs_rebuild = self.dirty
            || self.visible_indices.len() > characters.len()
            || self.visible_indices.iter().any(|&index| index >= characters.len());

        if needs_rebuild {
            self.recompute_indices(characters);
        }
    }

    fn recompute_indices(&mut self, characters: &[Character]) {
        let query = self.search.trim();

        self.visible_indices = apply_filter(characters, &self.filter);
        self.visible_indices
            .retain(|&index| search::matches_search(&characters[index], query));

        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::models::CharacterRow;

    fn characters() -> Vec<Character> {
        let rows: Vec<CharacterRow> = serde_json::from_value(json!([
            { "id": "chr_001", "name": "Oguri Cap",
              "tags_json": { "tag_001": [{ "name": "gray" }] } },
            { "id": "chr_002", "name": "Gold Ship",
              "tags_json": { "tag_001": [{ "name": "gray" }, { "name": "stayer" }] } },
            { "id": "chr_003", "name": "Vodka" },
        ]))
        .unwrap();
        rows.into_iter().map(Character::from_row).collect()
    }

    #[test]
    fn search_and_tag_filter_combine() {
        let characters = characters();
        let mut state = ListState::default();

        state.ensure_indices(&characters);
        assert_eq!(state.visible_indices(), &[0, 1, 2]);

        state.toggle_tag("gray");
        state.ensure_indices(&characters);
        assert_eq!(state.visible_indices(), &[0, 1]);

        state.set_search("gold".to_string());
        state.ensure_indices(&characters);
        assert_eq!(state.visible_indices(), &[1]);

        state.clear_filter();
        state.set_search(String::new());
        state.ensure_indices(&characters);
        assert_eq!(state.visible_indices(), &[0, 1, 2]);
    }

    #[test]
    fn stale_indices_rebuild_after_cache_shrinks() {
        let characters = characters();
        let mut state = ListState::default();
        state.ensure_indices(&characters);

        let fewer = characters[..1].to_vec();
        state.ensure_indices(&fewer);
        assert_eq!(state.visible_indices(), &[0]);
    }

    #[test]
    fn available_tags_are_deduplicated() {
        let tags = ListState::available_tags(&characters());
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["gray", "stayer"]);
    }
}
