use super::models::{
    Character,
    CharacterRow,
};

/// Session-wide entity cache. Populated wholesale from `getAllData` and
/// replaced wholesale after every successful mutation; there is no partial
/// update or delta merge. If two reloads race, the last response wins.
#[derive(Debug, Default)]
pub struct CharacterCache {
    characters: Vec<Character>,
}

impl CharacterCache {
    pub fn load(&mut self, rows: Vec<CharacterRow>) {
        self.characters = rows.into_iter().map(Character::from_row).collect();
    }

    pub fn get(&self, index: usize) -> Option<&Character> {
        self.characters.get(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|character| character.id == id)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows() -> Vec<CharacterRow> {
        serde_json::from_value(json!([
            { "id": "chr_001", "name": "Oguri Cap" },
            { "id": "chr_002", "name": "Gold Ship" },
        ]))
        .unwrap()
    }

    #[test]
    fn load_replaces_the_whole_cache() {
        let mut cache = CharacterCache::default();
        cache.load(rows());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(1).unwrap().name, "Gold Ship");

        cache.load(serde_json::from_value(json!([{ "id": "chr_009", "name": "Vodka" }])).unwrap());
        assert_eq!(cache.len(), 1);
        assert!(cache.get_by_id("chr_001").is_none());
        assert_eq!(cache.get_by_id("chr_009").unwrap().name, "Vodka");
    }

    #[test]
    fn lookup_by_index_and_id() {
        let mut cache = CharacterCache::default();
        cache.load(rows());
        assert_eq!(cache.get(0).unwrap().id, "chr_001");
        assert!(cache.get(5).is_none());
        assert_eq!(cache.get_by_id("chr_002").unwrap().name, "Gold Ship");
        assert!(cache.get_by_id("missing").is_none());
    }
}
