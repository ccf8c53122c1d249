use crate::core::{
    utils::text_matches_search,
    Character,
};

pub fn matches_search(character: &Character, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    if text_matches_search(&character.name, query) {
        return true;
    }

    for name in [&character.name_kana, &character.name_en, &character.name_hk, &character.trainer_name]
        .into_iter()
        .flatten()
    {
        if text_matches_search(name, query) {
            return true;
        }
    }

    character
        .tags
        .values()
        .flatten()
        .any(|tag| text_matches_search(&tag.name, query))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::models::CharacterRow;

    fn character() -> Character {
        let row: CharacterRow = serde_json::from_value(json!({
            "id": "chr_001",
            "name": "オグリキャップ",
            "name_en": "Oguri Cap",
            "trainer_name": "Kasamatsu",
            "tags_json": { "tag_001": [{ "name": "big eater" }] }
        }))
        .unwrap();
        Character::from_row(row)
    }

    #[test]
    fn matches_names_trainer_and_tags() {
        let character = character();
        assert!(matches_search(&character, "oguri"));
        assert!(matches_search(&character, "オグリ"));
        assert!(matches_search(&character, "kasamatsu"));
        assert!(matches_search(&character, "big eater"));
        assert!(!matches_search(&character, "gold ship"));
    }
}
