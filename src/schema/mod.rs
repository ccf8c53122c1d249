//! Normalized views of the server-supplied field and tag definitions.
//!
//! Both definition kinds arrive as the same row shape (`col_id`, optional
//! `category_name`, `items`, optional `is_fixed`). Rows missing `col_id` or
//! `items` are skipped; every skipped or unexpected row is reported as a
//! `SchemaIssue` so the caller can warn instead of losing data silently.
//! The schemas are built once per session and never refreshed.

use std::fmt;

use serde::Deserialize;

/// Raw definition row shared by `getDefs` and `getTagsDefs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefRow {
    #[serde(default)]
    pub col_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub is_fixed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    MissingColumnId { row: usize },
    MissingItems { col_id: String },
    UnknownCategory { col_id: String },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::MissingColumnId { row } => {
                write!(f, "definition row {} has no col_id, skipped", row)
            }
            SchemaIssue::MissingItems { col_id } => {
                write!(f, "definition '{}' has no items, skipped", col_id)
            }
            SchemaIssue::UnknownCategory { col_id } => {
                write!(f, "category '{}' is not a known form slot and will not be rendered", col_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldDef>,
}

/// How the form renders a category slot. The three slots are a fixed part
/// of the page layout, not data-driven; categories outside them stay
/// invisible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStyle {
    Plain,
    Collapsible,
    CollapsibleWithFree,
}

pub struct CategorySlot {
    pub id: &'static str,
    pub style: SlotStyle,
}

pub const CATEGORY_SLOTS: [CategorySlot; 3] = [
    CategorySlot { id: "ext_001", style: SlotStyle::Plain },
    CategorySlot { id: "ext_002", style: SlotStyle::Collapsible },
    CategorySlot { id: "ext_003", style: SlotStyle::CollapsibleWithFree },
];

/// Category id that receives user-added label/value rows.
pub const FREE_ITEMS_CATEGORY: &str = "ext_003";

fn is_known_category(id: &str) -> bool {
    CATEGORY_SLOTS.iter().any(|slot| slot.id == id)
}

#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    categories: Vec<CategoryDef>,
}

impl FieldSchema {
    pub fn get(&self, id: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCategoryDef {
    pub id: String,
    pub name: String,
    pub is_fixed: bool,
    pub vocabulary: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TagSchema {
    categories: Vec<TagCategoryDef>,
}

impl TagSchema {
    pub fn get(&self, id: &str) -> Option<&TagCategoryDef> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn categories(&self) -> &[TagCategoryDef] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The single destination for newly added participant tags: the first
    /// non-fixed category in row order. Resolved the same way every time,
    /// so all new tags of a session land in one category.
    pub fn free_category(&self) -> Option<&TagCategoryDef> {
        self.categories.iter().find(|category| !category.is_fixed)
    }
}

fn normalize_row(index: usize, row: &DefRow, issues: &mut Vec<SchemaIssue>) -> Option<(String, Vec<String>)> {
    let Some(col_id) = row.col_id.clone().filter(|id| !id.is_empty()) else {
        issues.push(SchemaIssue::MissingColumnId { row: index });
        return None;
    };
    let Some(items) = row.items.clone() else {
        issues.push(SchemaIssue::MissingItems { col_id });
        return None;
    };
    Some((col_id, items))
}

/// Build the form-field schema from `getDefs` rows.
pub fn build_field_schema(rows: &[DefRow]) -> (FieldSchema, Vec<SchemaIssue>) {
    let mut issues = Vec::new();
    let mut categories = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some((col_id, items)) = normalize_row(index, row, &mut issues) else {
            continue;
        };
        if !is_known_category(&col_id) {
            issues.push(SchemaIssue::UnknownCategory { col_id: col_id.clone() });
        }

        let title = row.category_name.clone().filter(|name| !name.is_empty()).unwrap_or_else(|| col_id.clone());
        // Item strings double as key and label, matching the sheet layout.
        let fields = items
            .into_iter()
            .map(|item| FieldDef { key: item.clone(), label: item })
            .collect();

        categories.push(CategoryDef { id: col_id, title, fields });
    }

    (FieldSchema { categories }, issues)
}

/// Build the tag schema from `getTagsDefs` rows. Row order is preserved:
/// it decides which category receives new participant tags.
pub fn build_tag_schema(rows: &[DefRow]) -> (TagSchema, Vec<SchemaIssue>) {
    let mut issues = Vec::new();
    let mut categories = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some((col_id, items)) = normalize_row(index, row, &mut issues) else {
            continue;
        };

        let name = row.category_name.clone().filter(|name| !name.is_empty()).unwrap_or_else(|| col_id.clone());

        categories.push(TagCategoryDef {
            id: col_id,
            name,
            is_fixed: row.is_fixed.unwrap_or(false),
            vocabulary: items,
        });
    }

    (TagSchema { categories }, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(col_id: Option<&str>, name: Option<&str>, items: Option<&[&str]>, is_fixed: Option<bool>) -> DefRow {
        DefRow {
            col_id: col_id.map(str::to_string),
            category_name: name.map(str::to_string),
            items: items.map(|items| items.iter().map(|s| s.to_string()).collect()),
            is_fixed,
        }
    }

    #[test]
    fn malformed_rows_are_skipped_and_reported() {
        let rows = vec![
            row(None, Some("nameless"), Some(&["a"]), None),
            row(Some("ext_001"), Some("Basic"), None, None),
            row(Some("ext_002"), Some("Profile"), Some(&["height"]), None),
        ];

        let (schema, issues) = build_field_schema(&rows);
        assert_eq!(schema.categories().len(), 1);
        assert_eq!(schema.get("ext_002").unwrap().title, "Profile");
        assert_eq!(issues, vec![
            SchemaIssue::MissingColumnId { row: 0 },
            SchemaIssue::MissingItems { col_id: "ext_001".to_string() },
        ]);
    }

    #[test]
    fn title_falls_back_to_col_id() {
        let rows = vec![row(Some("ext_001"), None, Some(&["cv_name"]), None)];
        let (schema, issues) = build_field_schema(&rows);
        let category = schema.get("ext_001").unwrap();
        assert_eq!(category.title, "ext_001");
        assert_eq!(category.fields, vec![FieldDef {
            key: "cv_name".to_string(),
            label: "cv_name".to_string(),
        }]);
        assert!(issues.is_empty());
    }

    #[test]
    fn unknown_categories_are_kept_but_flagged() {
        let rows = vec![row(Some("ext_999"), Some("Mystery"), Some(&["x"]), None)];
        let (schema, issues) = build_field_schema(&rows);
        assert!(schema.get("ext_999").is_some());
        assert_eq!(issues, vec![SchemaIssue::UnknownCategory { col_id: "ext_999".to_string() }]);
    }

    #[test]
    fn free_category_is_first_non_fixed_in_row_order() {
        let rows = vec![
            row(Some("a"), None, Some(&[]), Some(true)),
            row(Some("b"), None, Some(&[]), Some(false)),
            row(Some("c"), None, Some(&[]), Some(false)),
        ];
        let (schema, _) = build_tag_schema(&rows);
        assert_eq!(schema.free_category().unwrap().id, "b");
        // Resolution is a pure lookup; asking again cannot change the answer.
        assert_eq!(schema.free_category().unwrap().id, "b");
    }

    #[test]
    fn all_fixed_schema_has_no_free_category() {
        let rows = vec![
            row(Some("a"), None, Some(&["x"]), Some(true)),
            row(Some("b"), None, Some(&["y"]), Some(true)),
        ];
        let (schema, _) = build_tag_schema(&rows);
        assert!(schema.free_category().is_none());
    }

    #[test]
    fn missing_is_fixed_means_not_fixed() {
        let rows = vec![row(Some("a"), None, Some(&["x"]), None)];
        let (schema, _) = build_tag_schema(&rows);
        assert!(!schema.get("a").unwrap().is_fixed);
        assert_eq!(schema.free_category().unwrap().id, "a");
    }
}
