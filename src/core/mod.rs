pub mod cache;
pub mod errors;
pub mod filter;
pub mod form;
pub mod models;
pub mod tag_editor;
pub mod tasks;
pub mod utils;

pub use errors::ChardexError;
pub use models::{
    Character,
    FreeField,
    NewsItem,
    Tag,
    TagOrigin,
};
