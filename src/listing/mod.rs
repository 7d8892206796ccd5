pub mod catalog;
pub mod submit;
pub mod types;

pub use catalog::{category_name, Category, CATEGORIES};
pub use types::{DraftListing, DraftUpdate, EnhancementRequest, EnhancementResult};
