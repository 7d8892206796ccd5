use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::DraftListing;

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MIN: usize = 20;
const DESCRIPTION_MAX: usize = 1000;

/// A single rule violation on a draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A draft that passed submission and was listed (mock: nothing is stored).
#[derive(Debug, Clone, Serialize)]
pub struct ListedItem {
    pub id: String,
    pub seller_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub listing: DraftListing,
}

/// Check the draft against the listing form's rules.
pub fn validate_draft(draft: &DraftListing) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title_len = draft.title.trim().chars().count();
    if title_len < TITLE_MIN {
        errors.push(FieldError::new(
            "title",
            format!("Title must be at least {TITLE_MIN} characters."),
        ));
    } else if title_len > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            format!("Title must be at most {TITLE_MAX} characters."),
        ));
    }

    let description_len = draft.description.trim().chars().count();
    if description_len < DESCRIPTION_MIN {
        errors.push(FieldError::new(
            "description",
            format!("Description must be at least {DESCRIPTION_MIN} characters."),
        ));
    } else if description_len > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            format!("Description must be at most {DESCRIPTION_MAX} characters."),
        ));
    }

    if !(draft.price.is_finite() && draft.price > 0.0) {
        errors.push(FieldError::new("price", "Price must be a positive number."));
    }

    if draft.category.trim().is_empty() {
        errors.push(FieldError::new("category", "Please select a category."));
    }

    errors
}

/// Validate and list a draft. `next_id` is only called for a valid draft.
pub fn submit_draft(
    draft: &DraftListing,
    seller_id: &str,
    next_id: impl FnOnce() -> String,
) -> std::result::Result<ListedItem, Vec<FieldError>> {
    let errors = validate_draft(draft);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ListedItem {
        id: next_id(),
        seller_id: seller_id.to_string(),
        created_at: Utc::now(),
        listing: draft.clone(),
    })
}
