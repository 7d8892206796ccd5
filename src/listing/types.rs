use serde::{Deserialize, Serialize};

/// Input to a description enhancement, copied from the draft at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    pub title: String,
    pub category: String,
    pub description: String,
}

impl EnhancementRequest {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Names of the required fields that are empty after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("category", &self.category),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Improved description plus suggested tags, in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResult {
    pub enhanced_description: String,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

/// The in-progress listing a seller is editing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DraftListing {
    /// Snapshot the fields an enhancement needs.
    pub fn enhancement_request(&self) -> EnhancementRequest {
        EnhancementRequest::new(&self.title, &self.category, &self.description)
    }

    pub fn update(&mut self, update: DraftUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(image_urls) = update.image_urls {
            self.image_urls = image_urls;
        }
    }
}

/// Partial edit of the form-owned draft fields. Tags are only written by applying
/// an enhancement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}
