use serde::Serialize;

/// A listing category as offered by the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "electronics",
        name: "Electronics",
    },
    Category {
        id: "fashion",
        name: "Fashion",
    },
    Category {
        id: "home-garden",
        name: "Home & Garden",
    },
    Category {
        id: "books-movies-music",
        name: "Books, Movies & Music",
    },
    Category {
        id: "sports-outdoors",
        name: "Sports & Outdoors",
    },
    Category {
        id: "toys-hobbies",
        name: "Toys & Hobbies",
    },
    Category {
        id: "vehicles",
        name: "Vehicles",
    },
    Category {
        id: "other",
        name: "Other",
    },
];

/// Display name for a category id. Unknown ids are returned unchanged.
pub fn category_name(id: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .map_or(id, |c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_known() {
        assert_eq!(category_name("home-garden"), "Home & Garden");
        assert_eq!(category_name("other"), "Other");
    }

    #[test]
    fn test_category_name_unknown_passes_through() {
        assert_eq!(category_name("Antiques"), "Antiques");
    }
}
