use std::fmt;
use std::str::FromStr;

use err_derive::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    Juices,
    Desserts,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(display = "No such menu: {:?}", _0)]
pub struct UnknownCategory(pub String);

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Whole currency units.
    pub price: u32,
    pub category: Category,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_note: Option<String>,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Vegetarian,
            Category::NonVegetarian,
            Category::Juices,
            Category::Desserts,
        ]
    }

    /// The path segment the menu is browsed under.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Vegetarian => "vegetarian",
            Category::NonVegetarian => "non-vegetarian",
            Category::Juices => "juices",
            Category::Desserts => "desserts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Vegetarian => "Vegetarian",
            Category::NonVegetarian => "Non-Vegetarian",
            Category::Juices => "Juices",
            Category::Desserts => "Desserts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.title())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .find(|c| c.slug().eq_ignore_ascii_case(src) || c.title().eq_ignore_ascii_case(src))
            .cloned()
            .ok_or_else(|| UnknownCategory(src.to_string()))
    }
}

impl MenuItem {
    pub(crate) fn new(
        id: &str,
        name: &str,
        price: u32,
        category: Category,
        description: &str,
    ) -> Self {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category,
            available: true,
            description: Some(description.to_string()),
            unavailable_note: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn categories_parse_from_slug_or_title() {
        for c in Category::all() {
            assert_eq!(c.slug().parse::<Category>(), Ok(*c));
            assert_eq!(c.title().to_uppercase().parse::<Category>(), Ok(*c));
        }
        assert_eq!(
            "snacks".parse::<Category>(),
            Err(UnknownCategory("snacks".to_string()))
        );
    }

    #[test]
    fn menu_item_uses_stored_field_names() {
        let mut item = MenuItem::new("veg01", "Paneer Wrap", 70, Category::NonVegetarian, "Wrap.");
        item.available = false;
        item.unavailable_note = Some("Back tomorrow".to_string());

        assert_eq!(
            serde_json::to_value(&item).expect("to_value"),
            json!({
                "id": "veg01",
                "name": "Paneer Wrap",
                "price": 70,
                "category": "Non-Vegetarian",
                "available": false,
                "description": "Wrap.",
                "unavailableNote": "Back tomorrow",
            })
        );
    }

    #[test]
    fn menu_item_ignores_presentation_fields() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "des01",
            "name": "Chocolate Brownie",
            "price": 40,
            "category": "Desserts",
            "image": "chocolate-brownie",
            "available": true,
        }))
        .expect("from_value");

        assert_eq!(item.category, Category::Desserts);
        assert_eq!(item.description, None);
    }
}
