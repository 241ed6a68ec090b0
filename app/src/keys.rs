use std::fmt;

use crate::menu::Category;

pub const STORAGE_PREFIX: &str = "canteen_app_v1";

/// Where each record family lives in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Students,
    Colleges,
    Menu(Category),
    History,
    Ratings,
    CurrentUser,
    CurrentStudent,
    Cart,
}

impl Key {
    pub fn name(&self) -> String {
        format!("{}-{}", STORAGE_PREFIX, self.suffix())
    }

    fn suffix(&self) -> &'static str {
        match self {
            Key::Students => "students",
            Key::Colleges => "colleges",
            Key::Menu(Category::Vegetarian) => "menu-veg",
            Key::Menu(Category::NonVegetarian) => "menu-nonveg",
            Key::Menu(Category::Juices) => "menu-juices",
            Key::Menu(Category::Desserts) => "menu-desserts",
            Key::History => "history",
            Key::Ratings => "ratings",
            Key::CurrentUser => "current-user",
            Key::CurrentStudent => "current-student",
            Key::Cart => "cart",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}
