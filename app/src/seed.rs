//! Default records written on first start. Each family is only written when
//! its stored array is empty, so running setup again is harmless.

use log::*;

use infra::persistence::Storage;
use infra::store::Store;

use crate::auth::College;
use crate::keys::Key;
use crate::menu::{Category, MenuItem};
use crate::students::Student;

pub const DEMO_COLLEGE: &str = "XYZ College";
pub const DEMO_PASSWORD: &str = "demo";

pub fn setup<S: Storage>(store: &Store<S>) {
    let mut seeded = 0;
    if store.seed_with(&Key::Students.name(), default_students) {
        seeded += 1;
    }
    if store.seed_with(&Key::Colleges.name(), default_colleges) {
        seeded += 1;
    }
    for category in Category::all() {
        if store.seed_with(&Key::Menu(*category).name(), || default_menu(*category)) {
            seeded += 1;
        }
    }
    info!("Seeded {} record families", seeded);
}

fn default_students() -> Vec<Student> {
    vec![Student {
        student_id: "S2025001".to_string(),
        email: Some("anita@example.com".to_string()),
        year: Some("2nd Year".to_string()),
        preferences: Some("Vegetarian".to_string()),
        ..Student::new("Anita Rao", DEMO_COLLEGE)
    }]
}

fn default_colleges() -> Vec<College> {
    vec![College::new(DEMO_COLLEGE, DEMO_PASSWORD)]
}

pub fn default_menu(category: Category) -> Vec<MenuItem> {
    let item = |id, name, price, description| MenuItem::new(id, name, price, category, description);
    match category {
        Category::Vegetarian => vec![
            item(
                "veg01",
                "Paneer Wrap",
                70,
                "Grilled paneer, veggies and sauces in a wrap.",
            ),
            item(
                "veg02",
                "Veg Biryani",
                90,
                "Aromatic basmati rice with mixed vegetables and spices.",
            ),
            item(
                "veg03",
                "Masala Dosa",
                60,
                "Crispy dosa with spiced potato filling, served with sambar.",
            ),
        ],
        Category::NonVegetarian => vec![
            item(
                "nonveg01",
                "Chicken Burger",
                120,
                "Juicy chicken patty with fresh vegetables.",
            ),
            item(
                "nonveg02",
                "Tandoori Chicken",
                150,
                "Spicy grilled chicken marinated in tandoori spices.",
            ),
        ],
        Category::Juices => vec![
            item(
                "juice01",
                "Fresh Mango Juice",
                50,
                "Freshly squeezed mango juice.",
            ),
            item(
                "juice02",
                "Smoothie Bowl",
                80,
                "Refreshing strawberry smoothie bowl with toppings.",
            ),
        ],
        Category::Desserts => vec![
            item(
                "des01",
                "Chocolate Brownie",
                40,
                "Rich chocolate brownie with chocolate sauce.",
            ),
            item(
                "des02",
                "Rainbow Cake",
                60,
                "Colorful layered cake slice, perfect for celebrations.",
            ),
        ],
    }
}
