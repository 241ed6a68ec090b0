use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;

/// A cart line. Name and price are copied from the menu when the line is
/// written and are not looked up again.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_id: String,
    pub name: String,
    pub price: u32,
    pub quantity: u32,
}

impl CartItem {
    pub fn of(item: &MenuItem, quantity: u32) -> Self {
        CartItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

pub fn total(items: &[CartItem]) -> u64 {
    items.iter().map(CartItem::line_total).sum()
}

/// Number of portions across all lines.
pub fn count(items: &[CartItem]) -> u64 {
    items.iter().map(|i| u64::from(i.quantity)).sum()
}
