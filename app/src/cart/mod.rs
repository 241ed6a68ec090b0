//! The in-progress selection for the current student. Each line is keyed by
//! menu item id; a line whose quantity drops to zero is removed rather than
//! kept at zero.

use anyhow::Result;
use log::*;

use infra::persistence::Storage;
use infra::store::Store;

use crate::errors::CanteenError;
use crate::keys::Key;
use crate::menu::MenuItem;
use crate::services::{Commandable, Queryable, Request};

mod models;

pub use self::models::{count, total, CartItem};

/// Puts `quantity` of `item` in the cart, replacing any existing line for
/// the same item with a fresh copy of the menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetQuantity {
    pub item: MenuItem,
    pub quantity: u32,
}

/// Changes the quantity of a line already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuantity {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveItem {
    pub item_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearCart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowCart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartCount;

#[derive(Debug)]
pub struct Cart<S> {
    store: Store<S>,
}

impl<S: Storage> Cart<S> {
    pub fn new(store: Store<S>) -> Self {
        Cart { store }
    }

    fn load(&self) -> Vec<CartItem> {
        self.store.read(&Key::Cart.name(), Vec::new())
    }

    fn save(&self, items: &[CartItem]) {
        debug!(
            "Cart now holds {} lines worth {}",
            items.len(),
            total(items)
        );
        self.store.write(&Key::Cart.name(), items);
    }

    fn quantity_of(items: &[CartItem], item_id: &str) -> u32 {
        items
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }
}

impl Request for SetQuantity {
    type Resp = Vec<CartItem>;
}

impl<S: Storage> Commandable<SetQuantity> for Cart<S> {
    fn execute(&self, req: SetQuantity) -> Result<Vec<CartItem>> {
        let SetQuantity { item, quantity } = req;
        let mut items = self.load();
        let current = Self::quantity_of(&items, &item.id);

        if quantity == 0 {
            if current == 0 {
                return Ok(items);
            }
            items.retain(|i| i.item_id != item.id);
        } else {
            if !item.available && quantity > current {
                return Err(CanteenError::ItemUnavailable.into());
            }
            let line = CartItem::of(&item, quantity);
            match items.iter_mut().find(|i| i.item_id == item.id) {
                Some(existing) => *existing = line,
                None => items.push(line),
            }
        }
        self.save(&items);
        Ok(items)
    }
}

impl Request for UpdateQuantity {
    type Resp = Vec<CartItem>;
}

impl<S: Storage> Commandable<UpdateQuantity> for Cart<S> {
    fn execute(&self, req: UpdateQuantity) -> Result<Vec<CartItem>> {
        let mut items = self.load();
        let idx = items
            .iter()
            .position(|i| i.item_id == req.item_id)
            .ok_or_else(|| CanteenError::NotInCart(req.item_id.clone()))?;
        if req.quantity == 0 {
            items.remove(idx);
        } else {
            items[idx].quantity = req.quantity;
        }
        self.save(&items);
        Ok(items)
    }
}

impl Request for RemoveItem {
    type Resp = Vec<CartItem>;
}

impl<S: Storage> Commandable<RemoveItem> for Cart<S> {
    fn execute(&self, req: RemoveItem) -> Result<Vec<CartItem>> {
        let mut items = self.load();
        items.retain(|i| i.item_id != req.item_id);
        self.save(&items);
        Ok(items)
    }
}

impl Request for ClearCart {
    type Resp = ();
}

impl<S: Storage> Commandable<ClearCart> for Cart<S> {
    fn execute(&self, _: ClearCart) -> Result<()> {
        self.save(&[]);
        Ok(())
    }
}

impl Request for ShowCart {
    type Resp = Vec<CartItem>;
}

impl<S: Storage> Queryable<ShowCart> for Cart<S> {
    fn query(&self, _: ShowCart) -> Result<Vec<CartItem>> {
        Ok(self.load())
    }
}

impl Request for CartTotal {
    type Resp = u64;
}

impl<S: Storage> Queryable<CartTotal> for Cart<S> {
    fn query(&self, _: CartTotal) -> Result<u64> {
        Ok(total(&self.load()))
    }
}

impl Request for CartCount {
    type Resp = u64;
}

impl<S: Storage> Queryable<CartCount> for Cart<S> {
    fn query(&self, _: CartCount) -> Result<u64> {
        Ok(count(&self.load()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::junk_drawer::{self, menu_item, notice};
    use maplit::btreemap;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn set(cart: &Cart<infra::persistence::MemStorage>, id: &str, quantity: u32) {
        cart.execute(SetQuantity {
            item: menu_item(id),
            quantity,
        })
        .expect("set quantity");
    }

    #[test]
    fn total_follows_last_quantity_per_item() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        let ids = ["veg01", "veg02", "nonveg02", "juice01", "des02"];
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut expected = BTreeMap::new();

        for _ in 0..200 {
            let id = ids[rng.gen_range(0, ids.len())];
            let quantity = rng.gen_range(0, 4);
            set(&cart, id, quantity);
            expected.insert(id, quantity);

            let want: u64 = expected
                .iter()
                .map(|(id, q)| u64::from(menu_item(id).price) * u64::from(*q))
                .sum();
            assert_eq!(cart.query(CartTotal).expect("total"), want);
        }

        let lines = cart
            .query(ShowCart)
            .expect("show")
            .into_iter()
            .map(|i| (i.item_id, i.quantity))
            .collect::<BTreeMap<_, _>>();
        let nonzero = expected
            .into_iter()
            .filter(|(_, q)| *q > 0)
            .map(|(id, q)| (id.to_string(), q))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(lines, nonzero);
    }

    #[test]
    fn lines_are_unique_per_item() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();

        set(&cart, "veg01", 1);
        set(&cart, "des01", 2);
        set(&cart, "veg01", 3);

        let lines = cart
            .query(ShowCart)
            .expect("show")
            .into_iter()
            .map(|i| (i.item_id, i.quantity))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(
            lines,
            btreemap! {"veg01".to_string() => 3, "des01".to_string() => 2}
        );
        assert_eq!(cart.query(CartCount).expect("count"), 5);
        assert_eq!(cart.query(CartTotal).expect("total"), 3 * 70 + 2 * 40);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        set(&cart, "veg01", 2);

        set(&cart, "veg01", 0);

        assert!(cart.query(ShowCart).expect("show").is_empty());
    }

    #[test]
    fn update_adjusts_existing_lines_only() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        set(&cart, "juice01", 1);

        cart.execute(UpdateQuantity {
            item_id: "juice01".to_string(),
            quantity: 4,
        })
        .expect("update");
        assert_eq!(cart.query(CartTotal).expect("total"), 200);

        let res = cart.execute(UpdateQuantity {
            item_id: "juice02".to_string(),
            quantity: 1,
        });
        assert_eq!(notice(res), CanteenError::NotInCart("juice02".to_string()));

        cart.execute(UpdateQuantity {
            item_id: "juice01".to_string(),
            quantity: 0,
        })
        .expect("update to zero");
        assert!(cart.query(ShowCart).expect("show").is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        set(&cart, "veg01", 1);
        set(&cart, "veg02", 1);

        cart.execute(RemoveItem {
            item_id: "veg01".to_string(),
        })
        .expect("remove");
        assert_eq!(cart.query(CartCount).expect("count"), 1);

        cart.execute(ClearCart).expect("clear");
        assert_eq!(cart.query(CartCount).expect("count"), 0);
    }

    #[test]
    fn unavailable_items_cannot_be_added() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        let mut cake = menu_item("des02");
        cart.execute(SetQuantity {
            item: cake.clone(),
            quantity: 2,
        })
        .expect("while available");
        cake.available = false;

        let res = cart.execute(SetQuantity {
            item: cake.clone(),
            quantity: 3,
        });
        assert_eq!(notice(res), CanteenError::ItemUnavailable);

        cart.execute(SetQuantity {
            item: cake,
            quantity: 1,
        })
        .expect("reducing is fine");
        assert_eq!(cart.query(CartCount).expect("count"), 1);
    }

    #[test]
    fn copied_price_is_kept_on_quantity_update() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        set(&cart, "veg01", 1);

        cart.execute(UpdateQuantity {
            item_id: "veg01".to_string(),
            quantity: 2,
        })
        .expect("update");

        let lines = cart.query(ShowCart).expect("show");
        assert_eq!(lines[0].price, 70);
        assert_eq!(lines[0].name, "Paneer Wrap");
    }

    #[test]
    fn every_change_is_broadcast() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();
        let counts = Arc::new(Mutex::new(Vec::new()));
        {
            let counts = counts.clone();
            let watcher = canteen.cart();
            canteen.store().subscribe(move |key| {
                if key == Key::Cart.name() {
                    let n = watcher.query(CartCount).expect("count");
                    counts.lock().expect("lock").push(n);
                }
            });
        }

        set(&cart, "veg01", 1);
        set(&cart, "veg01", 3);
        cart.execute(ClearCart).expect("clear");

        assert_eq!(*counts.lock().expect("lock"), vec![1, 3, 0]);
    }

    #[test]
    fn removing_a_missing_line_is_quiet() {
        let canteen = junk_drawer::canteen();
        let cart = canteen.cart();

        set(&cart, "veg01", 0);

        assert!(cart.query(ShowCart).expect("show").is_empty());
    }
}
