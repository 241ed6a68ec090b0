use anyhow::Result;
use log::*;

use infra::persistence::Storage;
use infra::store::Store;

use crate::keys::Key;
use crate::services::{Queryable, Request};

mod models;

pub use self::models::{Category, MenuItem, UnknownCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowMenu {
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupItem {
    pub item_id: String,
}

#[derive(Debug)]
pub struct Menu<S> {
    store: Store<S>,
}

impl<S: Storage> Menu<S> {
    pub fn new(store: Store<S>) -> Self {
        Menu { store }
    }

    fn load(&self, category: Category) -> Vec<MenuItem> {
        self.store.read(&Key::Menu(category).name(), Vec::new())
    }
}

impl Request for ShowMenu {
    type Resp = Vec<MenuItem>;
}

impl<S: Storage> Queryable<ShowMenu> for Menu<S> {
    fn query(&self, req: ShowMenu) -> Result<Vec<MenuItem>> {
        let items = self.load(req.category);
        debug!("{} menu has {} items", req.category, items.len());
        Ok(items)
    }
}

impl Request for LookupItem {
    type Resp = Option<MenuItem>;
}

impl<S: Storage> Queryable<LookupItem> for Menu<S> {
    fn query(&self, req: LookupItem) -> Result<Option<MenuItem>> {
        let found = Category::all()
            .iter()
            .flat_map(|c| self.load(*c))
            .find(|item| item.id == req.item_id);
        trace!("Lookup {} -> {:?}", req.item_id, found);
        Ok(found)
    }
}
