use anyhow::Result;
use log::*;

use infra::ids::IdGen;
use infra::persistence::{SledStorage, Storage};
use infra::store::Store;

pub mod auth;
pub mod cart;
pub mod config;
pub mod errors;
pub mod keys;
pub mod menu;
pub mod orders;
pub mod ratings;
pub mod seed;
pub mod services;
pub mod students;
#[cfg(test)]
mod test;

pub use crate::errors::CanteenError;

/// Entry point for every canteen operation. Services share one store
/// handle; they talk to each other only through what it holds.
#[derive(Debug)]
pub struct Canteen<S> {
    store: Store<S>,
    idgen: IdGen,
}

impl<S: Storage> Canteen<S> {
    pub fn new(store: Store<S>) -> Self {
        let idgen = IdGen::new();
        Canteen { store, idgen }
    }

    pub fn setup(&self) {
        debug!("Init default data");
        seed::setup(&self.store)
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn auth(&self) -> auth::Auth<S> {
        auth::Auth::new(self.store.clone())
    }

    pub fn students(&self) -> students::Students<S> {
        students::Students::new(self.store.clone(), self.idgen.clone())
    }

    pub fn menu(&self) -> menu::Menu<S> {
        menu::Menu::new(self.store.clone())
    }

    pub fn cart(&self) -> cart::Cart<S> {
        cart::Cart::new(self.store.clone())
    }

    pub fn orders(&self) -> orders::Orders<S> {
        orders::Orders::new(self.store.clone(), self.idgen.clone())
    }

    pub fn ratings(&self) -> ratings::Ratings<S> {
        ratings::Ratings::new(self.store.clone(), self.idgen.clone())
    }
}

impl Canteen<SledStorage> {
    pub fn open(config: &config::Config) -> Result<Self> {
        let storage = config.store.build()?;
        info!("Opened canteen store at {:?}", config.store.path);
        Ok(Canteen::new(Store::new(storage)))
    }
}
