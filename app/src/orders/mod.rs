use anyhow::Result;
use chrono::Utc;
use log::*;

use infra::ids::IdGen;
use infra::persistence::Storage;
use infra::store::Store;

use crate::cart::{Cart, ClearCart, ShowCart};
use crate::errors::CanteenError;
use crate::keys::Key;
use crate::services::{Commandable, Queryable, Request};
use crate::students::Student;

mod models;

pub use self::models::{EntryKind, HistoryEntry, Status};

/// Turns the current student's cart into a pending order and empties the
/// cart.
///
/// Like every store write, a history write that the storage refuses (for
/// instance when it is full) is logged and dropped. The cart is still
/// cleared and the new entry is still returned, so the order is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOrder;

/// Moves a pending order to `completed` or `cancelled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatus {
    pub entry_id: String,
    pub status: Status,
}

/// All orders, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedOrders;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindEntry {
    pub entry_id: String,
}

#[derive(Debug)]
pub struct Orders<S> {
    store: Store<S>,
    cart: Cart<S>,
    idgen: IdGen,
}

impl<S: Storage> Orders<S> {
    pub fn new(store: Store<S>, idgen: IdGen) -> Self {
        let cart = Cart::new(store.clone());
        Orders { store, cart, idgen }
    }

    fn load(&self) -> Vec<HistoryEntry> {
        self.store.read(&Key::History.name(), Vec::new())
    }
}

impl Request for PlaceOrder {
    type Resp = HistoryEntry;
}

impl<S: Storage> Commandable<PlaceOrder> for Orders<S> {
    fn execute(&self, _: PlaceOrder) -> Result<HistoryEntry> {
        let student: Student = self
            .store
            .read(&Key::CurrentStudent.name(), None)
            .ok_or(CanteenError::NoStudentSelected)?;
        let items = self.cart.query(ShowCart)?;
        if items.is_empty() {
            return Err(CanteenError::EmptyCart.into());
        }

        let entry = HistoryEntry::for_cart(
            self.idgen.generate::<HistoryEntry>().to_string(),
            Utc::now(),
            &student,
            items,
        );
        let mut history = self.load();
        history.insert(0, entry.clone());
        self.store.write(&Key::History.name(), &history);
        self.cart.execute(ClearCart)?;

        info!(
            "Placed order {} for {} totalling {}",
            entry.entry_id, entry.student_id, entry.total
        );
        Ok(entry)
    }
}

impl Request for SetStatus {
    type Resp = HistoryEntry;
}

impl<S: Storage> Commandable<SetStatus> for Orders<S> {
    fn execute(&self, req: SetStatus) -> Result<HistoryEntry> {
        let SetStatus { entry_id, status } = req;
        if status == Status::Pending {
            return Err(CanteenError::InvalidTransition(status).into());
        }

        let mut history = self.load();
        let entry = history
            .iter_mut()
            .find(|e| e.entry_id == entry_id)
            .ok_or_else(|| CanteenError::EntryNotFound(entry_id.clone()))?;
        if entry.status.is_terminal() {
            warn!(
                "Refusing to move {} from {} to {}",
                entry_id, entry.status, status
            );
            return Err(CanteenError::NotPending(entry.status).into());
        }
        entry.status = status;
        let updated = entry.clone();

        self.store.write(&Key::History.name(), &history);
        info!("Order {} is now {}", entry_id, status);
        Ok(updated)
    }
}

impl Request for ShowHistory {
    type Resp = Vec<HistoryEntry>;
}

impl<S: Storage> Queryable<ShowHistory> for Orders<S> {
    fn query(&self, _: ShowHistory) -> Result<Vec<HistoryEntry>> {
        Ok(self.load())
    }
}

impl Request for CompletedOrders {
    type Resp = Vec<HistoryEntry>;
}

impl<S: Storage> Queryable<CompletedOrders> for Orders<S> {
    fn query(&self, _: CompletedOrders) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .load()
            .into_iter()
            .filter(|e| e.status == Status::Completed)
            .collect())
    }
}

impl Request for FindEntry {
    type Resp = Option<HistoryEntry>;
}

impl<S: Storage> Queryable<FindEntry> for Orders<S> {
    fn query(&self, req: FindEntry) -> Result<Option<HistoryEntry>> {
        Ok(self.load().into_iter().find(|e| e.entry_id == req.entry_id))
    }
}
