use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{self, CartItem};
use crate::students::Student;
use infra::ids::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Order,
    Received,
    Prepared,
    Unavailable,
}

/// A placed order. Items and total are fixed when the entry is created;
/// only the status changes afterwards. The id is opaque text: entries
/// written by earlier versions carry `ORD<millis>` ids and must still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub entry_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub student_id: String,
    pub student_name: String,
    pub items: Vec<CartItem>,
    pub status: Status,
    pub total: u64,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        *self != Status::Pending
    }
}

impl fmt::Display for Status {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
            Status::Cancelled => "cancelled",
        };
        write!(fmt, "{}", s)
    }
}

impl HistoryEntry {
    pub(super) fn for_cart(
        entry_id: String,
        timestamp: DateTime<Utc>,
        student: &Student,
        items: Vec<CartItem>,
    ) -> Self {
        let total = cart::total(&items);
        HistoryEntry {
            entry_id,
            timestamp,
            kind: EntryKind::Order,
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            items,
            status: Status::Pending,
            total,
        }
    }
}

impl Entity for HistoryEntry {
    const PREFIX: &'static str = "order";
}
