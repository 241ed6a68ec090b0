use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use infra::ids::Entity;

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating_id: String,
    pub entry_id: String,
    pub student_id: String,
    pub service_rating: u8,
    pub taste_rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Mean scores rounded to one decimal place, the way they are displayed.
/// Both are zero when nothing has been rated yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Averages {
    pub service: f64,
    pub taste: f64,
}

impl Averages {
    pub fn of(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Averages::default();
        }
        let n = ratings.len() as f64;
        let service: f64 = ratings.iter().map(|r| f64::from(r.service_rating)).sum();
        let taste: f64 = ratings.iter().map(|r| f64::from(r.taste_rating)).sum();
        Averages {
            service: one_decimal(service / n),
            taste: one_decimal(taste / n),
        }
    }
}

// Rounds the exact binary value, so 1.15 (stored as 1.1499...) gives 1.1.
fn one_decimal(x: f64) -> f64 {
    format!("{:.1}", x).parse().unwrap_or(x)
}

impl fmt::Display for Averages {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "service {:.1}, taste {:.1}", self.service, self.taste)
    }
}

impl Entity for Rating {
    const PREFIX: &'static str = "rating";
}
