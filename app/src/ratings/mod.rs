use anyhow::Result;
use chrono::Utc;
use log::*;

use infra::ids::IdGen;
use infra::persistence::Storage;
use infra::store::Store;

use crate::errors::CanteenError;
use crate::keys::Key;
use crate::orders::{FindEntry, Orders, Status};
use crate::services::{Commandable, Queryable, Request};
use crate::students::Student;

mod models;

pub use self::models::{Averages, Rating, MAX_STARS};

/// Feedback on a completed order. A score of zero means the diner has not
/// picked one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRating {
    pub entry_id: Option<String>,
    pub service_rating: u8,
    pub taste_rating: u8,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRatings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowAverages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasRating {
    pub entry_id: String,
}

#[derive(Debug)]
pub struct Ratings<S> {
    store: Store<S>,
    orders: Orders<S>,
    idgen: IdGen,
}

impl<S: Storage> Ratings<S> {
    pub fn new(store: Store<S>, idgen: IdGen) -> Self {
        let orders = Orders::new(store.clone(), idgen.clone());
        Ratings {
            store,
            orders,
            idgen,
        }
    }

    fn load(&self) -> Vec<Rating> {
        self.store.read(&Key::Ratings.name(), Vec::new())
    }

    fn check_score(score: u8) -> Result<()> {
        if score > MAX_STARS {
            return Err(CanteenError::RatingOutOfRange(score).into());
        }
        Ok(())
    }
}

impl Request for SubmitRating {
    type Resp = Rating;
}

impl<S: Storage> Commandable<SubmitRating> for Ratings<S> {
    fn execute(&self, req: SubmitRating) -> Result<Rating> {
        let entry_id = req.entry_id.ok_or(CanteenError::NoOrderSelected)?;
        if req.service_rating == 0 || req.taste_rating == 0 {
            return Err(CanteenError::MissingRating.into());
        }
        Self::check_score(req.service_rating)?;
        Self::check_score(req.taste_rating)?;

        let entry = self
            .orders
            .query(FindEntry {
                entry_id: entry_id.clone(),
            })?
            .ok_or_else(|| CanteenError::EntryNotFound(entry_id.clone()))?;
        if entry.status != Status::Completed {
            return Err(CanteenError::NotCompleted.into());
        }

        let mut ratings = self.load();
        if ratings.iter().any(|r| r.entry_id == entry_id) {
            info!("Order {} has already been rated", entry_id);
            return Err(CanteenError::AlreadyRated.into());
        }

        let current: Option<Student> = self.store.read(&Key::CurrentStudent.name(), None);
        let student_id = current
            .map(|s| s.student_id)
            .unwrap_or_else(|| entry.student_id.clone());
        let comments = req
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let rating = Rating {
            rating_id: self.idgen.generate::<Rating>().to_string(),
            entry_id,
            student_id,
            service_rating: req.service_rating,
            taste_rating: req.taste_rating,
            comments,
            timestamp: Utc::now(),
        };
        ratings.push(rating.clone());
        self.store.write(&Key::Ratings.name(), &ratings);
        debug!("Recorded {:?}", rating);
        Ok(rating)
    }
}

impl Request for ListRatings {
    type Resp = Vec<Rating>;
}

impl<S: Storage> Queryable<ListRatings> for Ratings<S> {
    fn query(&self, _: ListRatings) -> Result<Vec<Rating>> {
        Ok(self.load())
    }
}

impl Request for ShowAverages {
    type Resp = Averages;
}

impl<S: Storage> Queryable<ShowAverages> for Ratings<S> {
    fn query(&self, _: ShowAverages) -> Result<Averages> {
        Ok(Averages::of(&self.load()))
    }
}

impl Request for HasRating {
    type Resp = bool;
}

impl<S: Storage> Queryable<HasRating> for Ratings<S> {
    fn query(&self, req: HasRating) -> Result<bool> {
        Ok(self.load().iter().any(|r| r.entry_id == req.entry_id))
    }
}
