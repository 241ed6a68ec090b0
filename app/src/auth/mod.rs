use anyhow::Result;
use log::*;

use infra::persistence::Storage;
use infra::store::Store;

use crate::errors::CanteenError;
use crate::keys::Key;
use crate::services::{Commandable, Queryable, Request};

mod models;

pub use self::models::College;

pub const MIN_PASSWORD_LEN: usize = 4;

/// Registers a college and logs it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    pub college_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub college_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentCollege;

#[derive(Debug)]
pub struct Auth<S> {
    store: Store<S>,
}

impl<S: Storage> Auth<S> {
    pub fn new(store: Store<S>) -> Self {
        Auth { store }
    }

    fn colleges(&self) -> Vec<College> {
        self.store.read(&Key::Colleges.name(), Vec::new())
    }

    fn log_in(&self, college: &College) {
        self.store
            .write(&Key::CurrentUser.name(), &college.college_name);
    }
}

impl Request for SignUp {
    type Resp = College;
}

impl<S: Storage> Commandable<SignUp> for Auth<S> {
    fn execute(&self, req: SignUp) -> Result<College> {
        let SignUp {
            college_name,
            password,
        } = req;
        let name = college_name.trim();
        if name.is_empty() || password.trim().is_empty() {
            return Err(CanteenError::MissingFields.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CanteenError::PasswordTooShort(MIN_PASSWORD_LEN).into());
        }

        let mut colleges = self.colleges();
        if colleges.iter().any(|c| c.is_named(name)) {
            info!("Refusing duplicate registration of {:?}", name);
            return Err(CanteenError::CollegeExists.into());
        }

        let college = College::new(name, &password);
        colleges.push(college.clone());
        self.store.write(&Key::Colleges.name(), &colleges);
        self.log_in(&college);
        info!("Registered college {:?}", college.college_name);
        Ok(college)
    }
}

impl Request for Login {
    type Resp = College;
}

impl<S: Storage> Commandable<Login> for Auth<S> {
    fn execute(&self, req: Login) -> Result<College> {
        let college = self
            .colleges()
            .into_iter()
            .find(|c| c.is_named(&req.college_name) && c.password == req.password)
            .ok_or(CanteenError::InvalidCredentials)?;
        self.log_in(&college);
        info!("Logged in as {:?}", college.college_name);
        Ok(college)
    }
}

impl Request for Logout {
    type Resp = ();
}

impl<S: Storage> Commandable<Logout> for Auth<S> {
    fn execute(&self, _: Logout) -> Result<()> {
        self.store.remove(&Key::CurrentUser.name());
        Ok(())
    }
}

impl Request for CurrentCollege {
    type Resp = Option<String>;
}

impl<S: Storage> Queryable<CurrentCollege> for Auth<S> {
    fn query(&self, _: CurrentCollege) -> Result<Option<String>> {
        Ok(self.store.read(&Key::CurrentUser.name(), None))
    }
}
