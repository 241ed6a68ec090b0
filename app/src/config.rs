use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::*;
use serde::{Deserialize, Serialize};

use infra::persistence::SledStorage;

const ENV_PREFIX: &str = "CANTEEN_";

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct Config {
    pub store: StoreConfig,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// Settings that may be supplied through `CANTEEN_*` environment variables.
#[derive(Deserialize, Debug, Default)]
struct EnvOverrides {
    data_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Default)]
pub struct EnvLogger {
    level: Option<LogLevel>,
    #[serde(default)]
    modules: HashMap<String, LogLevel>,
    #[serde(default)]
    timestamp_nanos: bool,
}

impl Config {
    pub fn from_toml(src: &str) -> Result<Self> {
        let config = toml::from_str(src).context("parse config")?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        let overrides = envy::prefixed(ENV_PREFIX)
            .from_env::<EnvOverrides>()
            .context("read environment")?;
        self.apply(overrides);
        Ok(())
    }

    fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(path) = overrides.data_path {
            debug!("Store path overridden from environment: {:?}", path);
            self.store.path = path;
        }
    }
}

impl StoreConfig {
    pub(crate) fn build(&self) -> Result<SledStorage> {
        debug!("Build store from {:?}", self);
        SledStorage::open(&self.path).context("open store")
    }
}

impl LogLevel {
    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl EnvLogger {
    pub fn builder(&self) -> env_logger::Builder {
        let mut b = env_logger::Builder::from_default_env();
        if let Some(level) = self.level {
            b.filter_level(level.to_filter());
        }

        for (module, level) in self.modules.iter() {
            b.filter_module(module, level.to_filter());
        }

        if self.timestamp_nanos {
            b.format_timestamp_nanos();
        }

        b
    }
}
