pub mod ids;
pub mod persistence;
pub mod store;
