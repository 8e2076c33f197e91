//! `scombz-store`: versioned, field-scoped key-value persistence on SQLite.
//!
//! Replaces the whole-record read-modify-write of browser storage: each
//! settings or data field is a separate row, and [`Store::update`] runs a
//! single field's read-modify-write inside one transaction.

pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, StoreError};
pub use manager::Store;
pub use types::{Field, Saves, ScombzData, Settings};
