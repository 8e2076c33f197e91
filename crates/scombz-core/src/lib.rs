//! Shared types, configuration and errors for the ScombZ utilities workspace.

pub mod config;
pub mod error;
pub mod message;
pub mod types;

pub use error::{Result, ScombzError};
