//! ghost-migrate - Ghost blog export migration tool
//!
//! Reads a Ghost JSON export, joins posts with their tags, and publishes
//! them to a WordPress XML-RPC endpoint or to Write.as (with a local
//! Markdown archive).

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::MigrateError;
