//! Core business logic for the fasum admin backend.
//!
//! Services wrap the repositories in `fasum-db` with validation and
//! domain rules; `stats` holds the pure analytics aggregators and
//! `export` the spreadsheet builders.

pub mod export;
pub mod services;
pub mod stats;

pub use services::*;
