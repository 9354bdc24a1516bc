//! # candor-store
//!
//! Relational persistence for the Candor feedback portal, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for the two
//! domain tables: `users` and `feedbacks`.  Migrations run automatically
//! when a database is opened.

pub mod database;
pub mod feedbacks;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
