//! # candor-client
//!
//! Presentation-layer library for the Candor feedback portal.
//!
//! [`ApiClient`] wraps every server endpoint over HTTP.  The remaining
//! modules are pure display-side logic operating on already-fetched
//! records: filtering and pagination ([`feed`]), CSV export ([`export`]),
//! and dashboard aggregates ([`analytics`]).

pub mod analytics;
pub mod api;
pub mod export;
pub mod feed;

mod error;

pub use api::ApiClient;
pub use error::ClientError;
