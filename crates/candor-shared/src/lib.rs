//! # candor-shared
//!
//! Types shared between the Candor server and its clients: the wire-level
//! feedback records, the closed category taxonomy, sentiment labels, and
//! the signed bearer-token implementation.
//!
//! This crate does no I/O.  Everything here is plain data plus the pure
//! signing/verification logic for auth tokens.

pub mod sentiment;
pub mod taxonomy;
pub mod token;
pub mod types;

pub use sentiment::SentimentLabel;
pub use token::{AuthClaims, Role};
pub use types::*;
