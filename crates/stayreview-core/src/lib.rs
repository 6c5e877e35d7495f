//! stayreview-core — domain logic for threaded stay reviews.
//!
//! This crate owns the entity model, the reply-tree builder, the access
//! policy that gates company reads, the review service that orchestrates
//! them, and the SQLite store behind it.

pub mod access;
pub mod core;
pub mod model;
pub mod store;
pub mod tree;
