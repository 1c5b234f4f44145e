//! Verdant document store.
//!
//! An in-memory, concurrent document store with the semantics the service
//! layer depends on:
//!
//! - **Optimistic versioning**: every document carries a monotonic version;
//!   [`Collection::compare_and_swap`] rejects stale writers.
//! - **Atomic element mutation**: [`Collection::mutate`] and
//!   [`Collection::try_mutate`] edit the stored document in place under the
//!   shard lock, so embedded-array edits never go through a lossy
//!   read-modify-write cycle.
//! - **Storage order**: listings are insertion-ordered, which is what makes
//!   "first recipe found" deterministic.
//! - **Tombstones**: soft-deleted documents stay addressable but read as
//!   absent through the `*_active` accessors.

#![warn(unreachable_pub)]

pub mod collection;
pub mod error;

pub use collection::{Collection, Document, Tombstone, Versioned};
pub use error::StoreError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
