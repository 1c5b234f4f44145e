//! Verdant cultivation plan service.
//!
//! Manages [`verdant_domain::CultivationPlan`] documents: the default
//! template per (plant, seed) pair, project-owned copies, per-edit history
//! snapshots, and name-based recommendation lookups against the admin farm's
//! catalog.

#![warn(unreachable_pub)]

pub mod error;
pub mod recipes;

pub use error::RecipeError;
pub use recipes::RecipeService;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
