//! Verdant catalog services.
//!
//! Farm-facing management of the three catalog entities:
//!
//! - [`PlantCatalog`]: plants, including clones from the admin farm's
//!   recommendation catalog
//! - [`SeedCatalog`]: seed varieties and the one-default-per-plant rule
//! - [`PackageCatalog`]: service packages and their per-kind plant caps
//!
//! Services are plain handles over shared [`verdant_store::Collection`]s;
//! construct them with the collections they operate on and clone them freely.

#![warn(unreachable_pub)]

pub mod error;
pub mod packages;
pub mod plants;
pub mod seeds;

pub use error::CatalogError;
pub use packages::{kind_cap, NewPackage, PackageCatalog};
pub use plants::{NewPlant, PlantCatalog, PlantPatch};
pub use seeds::{NewSeed, SeedCatalog, SeedPatch};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
