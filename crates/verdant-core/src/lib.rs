//! Verdant core services.
//!
//! The operational half of the system, layered on the catalog and
//! cultivation crates:
//!
//! - [`ProjectService`]: cultivation cycles and their process logs
//! - [`GardenService`]: garden aggregates, deliveries, client requests
//! - [`RequestService`]: service request intake and rejection
//! - [`AcceptanceWorkflow`]: the provisioning saga behind request acceptance
//!
//! Services share state through [`verdant_store::Collection`] handles and
//! are cheap to clone.

#![warn(unreachable_pub)]

pub mod acceptance;
pub mod error;
pub mod gardens;
pub mod process;
pub mod projects;
pub mod requests;

pub use acceptance::{AcceptanceConfig, AcceptanceOutcome, AcceptanceWorkflow};
pub use error::CoreError;
pub use gardens::{ClientRequestDraft, DeliveryPatch, GardenService};
pub use projects::ProjectService;
pub use requests::{RequestDraft, RequestPatch, RequestService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
