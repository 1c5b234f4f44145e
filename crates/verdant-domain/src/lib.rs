//! Verdant domain model.
//!
//! Entity types, typed identifiers, and status machines for the
//! farm-operations core:
//!
//! - **Catalog**: [`Plant`], [`Seed`], [`ServicePackage`]
//! - **Cultivation**: [`CultivationPlan`] with its versioned edit history
//! - **Projects**: [`Project`] with its process log and info history
//! - **Gardens**: [`Garden`] aggregates, deliveries, client requests
//! - **Requests**: [`ServiceRequest`] and its one-shot status machine
//!
//! This crate is data plus invariants: no I/O, no services. Ownership and
//! authorization rules live in the service crates; storability is declared
//! here via the store's `Document`/`Tombstone` traits.

#![warn(unreachable_pub)]

pub mod garden;
pub mod id;
pub mod package;
pub mod plan;
pub mod plant;
pub mod project;
pub mod request;
pub mod seed;
pub mod slug;
mod storage;

pub use garden::{
    ClientRequest, ClientRequestKind, Delivery, DeliveryItem, DeliveryStatus, Garden, GardenStatus,
};
pub use id::{
    CameraId, ClientId, ClientRequestId, DeliveryId, FarmId, GardenId, InvalidId, PackageId,
    PlanId, PlantId, ProcessId, ProjectId, RequestId, SeedId,
};
pub use package::ServicePackage;
pub use plan::{
    CultivationPlan, CultivationStep, FertilizationStep, FertilizerKind, PestControlStep, PestKind,
    PlanContents, PlanPatch, PlanSnapshot, PlantingGuide,
};
pub use plant::{Plant, PlantKind, TimeWindow};
pub use project::{
    CultivationActivity, FertilizationActivity, InfoPatch, InfoSnapshot, OtherActivity,
    PestControlActivity, PlantingActivity, ProcessDraft, ProcessEntry, ProcessKind,
    ProcessSnapshot, Project, ProjectStatus,
};
pub use request::{
    allowed_transitions, validate_transition, IllegalTransition, RequestStatus, ServiceRequest,
};
pub use seed::Seed;
pub use slug::slugify;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
