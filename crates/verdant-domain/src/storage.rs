//! Storability wiring: every persisted entity declares its primary id, and
//! soft-deletable entities expose their tombstone fields.

use crate::garden::Garden;
use crate::id::{GardenId, PackageId, PlanId, PlantId, ProjectId, RequestId, SeedId};
use crate::package::ServicePackage;
use crate::plan::CultivationPlan;
use crate::plant::Plant;
use crate::project::Project;
use crate::request::ServiceRequest;
use crate::seed::Seed;
use chrono::{DateTime, Utc};
use verdant_store::{Document, Tombstone};

macro_rules! document {
    ($ty:ty, $id:ty) => {
        impl Document for $ty {
            type Id = $id;

            fn id(&self) -> $id {
                self.id
            }
        }
    };
}

macro_rules! tombstone {
    ($ty:ty) => {
        impl Tombstone for $ty {
            fn is_deleted(&self) -> bool {
                self.is_deleted
            }

            fn mark_deleted(&mut self, at: DateTime<Utc>) {
                self.is_deleted = true;
                self.deleted_at = Some(at);
            }
        }
    };
}

document!(Plant, PlantId);
document!(Seed, SeedId);
document!(ServicePackage, PackageId);
document!(CultivationPlan, PlanId);
document!(Project, ProjectId);
document!(Garden, GardenId);
document!(ServiceRequest, RequestId);

tombstone!(Plant);
tombstone!(Seed);
tombstone!(ServicePackage);
tombstone!(CultivationPlan);
tombstone!(Project);
tombstone!(Garden);
// ServiceRequest has no tombstone: a waiting request its client withdraws is
// removed outright, and terminal requests are kept as part of the audit trail.
