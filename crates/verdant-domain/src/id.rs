//! Typed identifiers for every addressable document.
//!
//! Each entity gets its own newtype over a v4 UUID so a `SeedId` can never be
//! handed to an API expecting a `PlantId`. Boundary code parses untrusted
//! strings with [`FromStr`], which is where malformed ids are rejected.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Raised when an identifier string does not parse as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {value}")]
pub struct InvalidId {
    /// Which id type was being parsed.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random id.
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|_| InvalidId {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

entity_id!(
    /// A farm tenant. Farms themselves live outside this core.
    FarmId,
    "farm"
);
entity_id!(
    /// A client account. Clients live outside this core.
    ClientId,
    "client"
);
entity_id!(
    /// A catalog plant.
    PlantId,
    "plant"
);
entity_id!(
    /// A seed variety of a plant.
    SeedId,
    "seed"
);
entity_id!(
    /// A cultivation plan (recipe).
    PlanId,
    "plan"
);
entity_id!(
    /// A cultivation project.
    ProjectId,
    "project"
);
entity_id!(
    /// A process-log entry inside a project.
    ProcessId,
    "process"
);
entity_id!(
    /// A garden service package (capacity/pricing template).
    PackageId,
    "package"
);
entity_id!(
    /// A client's garden service request.
    RequestId,
    "request"
);
entity_id!(
    /// A garden aggregate.
    GardenId,
    "garden"
);
entity_id!(
    /// A delivery batch inside a garden.
    DeliveryId,
    "delivery"
);
entity_id!(
    /// An ad-hoc client request inside a garden.
    ClientRequestId,
    "client request"
);
entity_id!(
    /// A monitoring camera. Cameras live outside this core.
    CameraId,
    "camera"
);
