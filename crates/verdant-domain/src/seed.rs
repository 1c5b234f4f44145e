//! Seed varieties.

use crate::id::{PlantId, SeedId};
use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seed variety of a catalog plant, owned transitively by the plant's farm.
///
/// At most one non-deleted seed per plant carries `is_default`; the first
/// seed added for a plant is marked default automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub id: SeedId,
    pub plant: PlantId,
    pub name: String,
    pub slug: String,
    pub thumb: String,
    pub description: String,
    pub is_default: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Seed {
    /// Create a new seed. Defaultness is decided by the catalog service.
    #[must_use]
    pub fn new(plant: PlantId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: SeedId::new(),
            plant,
            name,
            slug,
            thumb: String::new(),
            description: String::new(),
            is_default: false,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }
}
