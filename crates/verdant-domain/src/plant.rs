//! Catalog plants.

use crate::id::{FarmId, PlantId};
use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad plant category. Service requests group their plant lists by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlantKind {
    Herb,
    Leafy,
    Root,
    Fruit,
}

impl PlantKind {
    /// All kinds, in the order request lists are concatenated.
    pub const ALL: [PlantKind; 4] = [Self::Herb, Self::Leafy, Self::Root, Self::Fruit];
}

/// An inclusive month window (1-12) in which an activity applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

/// A catalog plant owned by a farm.
///
/// The distinguished admin farm owns the global recommendation catalog;
/// regular farms clone entries from it or create their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: PlantId,
    pub farm: FarmId,
    pub name: String,
    pub slug: String,
    pub thumb: String,
    pub description: String,
    pub kind: PlantKind,
    pub timing_windows: Vec<TimeWindow>,
    pub best_window: Option<TimeWindow>,
    /// Days from planting to established growth.
    pub farming_days: Option<u32>,
    /// Days from planting to harvest.
    pub harvest_days: Option<u32>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Plant {
    /// Create a new catalog plant. The slug is derived from the name.
    #[must_use]
    pub fn new(farm: FarmId, name: impl Into<String>, kind: PlantKind, now: DateTime<Utc>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: PlantId::new(),
            farm,
            name,
            slug,
            thumb: String::new(),
            description: String::new(),
            kind,
            timing_windows: Vec::new(),
            best_window: None,
            farming_days: None,
            harvest_days: None,
            is_active: false,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }

    /// Rename the plant, keeping the slug in sync.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.slug = slugify(&self.name);
    }
}
