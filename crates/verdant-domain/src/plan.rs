//! Cultivation plans (recipes).
//!
//! A plan bundles the cultivation instructions for one (plant, seed) pair.
//! The farm-wide template for a pair carries `is_default`; the copy attached
//! to a project never does. Non-default plans version their edits through
//! [`PlanSnapshot`] entries in `edit_history`.

use crate::id::{PlanId, PlantId, SeedId};
use crate::plant::TimeWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fertilizer application point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FertilizerKind {
    Base,
    Top,
}

/// Whether a control step targets a pest or a disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PestKind {
    Pest,
    Disease,
}

/// A named cultivation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultivationStep {
    pub name: String,
    pub description: String,
}

/// Planting density and guidance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlantingGuide {
    pub density: String,
    pub description: String,
}

/// One fertilization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizationStep {
    /// Free-form schedule description ("3 weeks after planting").
    pub fertilization_time: String,
    pub kind: FertilizerKind,
    pub description: String,
}

/// One pest or disease control measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestControlStep {
    pub name: String,
    pub kind: PestKind,
    pub symptoms: String,
    pub description: String,
    pub solutions: Vec<String>,
    pub note: String,
}

/// The editable cultivation fields of a plan.
///
/// Shared between the live document and its history snapshots so a snapshot
/// is always a complete pre-edit picture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContents {
    pub timing_windows: Vec<TimeWindow>,
    pub cultivation_steps: Vec<CultivationStep>,
    pub planting_guide: PlantingGuide,
    pub fertilization_steps: Vec<FertilizationStep>,
    pub pest_control_steps: Vec<PestControlStep>,
    pub best_window: Option<TimeWindow>,
    pub farming_days: Option<u32>,
    pub harvest_days: Option<u32>,
}

/// A pre-edit snapshot pushed to `edit_history` before a non-default plan
/// is mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    #[serde(flatten)]
    pub contents: PlanContents,
    pub is_default: bool,
    pub modified_at: DateTime<Utc>,
    /// The plan's revision stamp at the time of the snapshot.
    pub revised_at: DateTime<Utc>,
}

/// Partial update for a plan. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPatch {
    pub timing_windows: Option<Vec<TimeWindow>>,
    pub cultivation_steps: Option<Vec<CultivationStep>>,
    pub planting_guide: Option<PlantingGuide>,
    pub fertilization_steps: Option<Vec<FertilizationStep>>,
    pub pest_control_steps: Option<Vec<PestControlStep>>,
    pub best_window: Option<TimeWindow>,
    pub farming_days: Option<u32>,
    pub harvest_days: Option<u32>,
}

impl PlanPatch {
    /// True when the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timing_windows.is_none()
            && self.cultivation_steps.is_none()
            && self.planting_guide.is_none()
            && self.fertilization_steps.is_none()
            && self.pest_control_steps.is_none()
            && self.best_window.is_none()
            && self.farming_days.is_none()
            && self.harvest_days.is_none()
    }
}

/// A cultivation plan bound to exactly one (plant, seed) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivationPlan {
    pub id: PlanId,
    pub plant: PlantId,
    pub seed: SeedId,
    #[serde(flatten)]
    pub contents: PlanContents,
    pub is_default: bool,
    pub is_edited: bool,
    pub edit_history: Vec<PlanSnapshot>,
    /// Revision stamp: set at creation, refreshed on every update. History
    /// snapshots record the pre-update value.
    pub revised_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CultivationPlan {
    /// Create a plan from its contents.
    #[must_use]
    pub fn new(
        plant: PlantId,
        seed: SeedId,
        contents: PlanContents,
        is_default: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PlanId::new(),
            plant,
            seed,
            contents,
            is_default,
            is_edited: false,
            edit_history: Vec::new(),
            revised_at: now,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }

    /// Snapshot the current state for the edit history.
    #[must_use]
    pub fn snapshot(&self, modified_at: DateTime<Utc>) -> PlanSnapshot {
        PlanSnapshot {
            contents: self.contents.clone(),
            is_default: self.is_default,
            modified_at,
            revised_at: self.revised_at,
        }
    }

    /// Merge a patch into the contents. Supplied fields overwrite, absent
    /// fields are kept.
    pub fn apply_patch(&mut self, patch: PlanPatch) {
        let c = &mut self.contents;
        if let Some(v) = patch.timing_windows {
            c.timing_windows = v;
        }
        if let Some(v) = patch.cultivation_steps {
            c.cultivation_steps = v;
        }
        if let Some(v) = patch.planting_guide {
            c.planting_guide = v;
        }
        if let Some(v) = patch.fertilization_steps {
            c.fertilization_steps = v;
        }
        if let Some(v) = patch.pest_control_steps {
            c.pest_control_steps = v;
        }
        if let Some(v) = patch.best_window {
            c.best_window = Some(v);
        }
        if let Some(v) = patch.farming_days {
            c.farming_days = Some(v);
        }
        if let Some(v) = patch.harvest_days {
            c.harvest_days = Some(v);
        }
    }

    /// Clone this plan's contents into a fresh non-default plan for another
    /// (plant, seed) binding. Used when attaching a recipe to a project.
    #[must_use]
    pub fn clone_for(&self, plant: PlantId, seed: SeedId, now: DateTime<Utc>) -> Self {
        Self::new(plant, seed, self.contents.clone(), false, now)
    }
}
