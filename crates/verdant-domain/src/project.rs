//! Cultivation projects and their process logs.

use crate::id::{FarmId, PlanId, PlantId, ProcessId, ProjectId, SeedId};
use crate::plan::{FertilizerKind, PestKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    InProgress,
    Harvesting,
    AlmostFinished,
    Finished,
    Cancel,
}

/// Activity type of a process-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessKind {
    Cultivation,
    Planting,
    Fertilize,
    Pesticide,
    Other,
}

/// Payload for a cultivation activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultivationActivity {
    pub name: String,
    pub description: String,
}

/// Payload for a planting activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingActivity {
    pub density: String,
    pub description: String,
}

/// Payload for a fertilization activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizationActivity {
    pub fertilization_time: String,
    pub kind: FertilizerKind,
    pub description: String,
}

/// Payload for a pest/disease control activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestControlActivity {
    pub name: String,
    pub kind: PestKind,
    pub symptoms: String,
    pub description: String,
    pub solutions: Vec<String>,
    pub note: String,
}

/// Payload for an uncategorized activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherActivity {
    pub description: String,
}

/// The caller-supplied fields of a process entry: a dated activity with the
/// payload slot matching its kind.
///
/// Used both for appends and for updates. On update the draft *replaces* the
/// entry's payload: slots carried here are written, slots absent here are
/// cleared on the stored entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDraft {
    pub time: Option<DateTime<Utc>>,
    pub kind: Option<ProcessKind>,
    pub cultivation_activity: Option<CultivationActivity>,
    pub planting_activity: Option<PlantingActivity>,
    pub fertilization_activity: Option<FertilizationActivity>,
    pub pest_control_activity: Option<PestControlActivity>,
    pub other: Option<OtherActivity>,
}

/// Snapshot of a process entry before an edit: the entry minus its id,
/// history, and edit flag, stamped with the edit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSnapshot {
    pub time: DateTime<Utc>,
    pub kind: ProcessKind,
    pub cultivation_activity: Option<CultivationActivity>,
    pub planting_activity: Option<PlantingActivity>,
    pub fertilization_activity: Option<FertilizationActivity>,
    pub pest_control_activity: Option<PestControlActivity>,
    pub other: Option<OtherActivity>,
    pub recorded_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// One dated activity record in a project's process log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessEntry {
    pub id: ProcessId,
    pub time: DateTime<Utc>,
    pub kind: ProcessKind,
    pub cultivation_activity: Option<CultivationActivity>,
    pub planting_activity: Option<PlantingActivity>,
    pub fertilization_activity: Option<FertilizationActivity>,
    pub pest_control_activity: Option<PestControlActivity>,
    pub other: Option<OtherActivity>,
    pub is_edited: bool,
    pub history: Vec<ProcessSnapshot>,
    /// Revision stamp: set on append, refreshed on update.
    pub recorded_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ProcessEntry {
    /// Snapshot the current state for the entry's edit history.
    #[must_use]
    pub fn snapshot(&self, modified_at: DateTime<Utc>) -> ProcessSnapshot {
        ProcessSnapshot {
            time: self.time,
            kind: self.kind,
            cultivation_activity: self.cultivation_activity.clone(),
            planting_activity: self.planting_activity.clone(),
            fertilization_activity: self.fertilization_activity.clone(),
            pest_control_activity: self.pest_control_activity.clone(),
            other: self.other.clone(),
            recorded_at: self.recorded_at,
            modified_at,
        }
    }
}

/// Snapshot of a project's mutable info before an info edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub seed: SeedId,
    pub start_date: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
}

/// Accepted fields of a project info update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPatch {
    pub seed: Option<SeedId>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<ProjectStatus>,
}

impl InfoPatch {
    /// True when the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seed.is_none() && self.start_date.is_none() && self.status.is_none()
    }
}

/// One cultivation cycle for a (farm, plant, seed) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub farm: FarmId,
    pub plant: PlantId,
    pub seed: SeedId,
    pub start_date: Option<DateTime<Utc>>,
    /// The plan this project exclusively owns, once attached.
    pub plan: Option<PlanId>,
    pub process: Vec<ProcessEntry>,
    pub status: ProjectStatus,
    /// Revision stamp: set at creation, refreshed on info updates.
    pub recorded_at: DateTime<Utc>,
    pub is_info_edited: bool,
    pub history_info: Vec<InfoSnapshot>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project in the given status.
    #[must_use]
    pub fn new(
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
        status: ProjectStatus,
        start_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            farm,
            plant,
            seed,
            start_date,
            plan: None,
            process: Vec::new(),
            status,
            recorded_at: now,
            is_info_edited: false,
            history_info: Vec::new(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }

    /// Snapshot the current info for the project's info history.
    #[must_use]
    pub fn info_snapshot(&self, modified_at: DateTime<Utc>) -> InfoSnapshot {
        InfoSnapshot {
            recorded_at: self.recorded_at,
            seed: self.seed,
            start_date: self.start_date,
            modified_at,
        }
    }

    /// Find a process entry by id.
    #[must_use]
    pub fn process_entry(&self, id: ProcessId) -> Option<&ProcessEntry> {
        self.process.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_snapshot_carries_prior_seed_and_start() {
        let start = Utc::now();
        let project = Project::new(
            FarmId::new(),
            PlantId::new(),
            SeedId::new(),
            ProjectStatus::InProgress,
            Some(start),
            Utc::now(),
        );
        let at = Utc::now();
        let snap = project.info_snapshot(at);
        assert_eq!(snap.seed, project.seed);
        assert_eq!(snap.start_date, Some(start));
        assert_eq!(snap.recorded_at, project.recorded_at);
    }

    #[test]
    fn process_snapshot_excludes_meta() {
        let entry = ProcessEntry {
            id: ProcessId::new(),
            time: Utc::now(),
            kind: ProcessKind::Other,
            cultivation_activity: None,
            planting_activity: None,
            fertilization_activity: None,
            pest_control_activity: None,
            other: Some(OtherActivity {
                description: "weeding".into(),
            }),
            is_edited: true,
            history: Vec::new(),
            recorded_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        };
        let snap = entry.snapshot(Utc::now());
        assert_eq!(snap.kind, ProcessKind::Other);
        assert_eq!(snap.other, entry.other);
        // Snapshots have no edit flag or nested history by construction; the
        // type system enforces the exclusion.
    }
}
