//! Process-log entry rules.
//!
//! A [`ProcessDraft`] must carry a time, a kind, and the one payload slot
//! matching that kind. Extra payload slots are discarded rather than stored,
//! so an entry's populated slot always agrees with its kind. Updates replace
//! the whole payload after snapshotting the previous state into the entry's
//! history.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use verdant_domain::{ProcessDraft, ProcessEntry, ProcessId, ProcessKind};

fn slot_name(kind: ProcessKind) -> &'static str {
    match kind {
        ProcessKind::Cultivation => "cultivationActivity",
        ProcessKind::Planting => "plantingActivity",
        ProcessKind::Fertilize => "fertilizationActivity",
        ProcessKind::Pesticide => "pestControlActivity",
        ProcessKind::Other => "other",
    }
}

/// Keep only the payload slot matching `kind`, verifying it is present.
fn matched_payload(draft: &ProcessDraft, kind: ProcessKind) -> Result<ProcessDraft, CoreError> {
    let mut keep = ProcessDraft::default();
    let present = match kind {
        ProcessKind::Cultivation => {
            keep.cultivation_activity = draft.cultivation_activity.clone();
            keep.cultivation_activity.is_some()
        }
        ProcessKind::Planting => {
            keep.planting_activity = draft.planting_activity.clone();
            keep.planting_activity.is_some()
        }
        ProcessKind::Fertilize => {
            keep.fertilization_activity = draft.fertilization_activity.clone();
            keep.fertilization_activity.is_some()
        }
        ProcessKind::Pesticide => {
            keep.pest_control_activity = draft.pest_control_activity.clone();
            keep.pest_control_activity.is_some()
        }
        ProcessKind::Other => {
            keep.other = draft.other.clone();
            keep.other.is_some()
        }
    };
    if !present {
        return Err(CoreError::InvalidInput(format!(
            "process of kind {kind:?} requires the {} payload",
            slot_name(kind)
        )));
    }
    Ok(keep)
}

/// Build a fresh process entry from a draft.
///
/// # Errors
/// `InvalidInput` when the draft lacks a time, a kind, or the payload slot
/// matching its kind.
pub fn build_entry(draft: &ProcessDraft, now: DateTime<Utc>) -> Result<ProcessEntry, CoreError> {
    let time = draft
        .time
        .ok_or_else(|| CoreError::InvalidInput("process time is required".into()))?;
    let kind = draft
        .kind
        .ok_or_else(|| CoreError::InvalidInput("process kind is required".into()))?;
    let payload = matched_payload(draft, kind)?;

    Ok(ProcessEntry {
        id: ProcessId::new(),
        time,
        kind,
        cultivation_activity: payload.cultivation_activity,
        planting_activity: payload.planting_activity,
        fertilization_activity: payload.fertilization_activity,
        pest_control_activity: payload.pest_control_activity,
        other: payload.other,
        is_edited: false,
        history: Vec::new(),
        recorded_at: now,
        is_deleted: false,
        deleted_at: None,
    })
}

/// Replace an entry's activity with a draft, snapshotting the prior state.
///
/// The draft fully replaces the entry's time, kind, and payload. The entry's
/// id, history, deletion state, and accumulated snapshots are kept.
pub fn apply_update(
    entry: &mut ProcessEntry,
    draft: &ProcessDraft,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    let time = draft
        .time
        .ok_or_else(|| CoreError::InvalidInput("process time is required".into()))?;
    let kind = draft
        .kind
        .ok_or_else(|| CoreError::InvalidInput("process kind is required".into()))?;
    let payload = matched_payload(draft, kind)?;

    let snap = entry.snapshot(now);
    entry.history.push(snap);
    entry.time = time;
    entry.kind = kind;
    entry.cultivation_activity = payload.cultivation_activity;
    entry.planting_activity = payload.planting_activity;
    entry.fertilization_activity = payload.fertilization_activity;
    entry.pest_control_activity = payload.pest_control_activity;
    entry.other = payload.other;
    entry.is_edited = true;
    entry.recorded_at = now;
    Ok(())
}
