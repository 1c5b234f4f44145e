//! Garden service requests and their status machine.

use crate::id::{ClientId, FarmId, PackageId, PlantId, RequestId};
use crate::plant::PlantKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a service request. Transitions are one-shot:
/// `Waiting -> Accepted` or `Waiting -> Rejected`, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    Waiting,
    Accepted,
    Rejected,
}

/// Raised on an attempt to move a request out of a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal request transition: {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

/// Statuses reachable from `from`.
#[must_use]
pub fn allowed_transitions(from: RequestStatus) -> &'static [RequestStatus] {
    match from {
        RequestStatus::Waiting => &[RequestStatus::Accepted, RequestStatus::Rejected],
        RequestStatus::Accepted | RequestStatus::Rejected => &[],
    }
}

/// Validates a request status transition.
pub fn validate_transition(from: RequestStatus, to: RequestStatus) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

/// A client's proposal for a contracted garden: up to four plant lists plus
/// the service package it should be priced against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: RequestId,
    /// Client-proposed start time.
    pub time: DateTime<Utc>,
    pub client: ClientId,
    pub farm: FarmId,
    pub package: PackageId,
    pub herb_list: Vec<PlantId>,
    pub leafy_list: Vec<PlantId>,
    pub root_list: Vec<PlantId>,
    pub fruit_list: Vec<PlantId>,
    pub note: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// The four plant lists concatenated in kind order (herb, leafy, root,
    /// fruit), the order acceptance fans out in.
    #[must_use]
    pub fn all_plants(&self) -> Vec<PlantId> {
        let mut all =
            Vec::with_capacity(self.herb_list.len() + self.leafy_list.len() + self.root_list.len() + self.fruit_list.len());
        all.extend_from_slice(&self.herb_list);
        all.extend_from_slice(&self.leafy_list);
        all.extend_from_slice(&self.root_list);
        all.extend_from_slice(&self.fruit_list);
        all
    }

    /// The list for one plant kind.
    #[must_use]
    pub fn list_for(&self, kind: PlantKind) -> &[PlantId] {
        match kind {
            PlantKind::Herb => &self.herb_list,
            PlantKind::Leafy => &self.leafy_list,
            PlantKind::Root => &self.root_list,
            PlantKind::Fruit => &self.fruit_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_can_accept_or_reject() {
        assert!(validate_transition(RequestStatus::Waiting, RequestStatus::Accepted).is_ok());
        assert!(validate_transition(RequestStatus::Waiting, RequestStatus::Rejected).is_ok());
    }

    #[test]
    fn terminal_statuses_are_sticky() {
        for from in [RequestStatus::Accepted, RequestStatus::Rejected] {
            for to in [
                RequestStatus::Waiting,
                RequestStatus::Accepted,
                RequestStatus::Rejected,
            ] {
                assert!(validate_transition(from, to).is_err());
            }
        }
    }

    #[test]
    fn no_self_transition_while_waiting() {
        assert!(validate_transition(RequestStatus::Waiting, RequestStatus::Waiting).is_err());
    }

    #[test]
    fn all_plants_concatenates_in_kind_order() {
        let herb = PlantId::new();
        let root = PlantId::new();
        let req = ServiceRequest {
            id: RequestId::new(),
            time: Utc::now(),
            client: ClientId::new(),
            farm: FarmId::new(),
            package: PackageId::new(),
            herb_list: vec![herb],
            leafy_list: vec![],
            root_list: vec![root],
            fruit_list: vec![],
            note: String::new(),
            status: RequestStatus::Waiting,
            created_at: Utc::now(),
        };
        assert_eq!(req.all_plants(), vec![herb, root]);
        assert_eq!(req.list_for(PlantKind::Root), &[root]);
    }
}
