//! Garden aggregates: the contract binding a farm, a client, and the
//! projects spawned from an accepted service request.

use crate::id::{
    CameraId, ClientId, ClientRequestId, DeliveryId, FarmId, GardenId, PackageId, PlantId,
    ProjectId, RequestId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GardenStatus {
    Started,
    End,
    Cancel,
}

/// Status of a delivery batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStatus {
    Coming,
    Done,
    Cancel,
}

/// One plant line in a delivery or delivery request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryItem {
    pub plant: PlantId,
    pub amount: f64,
}

/// A farm-initiated delivery batch embedded in a garden.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub time: DateTime<Utc>,
    pub items: Vec<DeliveryItem>,
    pub note: String,
    pub status: DeliveryStatus,
    pub client_accept: bool,
    pub client_note: String,
}

/// Kind of an ad-hoc client request inside a garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientRequestKind {
    NewPlant,
    DeliveryRequest,
    Other,
}

/// An ad-hoc client ask embedded in a garden. The payload matching `kind`
/// is populated, the rest stays empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub id: ClientRequestId,
    pub time: DateTime<Utc>,
    pub kind: ClientRequestKind,
    pub new_plant: Option<PlantId>,
    pub items: Vec<DeliveryItem>,
    pub note: String,
}

/// The garden aggregate created when a service request is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garden {
    pub id: GardenId,
    pub farm: FarmId,
    pub client: ClientId,
    pub projects: Vec<ProjectId>,
    pub package: PackageId,
    pub request: RequestId,
    pub note: String,
    pub start_date: DateTime<Utc>,
    pub client_requests: Vec<ClientRequest>,
    pub deliveries: Vec<Delivery>,
    pub status: GardenStatus,
    pub camera_ids: Vec<CameraId>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Garden {
    /// Assemble a garden from an accepted request's output.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        farm: FarmId,
        client: ClientId,
        projects: Vec<ProjectId>,
        package: PackageId,
        request: RequestId,
        note: impl Into<String>,
        start_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GardenId::new(),
            farm,
            client,
            projects,
            package,
            request,
            note: note.into(),
            start_date,
            client_requests: Vec::new(),
            deliveries: Vec::new(),
            status: GardenStatus::Started,
            camera_ids: Vec::new(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        }
    }

    /// Find a delivery by id.
    #[must_use]
    pub fn delivery(&self, id: DeliveryId) -> Option<&Delivery> {
        self.deliveries.iter().find(|d| d.id == id)
    }

    /// Find a client request by id.
    #[must_use]
    pub fn client_request(&self, id: ClientRequestId) -> Option<&ClientRequest> {
        self.client_requests.iter().find(|r| r.id == id)
    }
}
