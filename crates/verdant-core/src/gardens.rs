//! Garden aggregate service.
//!
//! A garden binds a farm, a client, and the projects spawned from an
//! accepted service request. Deliveries and ad-hoc client requests live
//! embedded in the garden document; their mutations are element-positional
//! and go through the collection's atomic draft mechanism.

use crate::error::CoreError;
use crate::projects::ProjectService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verdant_domain::{
    CameraId, ClientId, ClientRequest, ClientRequestId, ClientRequestKind, Delivery, DeliveryId,
    DeliveryItem, DeliveryStatus, FarmId, Garden, GardenId, GardenStatus, PackageId, PlantId,
    Project, ProjectId, RequestId, SeedId,
};
use verdant_store::Collection;

/// Caller-supplied fields of an ad-hoc client request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRequestDraft {
    pub kind: Option<ClientRequestKind>,
    pub new_plant: Option<PlantId>,
    pub items: Vec<DeliveryItem>,
    pub note: String,
}

/// Partial update for a delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryPatch {
    pub items: Option<Vec<DeliveryItem>>,
    pub note: Option<String>,
    pub status: Option<DeliveryStatus>,
}

/// Garden operations for one deployment.
#[derive(Debug, Clone)]
pub struct GardenService {
    gardens: Arc<Collection<Garden>>,
    projects: ProjectService,
}

impl GardenService {
    #[must_use]
    pub fn new(gardens: Arc<Collection<Garden>>, projects: ProjectService) -> Self {
        Self { gardens, projects }
    }

    /// Persist a garden assembled by the acceptance workflow.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_garden(
        &self,
        farm: FarmId,
        client: ClientId,
        project_ids: Vec<ProjectId>,
        package: PackageId,
        request: RequestId,
        note: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Result<Garden, CoreError> {
        let garden = Garden::new(
            farm,
            client,
            project_ids,
            package,
            request,
            note,
            start_date,
            Utc::now(),
        );
        tracing::info!(garden = %garden.id, %farm, %client, "creating garden");
        self.gardens.insert(garden.clone())?;
        Ok(garden)
    }

    /// Look up a live garden.
    pub async fn garden_by_id(&self, id: GardenId) -> Result<Garden, CoreError> {
        self.gardens
            .get_active(id)
            .ok_or_else(|| CoreError::NotFound(format!("garden {id} not found")))
    }

    /// All live gardens run by a farm, in insertion order.
    pub async fn gardens_by_farm(&self, farm: FarmId) -> Vec<Garden> {
        self.gardens.find_active(|g| g.farm == farm)
    }

    /// All live gardens belonging to a client, in insertion order.
    pub async fn gardens_by_client(&self, client: ClientId) -> Vec<Garden> {
        self.gardens.find_active(|g| g.client == client)
    }

    /// The live projects of a garden, resolved in the garden's order.
    pub async fn projects_of_garden(&self, id: GardenId) -> Result<Vec<Project>, CoreError> {
        let garden = self.garden_by_id(id).await?;
        let mut out = Vec::with_capacity(garden.projects.len());
        for project in garden.projects {
            match self.projects.project_by_id(project).await {
                Ok(p) => out.push(p),
                Err(CoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Move a garden to a new status. Re-asserting the current status is
    /// rejected so accidental double submissions surface.
    pub async fn update_status(
        &self,
        id: GardenId,
        farm: FarmId,
        status: GardenStatus,
    ) -> Result<Garden, CoreError> {
        let current = self.owned_garden(id, farm).await?;
        if current.status == status {
            return Err(CoreError::InvalidInput(format!(
                "garden is already {status:?}"
            )));
        }
        let updated = self.gardens.mutate(id, |garden| garden.status = status)?;
        tracing::info!(garden = %id, ?status, "garden status changed");
        Ok(updated)
    }

    /// Tombstone a garden and every project it holds.
    pub async fn delete_garden(&self, id: GardenId, farm: FarmId) -> Result<(), CoreError> {
        let current = self.owned_garden(id, farm).await?;
        for project in &current.projects {
            self.projects.delete_project_unchecked(*project).await?;
        }
        tracing::info!(garden = %id, %farm, projects = current.projects.len(), "deleting garden");
        self.gardens.soft_delete(id, Utc::now())?;
        Ok(())
    }

    /// Spin up an extra project inside a running garden, with a private copy
    /// of the pair's plan template attached. The template is resolved before
    /// anything is created so a pair without one leaves no orphan project.
    pub async fn add_project_to_garden(
        &self,
        id: GardenId,
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
        start_date: Option<DateTime<Utc>>,
    ) -> Result<Project, CoreError> {
        self.owned_garden(id, farm).await?;
        let template = self.projects.recipes().resolve_template(plant, seed).await?;
        let project = self
            .projects
            .create_project(farm, plant, seed, start_date)
            .await?;
        self.projects.attach_plan(project.id, farm, template.id).await?;
        self.gardens.mutate(id, |garden| {
            garden.projects.push(project.id);
        })?;
        tracing::info!(garden = %id, project = %project.id, "added project to garden");
        self.projects.project_by_id(project.id).await
    }

    /// Replace the camera set watching a garden.
    pub async fn set_cameras(
        &self,
        id: GardenId,
        farm: FarmId,
        cameras: Vec<CameraId>,
    ) -> Result<Garden, CoreError> {
        self.owned_garden(id, farm).await?;
        let updated = self.gardens.mutate(id, |garden| garden.camera_ids = cameras)?;
        Ok(updated)
    }

    /// Record a delivery batch. Stamped now, `Coming`, unconfirmed.
    pub async fn add_delivery(
        &self,
        id: GardenId,
        farm: FarmId,
        items: Vec<DeliveryItem>,
        note: impl Into<String>,
    ) -> Result<Delivery, CoreError> {
        self.owned_garden(id, farm).await?;
        validate_items(&items)?;

        let delivery = Delivery {
            id: DeliveryId::new(),
            time: Utc::now(),
            items,
            note: note.into(),
            status: DeliveryStatus::Coming,
            client_accept: false,
            client_note: String::new(),
        };
        let stored = delivery.clone();
        self.gardens.mutate(id, move |garden| {
            garden.deliveries.push(delivery);
        })?;
        tracing::info!(garden = %id, delivery = %stored.id, "recorded delivery");
        Ok(stored)
    }

    /// Update one delivery in place.
    pub async fn update_delivery(
        &self,
        id: GardenId,
        farm: FarmId,
        delivery_id: DeliveryId,
        patch: DeliveryPatch,
    ) -> Result<Delivery, CoreError> {
        self.owned_garden(id, farm).await?;
        if let Some(items) = &patch.items {
            validate_items(items)?;
        }

        let outcome = self.gardens.try_mutate(id, |garden| {
            let delivery = garden
                .deliveries
                .iter_mut()
                .find(|d| d.id == delivery_id)
                .ok_or_else(|| CoreError::NotFound(format!("delivery {delivery_id} not found")))?;
            if let Some(items) = patch.items {
                delivery.items = items;
            }
            if let Some(note) = patch.note {
                delivery.note = note;
            }
            if let Some(status) = patch.status {
                delivery.status = status;
            }
            Ok::<Delivery, CoreError>(delivery.clone())
        })?;
        Ok(outcome?)
    }

    /// Remove one delivery from the garden.
    pub async fn delete_delivery(
        &self,
        id: GardenId,
        farm: FarmId,
        delivery_id: DeliveryId,
    ) -> Result<(), CoreError> {
        self.owned_garden(id, farm).await?;
        let outcome = self.gardens.try_mutate(id, |garden| {
            let before = garden.deliveries.len();
            garden.deliveries.retain(|d| d.id != delivery_id);
            if garden.deliveries.len() == before {
                return Err(CoreError::NotFound(format!(
                    "delivery {delivery_id} not found"
                )));
            }
            Ok::<(), CoreError>(())
        })?;
        outcome
    }

    /// Client confirmation of a delivery batch.
    pub async fn confirm_delivery(
        &self,
        id: GardenId,
        client: ClientId,
        delivery_id: DeliveryId,
        accept: bool,
        note: impl Into<String>,
    ) -> Result<Delivery, CoreError> {
        self.client_garden(id, client).await?;
        let note = note.into();
        let outcome = self.gardens.try_mutate(id, |garden| {
            let delivery = garden
                .deliveries
                .iter_mut()
                .find(|d| d.id == delivery_id)
                .ok_or_else(|| CoreError::NotFound(format!("delivery {delivery_id} not found")))?;
            delivery.client_accept = accept;
            delivery.client_note = note;
            Ok::<Delivery, CoreError>(delivery.clone())
        })?;
        Ok(outcome?)
    }

    /// Record an ad-hoc client ask against the garden.
    pub async fn add_client_request(
        &self,
        id: GardenId,
        client: ClientId,
        draft: ClientRequestDraft,
    ) -> Result<ClientRequest, CoreError> {
        self.client_garden(id, client).await?;
        let request = build_client_request(draft)?;
        let stored = request.clone();
        self.gardens.mutate(id, move |garden| {
            garden.client_requests.push(request);
        })?;
        tracing::info!(garden = %id, request = %stored.id, kind = ?stored.kind, "recorded client request");
        Ok(stored)
    }

    /// Replace one client request in place.
    pub async fn update_client_request(
        &self,
        id: GardenId,
        client: ClientId,
        request_id: ClientRequestId,
        draft: ClientRequestDraft,
    ) -> Result<ClientRequest, CoreError> {
        self.client_garden(id, client).await?;
        let replacement = build_client_request(draft)?;
        let outcome = self.gardens.try_mutate(id, |garden| {
            let slot = garden
                .client_requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| {
                    CoreError::NotFound(format!("client request {request_id} not found"))
                })?;
            slot.kind = replacement.kind;
            slot.new_plant = replacement.new_plant;
            slot.items = replacement.items;
            slot.note = replacement.note;
            Ok::<ClientRequest, CoreError>(slot.clone())
        })?;
        Ok(outcome?)
    }

    /// Remove one client request from the garden.
    pub async fn delete_client_request(
        &self,
        id: GardenId,
        client: ClientId,
        request_id: ClientRequestId,
    ) -> Result<(), CoreError> {
        self.client_garden(id, client).await?;
        let outcome = self.gardens.try_mutate(id, |garden| {
            let before = garden.client_requests.len();
            garden.client_requests.retain(|r| r.id != request_id);
            if garden.client_requests.len() == before {
                return Err(CoreError::NotFound(format!(
                    "client request {request_id} not found"
                )));
            }
            Ok::<(), CoreError>(())
        })?;
        outcome
    }

    async fn owned_garden(&self, id: GardenId, farm: FarmId) -> Result<Garden, CoreError> {
        let garden = self.garden_by_id(id).await?;
        if garden.farm != farm {
            return Err(CoreError::Forbidden("farm does not own this garden".into()));
        }
        Ok(garden)
    }

    async fn client_garden(&self, id: GardenId, client: ClientId) -> Result<Garden, CoreError> {
        let garden = self.garden_by_id(id).await?;
        if garden.client != client {
            return Err(CoreError::Forbidden(
                "client does not belong to this garden".into(),
            ));
        }
        Ok(garden)
    }
}

fn validate_items(items: &[DeliveryItem]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::InvalidInput(
            "a delivery needs at least one item".into(),
        ));
    }
    if items.iter().any(|i| i.amount < 0.0 || !i.amount.is_finite()) {
        return Err(CoreError::InvalidInput(
            "delivery amounts must be finite and not negative".into(),
        ));
    }
    Ok(())
}

/// Check a client-request draft against its kind and build the entry. The
/// payload slot matching the kind is required, the rest is dropped.
fn build_client_request(draft: ClientRequestDraft) -> Result<ClientRequest, CoreError> {
    let kind = draft
        .kind
        .ok_or_else(|| CoreError::InvalidInput("client request kind is required".into()))?;
    let mut request = ClientRequest {
        id: ClientRequestId::new(),
        time: Utc::now(),
        kind,
        new_plant: None,
        items: Vec::new(),
        note: draft.note,
    };
    match kind {
        ClientRequestKind::NewPlant => {
            request.new_plant = Some(draft.new_plant.ok_or_else(|| {
                CoreError::InvalidInput("a newPlant request needs a plant".into())
            })?);
        }
        ClientRequestKind::DeliveryRequest => {
            validate_items(&draft.items)?;
            request.items = draft.items;
        }
        ClientRequestKind::Other => {
            if request.note.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "an other request needs a note".into(),
                ));
            }
        }
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_request_payload_must_match_kind() {
        let missing_plant = build_client_request(ClientRequestDraft {
            kind: Some(ClientRequestKind::NewPlant),
            ..ClientRequestDraft::default()
        });
        assert!(matches!(missing_plant, Err(CoreError::InvalidInput(_))));

        let missing_items = build_client_request(ClientRequestDraft {
            kind: Some(ClientRequestKind::DeliveryRequest),
            ..ClientRequestDraft::default()
        });
        assert!(matches!(missing_items, Err(CoreError::InvalidInput(_))));

        let ok = build_client_request(ClientRequestDraft {
            kind: Some(ClientRequestKind::Other),
            note: "more rosemary please".into(),
            ..ClientRequestDraft::default()
        })
        .unwrap();
        assert_eq!(ok.kind, ClientRequestKind::Other);
        assert!(ok.items.is_empty());
    }

    #[test]
    fn unmatched_payload_slots_are_dropped() {
        let request = build_client_request(ClientRequestDraft {
            kind: Some(ClientRequestKind::NewPlant),
            new_plant: Some(PlantId::new()),
            items: vec![DeliveryItem {
                plant: PlantId::new(),
                amount: 1.0,
            }],
            note: String::new(),
        })
        .unwrap();
        assert!(request.new_plant.is_some());
        assert!(request.items.is_empty());
    }

    #[test]
    fn delivery_amounts_must_be_finite_and_nonnegative() {
        let plant = PlantId::new();
        assert!(validate_items(&[DeliveryItem { plant, amount: 0.5 }]).is_ok());
        assert!(validate_items(&[DeliveryItem { plant, amount: -0.5 }]).is_err());
        assert!(validate_items(&[DeliveryItem {
            plant,
            amount: f64::NAN
        }])
        .is_err());
        assert!(validate_items(&[]).is_err());
    }
}
