//! Service request intake and the one-shot accept/reject machine.
//!
//! A client files a request against one of a farm's packages, listing the
//! plants they want per kind. While the request is `Waiting` the client can
//! amend or withdraw it; acceptance and rejection belong to the farm, and
//! both are terminal.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verdant_catalog::{kind_cap, PackageCatalog};
use verdant_domain::{
    validate_transition, ClientId, FarmId, PackageId, PlantId, PlantKind, RequestId, RequestStatus,
    ServiceRequest,
};
use verdant_store::Collection;

/// Caller-supplied fields for a new service request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDraft {
    /// Proposed start time.
    pub time: Option<DateTime<Utc>>,
    pub herb_list: Vec<PlantId>,
    pub leafy_list: Vec<PlantId>,
    pub root_list: Vec<PlantId>,
    pub fruit_list: Vec<PlantId>,
    pub note: String,
}

/// Amendable fields of a waiting request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestPatch {
    pub time: Option<DateTime<Utc>>,
    pub herb_list: Option<Vec<PlantId>>,
    pub leafy_list: Option<Vec<PlantId>>,
    pub root_list: Option<Vec<PlantId>>,
    pub fruit_list: Option<Vec<PlantId>>,
    pub note: Option<String>,
}

/// Service request operations for one deployment.
#[derive(Debug, Clone)]
pub struct RequestService {
    requests: Arc<Collection<ServiceRequest>>,
    packages: PackageCatalog,
}

impl RequestService {
    #[must_use]
    pub fn new(requests: Arc<Collection<ServiceRequest>>, packages: PackageCatalog) -> Self {
        Self { requests, packages }
    }

    /// File a request against a package. The farm is the package's owner.
    pub async fn create_request(
        &self,
        client: ClientId,
        package: PackageId,
        draft: RequestDraft,
    ) -> Result<ServiceRequest, CoreError> {
        let time = draft
            .time
            .ok_or_else(|| CoreError::InvalidInput("request time is required".into()))?;
        let package_doc = self.packages.package_by_id(package).await?;

        let request = ServiceRequest {
            id: RequestId::new(),
            time,
            client,
            farm: package_doc.farm,
            package,
            herb_list: draft.herb_list,
            leafy_list: draft.leafy_list,
            root_list: draft.root_list,
            fruit_list: draft.fruit_list,
            note: draft.note,
            status: RequestStatus::Waiting,
            created_at: Utc::now(),
        };
        if request.all_plants().is_empty() {
            return Err(CoreError::InvalidInput(
                "a request needs at least one plant".into(),
            ));
        }
        for kind in PlantKind::ALL {
            let cap = kind_cap(&package_doc, kind) as usize;
            if request.list_for(kind).len() > cap {
                return Err(CoreError::InvalidInput(format!(
                    "too many {kind:?} plants for this package (max {cap})"
                )));
            }
        }

        tracing::info!(request = %request.id, %client, farm = %request.farm, "filing service request");
        self.requests.insert(request.clone())?;
        Ok(request)
    }

    /// Look up a request.
    pub async fn request_by_id(&self, id: RequestId) -> Result<ServiceRequest, CoreError> {
        self.requests
            .get(id)
            .ok_or_else(|| CoreError::NotFound(format!("request {id} not found")))
    }

    /// A farm's requests, optionally narrowed to one status, in filing order.
    pub async fn requests_by_farm(
        &self,
        farm: FarmId,
        status: Option<RequestStatus>,
    ) -> Vec<ServiceRequest> {
        self.requests
            .find(|r| r.farm == farm && status.map_or(true, |s| r.status == s))
    }

    /// A client's requests, in filing order.
    pub async fn requests_by_client(&self, client: ClientId) -> Vec<ServiceRequest> {
        self.requests.find(|r| r.client == client)
    }

    /// Amend a waiting request.
    pub async fn update_request(
        &self,
        id: RequestId,
        client: ClientId,
        patch: RequestPatch,
    ) -> Result<ServiceRequest, CoreError> {
        let current = self.client_request(id, client).await?;
        if current.status != RequestStatus::Waiting {
            return Err(CoreError::Conflict(format!(
                "request is already {:?}",
                current.status
            )));
        }

        let outcome = self.requests.try_mutate(id, |request| {
            if let Some(time) = patch.time {
                request.time = time;
            }
            if let Some(list) = patch.herb_list {
                request.herb_list = list;
            }
            if let Some(list) = patch.leafy_list {
                request.leafy_list = list;
            }
            if let Some(list) = patch.root_list {
                request.root_list = list;
            }
            if let Some(list) = patch.fruit_list {
                request.fruit_list = list;
            }
            if let Some(note) = patch.note {
                request.note = note;
            }
            if request.all_plants().is_empty() {
                return Err(CoreError::InvalidInput(
                    "a request needs at least one plant".into(),
                ));
            }
            Ok::<ServiceRequest, CoreError>(request.clone())
        })?;
        Ok(outcome?)
    }

    /// Withdraw a waiting request. Terminal requests stay on file.
    pub async fn delete_request(&self, id: RequestId, client: ClientId) -> Result<(), CoreError> {
        let current = self.client_request(id, client).await?;
        if current.status != RequestStatus::Waiting {
            return Err(CoreError::Conflict(format!(
                "request is already {:?}",
                current.status
            )));
        }
        tracing::info!(request = %id, %client, "withdrawing service request");
        self.requests.remove(id)?;
        Ok(())
    }

    /// Reject a waiting request.
    pub async fn reject(&self, id: RequestId, farm: FarmId) -> Result<ServiceRequest, CoreError> {
        let current = self.farm_request(id, farm).await?;
        validate_transition(current.status, RequestStatus::Rejected)?;

        let updated = self
            .requests
            .mutate(id, |request| request.status = RequestStatus::Rejected)?;
        tracing::info!(request = %id, %farm, "rejected service request");
        Ok(updated)
    }

    /// Flip a request to `Accepted`. Called by the acceptance workflow once
    /// the garden exists; the status machine is re-checked inside the write.
    pub(crate) async fn mark_accepted(&self, id: RequestId) -> Result<ServiceRequest, CoreError> {
        let outcome = self.requests.try_mutate(id, |request| {
            validate_transition(request.status, RequestStatus::Accepted)?;
            request.status = RequestStatus::Accepted;
            Ok::<ServiceRequest, CoreError>(request.clone())
        })?;
        outcome
    }

    pub(crate) async fn farm_request(
        &self,
        id: RequestId,
        farm: FarmId,
    ) -> Result<ServiceRequest, CoreError> {
        let request = self.request_by_id(id).await?;
        if request.farm != farm {
            return Err(CoreError::Forbidden(
                "farm does not own this request".into(),
            ));
        }
        Ok(request)
    }

    async fn client_request(
        &self,
        id: RequestId,
        client: ClientId,
    ) -> Result<ServiceRequest, CoreError> {
        let request = self.request_by_id(id).await?;
        if request.client != client {
            return Err(CoreError::Forbidden(
                "client does not own this request".into(),
            ));
        }
        Ok(request)
    }
}
