//! The garden acceptance workflow.
//!
//! Accepting a service request provisions one project per requested plant
//! (with the plant's default seed and a private copy of its plan template),
//! assembles the garden, and only then flips the request to `Accepted`. The
//! fan-out is bounded and runs under a deadline; when any step fails, every
//! entity provisioned so far is torn down in reverse order so a failed
//! acceptance leaves no half-built garden behind.

use crate::error::CoreError;
use crate::gardens::GardenService;
use crate::projects::ProjectService;
use crate::requests::RequestService;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;
use verdant_catalog::{PlantCatalog, SeedCatalog};
use verdant_cultivation::RecipeService;
use verdant_domain::{
    validate_transition, FarmId, Garden, PlantId, ProjectId, RequestId, RequestStatus,
    ServiceRequest,
};

/// Tuning knobs for the acceptance fan-out.
#[derive(Debug, Clone)]
pub struct AcceptanceConfig {
    /// Concurrent provisioning tasks.
    pub max_in_flight: usize,
    /// Wall-clock budget for checks plus fan-out.
    pub deadline: Duration,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            deadline: Duration::from_secs(30),
        }
    }
}

/// What a successful acceptance produced.
#[derive(Debug, Clone)]
pub struct AcceptanceOutcome {
    pub garden: Garden,
    pub request: ServiceRequest,
}

/// Orchestrates request acceptance across the catalog, cultivation, project,
/// and garden services.
#[derive(Debug, Clone)]
pub struct AcceptanceWorkflow {
    requests: RequestService,
    plants: PlantCatalog,
    seeds: SeedCatalog,
    recipes: RecipeService,
    projects: ProjectService,
    gardens: GardenService,
    config: AcceptanceConfig,
}

impl AcceptanceWorkflow {
    #[must_use]
    pub fn new(
        requests: RequestService,
        plants: PlantCatalog,
        seeds: SeedCatalog,
        recipes: RecipeService,
        projects: ProjectService,
        gardens: GardenService,
        config: AcceptanceConfig,
    ) -> Self {
        Self {
            requests,
            plants,
            seeds,
            recipes,
            projects,
            gardens,
            config,
        }
    }

    /// Accept a waiting request and build its garden.
    ///
    /// `start_date` defaults to the moment of acceptance; the projects and
    /// the garden share the same stamp either way.
    pub async fn accept(
        &self,
        id: RequestId,
        farm: FarmId,
        note: impl Into<String>,
        start_date: Option<DateTime<Utc>>,
    ) -> Result<AcceptanceOutcome, CoreError> {
        let request = self.requests.farm_request(id, farm).await?;
        validate_transition(request.status, RequestStatus::Accepted)?;

        let plant_ids = request.all_plants();
        if plant_ids.is_empty() {
            return Err(CoreError::InvalidInput(
                "the request lists no plants".into(),
            ));
        }
        tracing::info!(request = %id, %farm, plants = plant_ids.len(), "accepting service request");

        // Completion log shared with the fan-out so a deadline hit can still
        // tear down whatever landed before the cutoff.
        let created: Mutex<Vec<ProjectId>> = Mutex::new(Vec::new());
        let start = start_date.unwrap_or_else(Utc::now);

        let run = timeout(self.config.deadline, async {
            self.verify_plants(&plant_ids).await?;
            self.provision_all(&plant_ids, farm, start, &created).await
        })
        .await;

        let projects: Vec<ProjectId> = match run {
            Ok(Ok(projects)) => projects,
            Ok(Err(err)) => {
                self.compensate(&created).await;
                return Err(err);
            }
            Err(_) => {
                self.compensate(&created).await;
                return Err(CoreError::OperationFailed(format!(
                    "acceptance of request {id} exceeded its deadline"
                )));
            }
        };

        let garden = match self
            .gardens
            .create_garden(
                farm,
                request.client,
                projects,
                request.package,
                request.id,
                note,
                start,
            )
            .await
        {
            Ok(garden) => garden,
            Err(err) => {
                self.compensate(&created).await;
                return Err(err);
            }
        };

        // The status flip is last. If a competing accept won the race, tear
        // down this attempt's garden along with its projects.
        match self.requests.mark_accepted(id).await {
            Ok(request) => {
                tracing::info!(request = %id, garden = %garden.id, "request accepted");
                Ok(AcceptanceOutcome { garden, request })
            }
            Err(err) => {
                tracing::warn!(request = %id, error = %err, "status flip failed, rolling back");
                if let Err(rollback) = self.gardens.delete_garden(garden.id, farm).await {
                    tracing::error!(garden = %garden.id, error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Bounded concurrent existence check over the requested plants.
    async fn verify_plants(&self, plant_ids: &[PlantId]) -> Result<(), CoreError> {
        let missing: Vec<PlantId> = futures::stream::iter(plant_ids.iter().copied())
            .map(|plant| {
                let plants = self.plants.clone();
                async move { (plant, plants.check_plant_exists(plant).await) }
            })
            .buffer_unordered(self.config.max_in_flight)
            .filter_map(|(plant, exists)| async move { (!exists).then_some(plant) })
            .collect()
            .await;
        if let Some(plant) = missing.first() {
            return Err(CoreError::NotFound(format!(
                "plant {plant} on the request no longer exists"
            )));
        }
        Ok(())
    }

    /// Provision one project per plant, bounded, preserving request order in
    /// the returned list. The first failure aborts with the error; whatever
    /// landed is already in `created`.
    async fn provision_all(
        &self,
        plant_ids: &[PlantId],
        farm: FarmId,
        start: DateTime<Utc>,
        created: &Mutex<Vec<ProjectId>>,
    ) -> Result<Vec<ProjectId>, CoreError> {
        let results: Vec<Result<ProjectId, CoreError>> =
            futures::stream::iter(plant_ids.iter().copied())
                .map(|plant| self.provision_plant(plant, farm, start, created))
                .buffered(self.config.max_in_flight)
                .collect()
                .await;
        results.into_iter().collect()
    }

    async fn provision_plant(
        &self,
        plant: PlantId,
        farm: FarmId,
        start: DateTime<Utc>,
        created: &Mutex<Vec<ProjectId>>,
    ) -> Result<ProjectId, CoreError> {
        let seed = self.seeds.default_seed_for_plant(plant).await?;
        let project = self
            .projects
            .create_project(farm, plant, seed.id, Some(start))
            .await?;
        created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(project.id);

        let template = self.recipes.resolve_template(plant, seed.id).await?;
        self.projects
            .attach_plan(project.id, farm, template.id)
            .await?;
        Ok(project.id)
    }

    /// Tear down provisioned projects in reverse completion order. Plan
    /// copies go with their project. Rollback failures are logged, not
    /// raised; the original error is what the caller needs.
    async fn compensate(&self, created: &Mutex<Vec<ProjectId>>) {
        let provisioned: Vec<ProjectId> = {
            let mut log = created
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            log.drain(..).rev().collect()
        };
        if provisioned.is_empty() {
            return;
        }
        tracing::warn!(count = provisioned.len(), "rolling back provisioned projects");
        for project in provisioned {
            if let Err(err) = self.projects.delete_project_unchecked(project).await {
                tracing::error!(project = %project, error = %err, "rollback failed");
            }
        }
    }
}
