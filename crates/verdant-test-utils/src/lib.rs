//! Testing utilities for the Verdant workspace
//!
//! Shared fixtures wiring the services over fresh in-memory collections.

#![allow(missing_docs)]

use chrono::Utc;
use std::sync::Arc;
use verdant_catalog::{NewPackage, NewPlant, NewSeed, PackageCatalog, PlantCatalog, SeedCatalog};
use verdant_core::{
    AcceptanceConfig, AcceptanceWorkflow, GardenService, ProjectService, RequestService,
};
use verdant_cultivation::RecipeService;
use verdant_domain::{
    CultivationPlan, FarmId, Garden, PlanContents, Plant, PlantId, PlantKind, Project, Seed,
    SeedId, ServicePackage, ServiceRequest,
};
use verdant_store::Collection;

/// Install a compact tracing subscriber for test output. Safe to call from
/// every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .compact()
        .try_init();
}

/// Every service in the system wired over shared in-memory collections.
#[derive(Clone)]
pub struct World {
    pub plants: Arc<Collection<Plant>>,
    pub seeds: Arc<Collection<Seed>>,
    pub packages: Arc<Collection<ServicePackage>>,
    pub plans: Arc<Collection<CultivationPlan>>,
    pub projects: Arc<Collection<Project>>,
    pub gardens: Arc<Collection<Garden>>,
    pub requests: Arc<Collection<ServiceRequest>>,

    pub admin_farm: FarmId,
    pub plant_catalog: PlantCatalog,
    pub seed_catalog: SeedCatalog,
    pub package_catalog: PackageCatalog,
    pub recipe_service: RecipeService,
    pub project_service: ProjectService,
    pub garden_service: GardenService,
    pub request_service: RequestService,
    pub acceptance: AcceptanceWorkflow,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(AcceptanceConfig::default())
    }

    pub fn with_config(config: AcceptanceConfig) -> Self {
        let plants = Arc::new(Collection::new());
        let seeds = Arc::new(Collection::new());
        let packages = Arc::new(Collection::new());
        let plans = Arc::new(Collection::new());
        let projects = Arc::new(Collection::new());
        let gardens = Arc::new(Collection::new());
        let requests = Arc::new(Collection::new());

        let admin_farm = FarmId::new();
        let plant_catalog = PlantCatalog::new(Arc::clone(&plants), admin_farm);
        let seed_catalog = SeedCatalog::new(Arc::clone(&seeds), Arc::clone(&plants));
        let package_catalog = PackageCatalog::new(Arc::clone(&packages));
        let recipe_service = RecipeService::new(
            Arc::clone(&plans),
            plant_catalog.clone(),
            seed_catalog.clone(),
        );
        let project_service = ProjectService::new(Arc::clone(&projects), recipe_service.clone());
        let garden_service = GardenService::new(Arc::clone(&gardens), project_service.clone());
        let request_service = RequestService::new(Arc::clone(&requests), package_catalog.clone());
        let acceptance = AcceptanceWorkflow::new(
            request_service.clone(),
            plant_catalog.clone(),
            seed_catalog.clone(),
            recipe_service.clone(),
            project_service.clone(),
            garden_service.clone(),
            config,
        );

        Self {
            plants,
            seeds,
            packages,
            plans,
            projects,
            gardens,
            requests,
            admin_farm,
            plant_catalog,
            seed_catalog,
            package_catalog,
            recipe_service,
            project_service,
            garden_service,
            request_service,
            acceptance,
        }
    }

    /// Seed a plant with one default seed under the farm. Returns (plant,
    /// seed) ids.
    pub async fn grow_plant(
        &self,
        farm: FarmId,
        name: &str,
        kind: PlantKind,
        seed_name: &str,
    ) -> (PlantId, SeedId) {
        let plant = self
            .plant_catalog
            .add_plant(
                farm,
                kind,
                NewPlant {
                    name: name.to_string(),
                    ..NewPlant::default()
                },
            )
            .await
            .unwrap();
        let seed = self
            .seed_catalog
            .add_seed(
                plant.id,
                farm,
                NewSeed {
                    name: seed_name.to_string(),
                    ..NewSeed::default()
                },
            )
            .await
            .unwrap();
        (plant.id, seed.id)
    }

    /// Add a default plan template for a (plant, seed) pair.
    pub async fn grow_template(
        &self,
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
    ) -> CultivationPlan {
        self.recipe_service
            .create_plan(farm, plant, seed, sample_contents(), true)
            .await
            .unwrap()
    }

    /// Add a service package under the farm with roomy per-kind caps.
    pub async fn grow_package(&self, farm: FarmId) -> ServicePackage {
        self.package_catalog
            .add_package(farm, sample_package())
            .await
            .unwrap()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sample_contents() -> PlanContents {
    PlanContents {
        farming_days: Some(45),
        harvest_days: Some(60),
        ..PlanContents::default()
    }
}

pub fn sample_package() -> NewPackage {
    NewPackage {
        square_meters: 40.0,
        deliveries_per_week: 2,
        expected_output: 12.5,
        expected_delivery_amount: 1.5,
        price: 900.0,
        herb_max: 4,
        leafy_max: 4,
        root_max: 4,
        fruit_max: 4,
    }
}

/// A start date safely in the future of any fixture's creation stamps.
pub fn sample_start() -> chrono::DateTime<Utc> {
    Utc::now() + chrono::Duration::days(7)
}
