//! Plant catalog service.
//!
//! Plants are owned by a farm; a distinguished admin farm holds the global
//! recommendation catalog that regular farms clone entries from. Names are
//! unique per farm among live plants.

use crate::error::CatalogError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verdant_domain::{FarmId, Plant, PlantId, PlantKind, TimeWindow};
use verdant_store::Collection;

/// Caller-supplied fields for a new plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPlant {
    pub name: String,
    pub thumb: String,
    pub description: String,
    pub timing_windows: Vec<TimeWindow>,
    pub best_window: Option<TimeWindow>,
    pub farming_days: Option<u32>,
    pub harvest_days: Option<u32>,
}

/// Partial update for a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub thumb: Option<String>,
    pub description: Option<String>,
    pub timing_windows: Option<Vec<TimeWindow>>,
    pub best_window: Option<TimeWindow>,
    pub farming_days: Option<u32>,
    pub harvest_days: Option<u32>,
    pub is_active: Option<bool>,
}

/// Plant catalog operations for one deployment.
#[derive(Debug, Clone)]
pub struct PlantCatalog {
    plants: Arc<Collection<Plant>>,
    /// Owner of the recommendation catalog.
    admin_farm: FarmId,
}

impl PlantCatalog {
    #[must_use]
    pub fn new(plants: Arc<Collection<Plant>>, admin_farm: FarmId) -> Self {
        Self { plants, admin_farm }
    }

    /// The farm whose plants act as global recommendations.
    #[must_use]
    pub fn admin_farm(&self) -> FarmId {
        self.admin_farm
    }

    /// Create a plant in a farm's own catalog. Starts inactive.
    ///
    /// # Errors
    /// `Conflict` when a live plant of the same name already exists in the
    /// farm.
    pub async fn add_plant(
        &self,
        farm: FarmId,
        kind: PlantKind,
        data: NewPlant,
    ) -> Result<Plant, CatalogError> {
        if data.name.trim().is_empty() {
            return Err(CatalogError::InvalidInput("plant name is required".into()));
        }
        self.ensure_name_free(farm, &data.name)?;

        let now = Utc::now();
        let mut plant = Plant::new(farm, data.name, kind, now);
        plant.thumb = data.thumb;
        plant.description = data.description;
        plant.timing_windows = data.timing_windows;
        plant.best_window = data.best_window;
        plant.farming_days = data.farming_days;
        plant.harvest_days = data.harvest_days;

        tracing::info!(plant = %plant.id, %farm, name = %plant.name, "adding plant");
        self.plants.insert(plant.clone())?;
        Ok(plant)
    }

    /// Clone a recommendation-catalog plant into a farm. The clone starts
    /// active, since it was vetted by the recommendation catalog.
    pub async fn add_plant_from_recommendation(
        &self,
        source: PlantId,
        farm: FarmId,
    ) -> Result<Plant, CatalogError> {
        let template = self
            .plants
            .get_active(source)
            .ok_or_else(|| CatalogError::NotFound(format!("recommended plant {source} not found")))?;
        self.ensure_name_free(farm, &template.name)?;

        let now = Utc::now();
        let mut plant = Plant::new(farm, template.name.clone(), template.kind, now);
        plant.thumb = template.thumb.clone();
        plant.description = template.description.clone();
        plant.timing_windows = template.timing_windows.clone();
        plant.best_window = template.best_window;
        plant.farming_days = template.farming_days;
        plant.harvest_days = template.harvest_days;
        plant.is_active = true;

        tracing::info!(plant = %plant.id, source = %source, %farm, "cloning recommended plant");
        self.plants.insert(plant.clone())?;
        Ok(plant)
    }

    /// Look up a live plant.
    pub async fn plant_by_id(&self, id: PlantId) -> Result<Plant, CatalogError> {
        self.plants
            .get_active(id)
            .ok_or_else(|| CatalogError::NotFound(format!("plant {id} not found")))
    }

    /// Whether a live plant exists under the id.
    pub async fn check_plant_exists(&self, id: PlantId) -> bool {
        self.plants.get_active(id).is_some()
    }

    /// Look up a live plant by name within a farm.
    pub async fn plant_by_name(&self, farm: FarmId, name: &str) -> Result<Plant, CatalogError> {
        self.plants
            .first_active(|p| p.farm == farm && p.name == name)
            .ok_or_else(|| CatalogError::NotFound(format!("plant '{name}' not found in farm")))
    }

    /// All live plants of a farm, in insertion order.
    pub async fn plants_by_farm(&self, farm: FarmId) -> Vec<Plant> {
        self.plants.find_active(|p| p.farm == farm)
    }

    /// Apply a partial update to a farm-owned plant.
    pub async fn update_plant(
        &self,
        id: PlantId,
        farm: FarmId,
        patch: PlantPatch,
    ) -> Result<Plant, CatalogError> {
        let current = self.plant_by_id(id).await?;
        if current.farm != farm {
            return Err(CatalogError::Forbidden(
                "farm does not own this plant".into(),
            ));
        }
        if let Some(name) = &patch.name {
            if name != &current.name {
                self.ensure_name_free(farm, name)?;
            }
        }

        let updated = self.plants.mutate(id, |plant| {
            if let Some(name) = patch.name {
                plant.rename(name);
            }
            if let Some(v) = patch.thumb {
                plant.thumb = v;
            }
            if let Some(v) = patch.description {
                plant.description = v;
            }
            if let Some(v) = patch.timing_windows {
                plant.timing_windows = v;
            }
            if let Some(v) = patch.best_window {
                plant.best_window = Some(v);
            }
            if let Some(v) = patch.farming_days {
                plant.farming_days = Some(v);
            }
            if let Some(v) = patch.harvest_days {
                plant.harvest_days = Some(v);
            }
            if let Some(v) = patch.is_active {
                plant.is_active = v;
            }
        })?;
        Ok(updated)
    }

    /// Tombstone a farm-owned plant.
    pub async fn delete_plant(&self, id: PlantId, farm: FarmId) -> Result<(), CatalogError> {
        let current = self.plant_by_id(id).await?;
        if current.farm != farm {
            return Err(CatalogError::Forbidden(
                "farm does not own this plant".into(),
            ));
        }
        tracing::info!(plant = %id, %farm, "deleting plant");
        self.plants.soft_delete(id, Utc::now())?;
        Ok(())
    }

    fn ensure_name_free(&self, farm: FarmId, name: &str) -> Result<(), CatalogError> {
        if self
            .plants
            .first_active(|p| p.farm == farm && p.name == name)
            .is_some()
        {
            return Err(CatalogError::Conflict(format!(
                "plant '{name}' already exists in farm"
            )));
        }
        Ok(())
    }
}
