//! Seed variety catalog service.
//!
//! Seeds hang off a plant and inherit its farm ownership. Each plant has at
//! most one live default seed; the first seed registered for a plant becomes
//! the default automatically, and later ones can take over via
//! [`SeedCatalog::set_default_seed`].

use crate::error::CatalogError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verdant_domain::{FarmId, Plant, PlantId, Seed, SeedId};
use verdant_store::Collection;

/// Caller-supplied fields for a new seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSeed {
    pub name: String,
    pub thumb: String,
    pub description: String,
}

/// Partial update for a seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedPatch {
    pub name: Option<String>,
    pub thumb: Option<String>,
    pub description: Option<String>,
}

/// Seed catalog operations for one deployment.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    seeds: Arc<Collection<Seed>>,
    plants: Arc<Collection<Plant>>,
}

impl SeedCatalog {
    #[must_use]
    pub fn new(seeds: Arc<Collection<Seed>>, plants: Arc<Collection<Plant>>) -> Self {
        Self { seeds, plants }
    }

    /// Register a seed variety under a farm-owned plant.
    ///
    /// The first live seed of a plant becomes the plant's default.
    pub async fn add_seed(
        &self,
        plant: PlantId,
        farm: FarmId,
        data: NewSeed,
    ) -> Result<Seed, CatalogError> {
        if data.name.trim().is_empty() {
            return Err(CatalogError::InvalidInput("seed name is required".into()));
        }
        self.owned_plant(plant, farm)?;
        if self
            .seeds
            .first_active(|s| s.plant == plant && s.name == data.name)
            .is_some()
        {
            return Err(CatalogError::Conflict(format!(
                "seed '{}' already exists for this plant",
                data.name
            )));
        }

        let mut seed = Seed::new(plant, data.name, Utc::now());
        seed.thumb = data.thumb;
        seed.description = data.description;
        seed.is_default = self.seeds.first_active(|s| s.plant == plant).is_none();

        tracing::info!(seed = %seed.id, %plant, default = seed.is_default, "adding seed");
        self.seeds.insert(seed.clone())?;
        if seed.is_default {
            // Two concurrent first seeds can both pass the probe above. The
            // earliest-inserted flagged seed wins; a loser demotes itself.
            let earliest = self
                .seeds
                .first_active(|s| s.plant == plant && s.is_default);
            if earliest.map(|s| s.id) != Some(seed.id) {
                seed = self.seeds.mutate(seed.id, |s| s.is_default = false)?;
            }
        }
        Ok(seed)
    }

    /// Clone a recommendation-catalog seed onto one of the farm's plants.
    pub async fn add_seed_from_recommendation(
        &self,
        source: SeedId,
        plant: PlantId,
        farm: FarmId,
    ) -> Result<Seed, CatalogError> {
        let template = self
            .seeds
            .get_active(source)
            .ok_or_else(|| CatalogError::NotFound(format!("recommended seed {source} not found")))?;
        self.add_seed(
            plant,
            farm,
            NewSeed {
                name: template.name,
                thumb: template.thumb,
                description: template.description,
            },
        )
        .await
    }

    /// Look up a live seed.
    pub async fn seed_by_id(&self, id: SeedId) -> Result<Seed, CatalogError> {
        self.seeds
            .get_active(id)
            .ok_or_else(|| CatalogError::NotFound(format!("seed {id} not found")))
    }

    /// All live seeds of a plant, in insertion order.
    pub async fn seeds_by_plant(&self, plant: PlantId) -> Vec<Seed> {
        self.seeds.find_active(|s| s.plant == plant)
    }

    /// Look up a live seed by name within a plant.
    pub async fn seed_by_name_and_plant(
        &self,
        plant: PlantId,
        name: &str,
    ) -> Result<Seed, CatalogError> {
        self.seeds
            .first_active(|s| s.plant == plant && s.name == name)
            .ok_or_else(|| CatalogError::NotFound(format!("seed '{name}' not found for plant")))
    }

    /// The default seed of a plant. Falls back to the earliest-registered
    /// live seed when no default flag survives.
    pub async fn default_seed_for_plant(&self, plant: PlantId) -> Result<Seed, CatalogError> {
        if let Some(seed) = self.seeds.first_active(|s| s.plant == plant && s.is_default) {
            return Ok(seed);
        }
        self.seeds
            .first_active(|s| s.plant == plant)
            .ok_or_else(|| CatalogError::NotFound(format!("plant {plant} has no seeds")))
    }

    /// Apply a partial update to a seed of a farm-owned plant.
    pub async fn update_seed(
        &self,
        id: SeedId,
        farm: FarmId,
        patch: SeedPatch,
    ) -> Result<Seed, CatalogError> {
        let current = self.seed_by_id(id).await?;
        self.owned_plant(current.plant, farm)?;
        if let Some(name) = &patch.name {
            if name != &current.name
                && self
                    .seeds
                    .first_active(|s| s.plant == current.plant && s.name == *name)
                    .is_some()
            {
                return Err(CatalogError::Conflict(format!(
                    "seed '{name}' already exists for this plant"
                )));
            }
        }

        let updated = self.seeds.mutate(id, |seed| {
            if let Some(name) = patch.name {
                seed.slug = verdant_domain::slugify(&name);
                seed.name = name;
            }
            if let Some(v) = patch.thumb {
                seed.thumb = v;
            }
            if let Some(v) = patch.description {
                seed.description = v;
            }
        })?;
        Ok(updated)
    }

    /// Make a seed the sole default of its plant.
    pub async fn set_default_seed(&self, id: SeedId, farm: FarmId) -> Result<Seed, CatalogError> {
        let target = self.seed_by_id(id).await?;
        self.owned_plant(target.plant, farm)?;

        for other in self
            .seeds
            .find_active(|s| s.plant == target.plant && s.is_default && s.id != id)
        {
            self.seeds.mutate(other.id, |s| s.is_default = false)?;
        }
        let updated = self.seeds.mutate(id, |s| s.is_default = true)?;
        tracing::info!(seed = %id, plant = %target.plant, "changed default seed");
        Ok(updated)
    }

    /// Tombstone a seed of a farm-owned plant.
    pub async fn delete_seed(&self, id: SeedId, farm: FarmId) -> Result<(), CatalogError> {
        let current = self.seed_by_id(id).await?;
        self.owned_plant(current.plant, farm)?;
        tracing::info!(seed = %id, plant = %current.plant, "deleting seed");
        self.seeds.soft_delete(id, Utc::now())?;
        Ok(())
    }

    fn owned_plant(&self, plant: PlantId, farm: FarmId) -> Result<Plant, CatalogError> {
        let plant = self
            .plants
            .get_active(plant)
            .ok_or_else(|| CatalogError::NotFound(format!("plant {plant} not found")))?;
        if plant.farm != farm {
            return Err(CatalogError::Forbidden(
                "farm does not own this plant".into(),
            ));
        }
        Ok(plant)
    }
}
