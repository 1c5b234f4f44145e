//! Cultivation plan (recipe) service.
//!
//! One default plan per (plant, seed) pair acts as the farm's template;
//! non-default copies belong to individual projects. Edits to a non-default
//! plan push a pre-edit snapshot into the plan's history, while the default
//! template is updated in place.

use crate::error::RecipeError;
use chrono::Utc;
use std::sync::Arc;
use verdant_catalog::{PlantCatalog, SeedCatalog};
use verdant_domain::{
    CultivationPlan, FarmId, PlanContents, PlanId, PlanPatch, PlantId, SeedId,
};
use verdant_store::Collection;

/// Cultivation plan operations for one deployment.
#[derive(Debug, Clone)]
pub struct RecipeService {
    plans: Arc<Collection<CultivationPlan>>,
    plant_catalog: PlantCatalog,
    seed_catalog: SeedCatalog,
}

impl RecipeService {
    #[must_use]
    pub fn new(
        plans: Arc<Collection<CultivationPlan>>,
        plant_catalog: PlantCatalog,
        seed_catalog: SeedCatalog,
    ) -> Self {
        Self {
            plans,
            plant_catalog,
            seed_catalog,
        }
    }

    /// Create a plan for a (plant, seed) pair owned by the farm.
    ///
    /// # Errors
    /// `Conflict` when `is_default` is requested and the pair already has a
    /// live default.
    pub async fn create_plan(
        &self,
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
        contents: PlanContents,
        is_default: bool,
    ) -> Result<CultivationPlan, RecipeError> {
        let owner = self.plant_catalog.plant_by_id(plant).await?;
        if owner.farm != farm {
            return Err(RecipeError::Forbidden(
                "farm does not own this plant".into(),
            ));
        }
        let seed_doc = self.seed_catalog.seed_by_id(seed).await?;
        if seed_doc.plant != plant {
            return Err(RecipeError::InvalidInput(
                "seed does not belong to the plant".into(),
            ));
        }
        if is_default && self.default_plan(plant, seed).is_some() {
            return Err(RecipeError::Conflict(
                "a default plan already exists for this plant and seed".into(),
            ));
        }

        let plan = CultivationPlan::new(plant, seed, contents, is_default, Utc::now());
        tracing::info!(plan = %plan.id, %plant, %seed, default = is_default, "creating plan");
        self.plans.insert(plan.clone())?;
        Ok(plan)
    }

    /// Look up a live plan.
    pub async fn plan_by_id(&self, id: PlanId) -> Result<CultivationPlan, RecipeError> {
        self.plans
            .get_active(id)
            .ok_or_else(|| RecipeError::NotFound(format!("plan {id} not found")))
    }

    /// Whether a live plan exists under the id.
    pub async fn plan_exists(&self, id: PlanId) -> bool {
        self.plans.get_active(id).is_some()
    }

    /// All live plans bound to a seed, in insertion order.
    pub async fn plans_by_seed(&self, seed: SeedId) -> Vec<CultivationPlan> {
        self.plans.find_active(|p| p.seed == seed)
    }

    /// The template plan for a pair: the flagged default if one survives,
    /// otherwise the earliest-created live plan for the pair.
    pub async fn resolve_template(
        &self,
        plant: PlantId,
        seed: SeedId,
    ) -> Result<CultivationPlan, RecipeError> {
        if let Some(plan) = self.default_plan(plant, seed) {
            return Ok(plan);
        }
        self.plans
            .first_active(|p| p.plant == plant && p.seed == seed)
            .ok_or_else(|| {
                RecipeError::NotFound(format!("no plan found for plant {plant} and seed {seed}"))
            })
    }

    /// Recommended plan by catalog names: the admin farm's template for the
    /// named plant and, when given, the named seed (otherwise the plant's
    /// default seed).
    pub async fn recommend(
        &self,
        plant_name: &str,
        seed_name: Option<&str>,
    ) -> Result<CultivationPlan, RecipeError> {
        let admin = self.plant_catalog.admin_farm();
        let plant = self.plant_catalog.plant_by_name(admin, plant_name).await?;
        let seed = match seed_name {
            Some(name) => {
                self.seed_catalog
                    .seed_by_name_and_plant(plant.id, name)
                    .await?
            }
            None => self.seed_catalog.default_seed_for_plant(plant.id).await?,
        };
        self.resolve_template(plant.id, seed.id).await
    }

    /// Clone a template plan into a fresh non-default copy bound to another
    /// (plant, seed) pair. The copy is stored and returned.
    pub async fn clone_template(
        &self,
        source: PlanId,
        plant: PlantId,
        seed: SeedId,
    ) -> Result<CultivationPlan, RecipeError> {
        let template = self.plan_by_id(source).await?;
        let copy = template.clone_for(plant, seed, Utc::now());
        tracing::debug!(source = %source, copy = %copy.id, "cloning plan template");
        self.plans.insert(copy.clone())?;
        Ok(copy)
    }

    /// Update a plan's contents.
    ///
    /// Non-default plans record a pre-edit snapshot in their history and get
    /// `is_edited` set; default templates are rewritten in place. Both
    /// refresh `revised_at`.
    pub async fn update_plan(
        &self,
        id: PlanId,
        farm: FarmId,
        patch: PlanPatch,
    ) -> Result<CultivationPlan, RecipeError> {
        if patch.is_empty() {
            return Err(RecipeError::InvalidInput("empty plan update".into()));
        }
        let current = self.plan_by_id(id).await?;
        self.check_ownership(&current, farm).await?;

        let now = Utc::now();
        let updated = self.plans.mutate(id, |plan| {
            if !plan.is_default {
                let snap = plan.snapshot(now);
                plan.edit_history.push(snap);
                plan.is_edited = true;
            }
            plan.apply_patch(patch);
            plan.revised_at = now;
        })?;
        tracing::debug!(plan = %id, edited = updated.is_edited, "updated plan");
        Ok(updated)
    }

    /// Tombstone a farm-owned plan.
    pub async fn delete_plan(&self, id: PlanId, farm: FarmId) -> Result<(), RecipeError> {
        let current = self.plan_by_id(id).await?;
        self.check_ownership(&current, farm).await?;
        tracing::info!(plan = %id, %farm, "deleting plan");
        self.plans.soft_delete(id, Utc::now())?;
        Ok(())
    }

    /// Tombstone a plan without an ownership check. For cascades driven by
    /// an already-authorized parent deletion.
    pub async fn delete_plan_unchecked(&self, id: PlanId) -> Result<(), RecipeError> {
        self.plans.soft_delete(id, Utc::now())?;
        Ok(())
    }

    fn default_plan(&self, plant: PlantId, seed: SeedId) -> Option<CultivationPlan> {
        self.plans
            .first_active(|p| p.plant == plant && p.seed == seed && p.is_default)
    }

    /// Ownership follows the plant. A plan whose plant was since deleted is
    /// only reachable through cascades, which skip this check.
    async fn check_ownership(
        &self,
        plan: &CultivationPlan,
        farm: FarmId,
    ) -> Result<(), RecipeError> {
        let plant = self.plant_catalog.plant_by_id(plan.plant).await?;
        if plant.farm != farm {
            return Err(RecipeError::Forbidden("farm does not own this plan".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use verdant_catalog::{NewPlant, NewSeed, PlantCatalog, SeedCatalog};
    use verdant_domain::{Plant, PlantKind, Seed};

    struct Fixture {
        recipes: RecipeService,
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
    }

    async fn fixture() -> Fixture {
        let plants = Arc::new(Collection::<Plant>::new());
        let seeds = Arc::new(Collection::<Seed>::new());
        let admin = FarmId::new();
        let plant_catalog = PlantCatalog::new(Arc::clone(&plants), admin);
        let seed_catalog = SeedCatalog::new(Arc::clone(&seeds), Arc::clone(&plants));

        let farm = FarmId::new();
        let plant = plant_catalog
            .add_plant(farm, PlantKind::Herb, NewPlant { name: "Basil".into(), ..NewPlant::default() })
            .await
            .unwrap();
        let seed = seed_catalog
            .add_seed(plant.id, farm, NewSeed { name: "Genovese".into(), ..NewSeed::default() })
            .await
            .unwrap();

        Fixture {
            recipes: RecipeService::new(Arc::new(Collection::new()), plant_catalog, seed_catalog),
            farm,
            plant: plant.id,
            seed: seed.id,
        }
    }

    fn contents() -> PlanContents {
        PlanContents {
            farming_days: Some(45),
            harvest_days: Some(60),
            ..PlanContents::default()
        }
    }

    #[tokio::test]
    async fn only_one_default_per_pair() {
        let fx = fixture().await;
        fx.recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), true)
            .await
            .unwrap();
        let err = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Conflict(_)));
    }

    #[tokio::test]
    async fn updating_a_copy_records_history() {
        let fx = fixture().await;
        let copy = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), false)
            .await
            .unwrap();

        let updated = fx
            .recipes
            .update_plan(
                copy.id,
                fx.farm,
                PlanPatch { harvest_days: Some(70), ..PlanPatch::default() },
            )
            .await
            .unwrap();

        assert!(updated.is_edited);
        assert_eq!(updated.contents.harvest_days, Some(70));
        assert_eq!(updated.edit_history.len(), 1);
        let snap = &updated.edit_history[0];
        assert_eq!(snap.contents.harvest_days, Some(60));
        assert_eq!(snap.revised_at, copy.revised_at);
        assert!(updated.revised_at >= copy.revised_at);
    }

    #[tokio::test]
    async fn updating_the_default_template_skips_history() {
        let fx = fixture().await;
        let template = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), true)
            .await
            .unwrap();

        let updated = fx
            .recipes
            .update_plan(
                template.id,
                fx.farm,
                PlanPatch { harvest_days: Some(70), ..PlanPatch::default() },
            )
            .await
            .unwrap();

        assert!(!updated.is_edited);
        assert!(updated.edit_history.is_empty());
        assert_eq!(updated.contents.harvest_days, Some(70));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let fx = fixture().await;
        let plan = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), false)
            .await
            .unwrap();
        let err = fx
            .recipes
            .update_plan(plan.id, fx.farm, PlanPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::InvalidInput(_)));

        let unchanged = fx.recipes.plan_by_id(plan.id).await.unwrap();
        assert!(unchanged.edit_history.is_empty());
    }

    #[tokio::test]
    async fn template_resolution_prefers_the_default_flag() {
        let fx = fixture().await;
        let copy = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), false)
            .await
            .unwrap();
        let template = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), true)
            .await
            .unwrap();

        let resolved = fx
            .recipes
            .resolve_template(fx.plant, fx.seed)
            .await
            .unwrap();
        assert_eq!(resolved.id, template.id);

        // Without a flagged default the earliest-created plan wins.
        fx.recipes.delete_plan(template.id, fx.farm).await.unwrap();
        let resolved = fx
            .recipes
            .resolve_template(fx.plant, fx.seed)
            .await
            .unwrap();
        assert_eq!(resolved.id, copy.id);
    }

    #[tokio::test]
    async fn recommend_resolves_by_names_in_the_admin_catalog() {
        let plants = Arc::new(Collection::<Plant>::new());
        let seeds = Arc::new(Collection::<Seed>::new());
        let admin = FarmId::new();
        let plant_catalog = PlantCatalog::new(Arc::clone(&plants), admin);
        let seed_catalog = SeedCatalog::new(Arc::clone(&seeds), Arc::clone(&plants));
        let recipes = RecipeService::new(
            Arc::new(Collection::new()),
            plant_catalog.clone(),
            seed_catalog.clone(),
        );

        let plant = plant_catalog
            .add_plant(admin, PlantKind::Herb, NewPlant { name: "Basil".into(), ..NewPlant::default() })
            .await
            .unwrap();
        let seed = seed_catalog
            .add_seed(plant.id, admin, NewSeed { name: "Genovese".into(), ..NewSeed::default() })
            .await
            .unwrap();
        let template = recipes
            .create_plan(admin, plant.id, seed.id, contents(), true)
            .await
            .unwrap();

        // Without a seed name the plant's default seed is used.
        let hit = recipes.recommend("Basil", None).await.unwrap();
        assert_eq!(hit.id, template.id);
        let hit = recipes.recommend("Basil", Some("Genovese")).await.unwrap();
        assert_eq!(hit.id, template.id);

        let miss = recipes.recommend("Rosemary", None).await;
        assert!(matches!(miss, Err(RecipeError::Catalog(_))));
    }

    #[tokio::test]
    async fn update_requires_ownership() {
        let fx = fixture().await;
        let plan = fx
            .recipes
            .create_plan(fx.farm, fx.plant, fx.seed, contents(), false)
            .await
            .unwrap();
        let err = fx
            .recipes
            .update_plan(
                plan.id,
                FarmId::new(),
                PlanPatch { harvest_days: Some(1), ..PlanPatch::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Forbidden(_)));
    }
}
