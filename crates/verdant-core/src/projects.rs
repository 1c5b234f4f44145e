//! Project lifecycle service.
//!
//! A project is one cultivation cycle of a (plant, seed) pair on a farm. It
//! carries an embedded process log; log mutations go through the collection's
//! atomic draft mechanism so two edits to different entries of the same
//! project cannot lose each other.

use crate::error::CoreError;
use crate::process;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use verdant_cultivation::RecipeService;
use verdant_domain::{
    CultivationPlan, FarmId, InfoPatch, PlanId, PlantId, ProcessDraft, ProcessEntry, ProcessId,
    Project, ProjectId, ProjectStatus, SeedId,
};
use verdant_store::Collection;

/// Project operations for one deployment.
#[derive(Debug, Clone)]
pub struct ProjectService {
    projects: Arc<Collection<Project>>,
    recipes: RecipeService,
}

impl ProjectService {
    #[must_use]
    pub fn new(projects: Arc<Collection<Project>>, recipes: RecipeService) -> Self {
        Self { projects, recipes }
    }

    /// Create a project. Catalog consistency of the plant and seed is the
    /// caller's concern; the acceptance workflow verifies both before
    /// fanning out.
    pub async fn create_project(
        &self,
        farm: FarmId,
        plant: PlantId,
        seed: SeedId,
        start_date: Option<DateTime<Utc>>,
    ) -> Result<Project, CoreError> {
        let project = Project::new(
            farm,
            plant,
            seed,
            ProjectStatus::InProgress,
            start_date,
            Utc::now(),
        );
        tracing::info!(project = %project.id, %farm, %plant, %seed, "creating project");
        self.projects.insert(project.clone())?;
        Ok(project)
    }

    /// Look up a live project.
    pub async fn project_by_id(&self, id: ProjectId) -> Result<Project, CoreError> {
        self.projects
            .get_active(id)
            .ok_or_else(|| CoreError::NotFound(format!("project {id} not found")))
    }

    /// All live projects of a farm, in insertion order.
    pub async fn projects_by_farm(&self, farm: FarmId) -> Vec<Project> {
        self.projects.find_active(|p| p.farm == farm)
    }

    /// Update a project's info fields, snapshotting the prior seed and start
    /// date into the project's info history.
    pub async fn update_info(
        &self,
        id: ProjectId,
        farm: FarmId,
        patch: InfoPatch,
    ) -> Result<Project, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::InvalidInput("empty project update".into()));
        }
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        let now = Utc::now();
        let updated = self.projects.mutate(id, |project| {
            let snap = project.info_snapshot(now);
            project.history_info.push(snap);
            if let Some(seed) = patch.seed {
                project.seed = seed;
            }
            if let Some(start) = patch.start_date {
                project.start_date = Some(start);
            }
            if let Some(status) = patch.status {
                project.status = status;
            }
            project.is_info_edited = true;
            project.recorded_at = now;
        })?;
        tracing::debug!(project = %id, "updated project info");
        Ok(updated)
    }

    /// Tombstone a project and the plan it owns.
    pub async fn delete_project(&self, id: ProjectId, farm: FarmId) -> Result<(), CoreError> {
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        if let Some(plan) = current.plan {
            self.recipes.delete_plan_unchecked(plan).await?;
        }
        tracing::info!(project = %id, %farm, "deleting project");
        self.projects.soft_delete(id, Utc::now())?;
        Ok(())
    }

    /// Tombstone a project without an ownership check. For cascades driven
    /// by an already-authorized parent deletion.
    pub(crate) async fn delete_project_unchecked(&self, id: ProjectId) -> Result<(), CoreError> {
        if let Some(project) = self.projects.get_active(id) {
            if let Some(plan) = project.plan {
                self.recipes.delete_plan_unchecked(plan).await?;
            }
            self.projects.soft_delete(id, Utc::now())?;
        }
        Ok(())
    }

    /// Attach a private copy of a plan template to the project, replacing
    /// (and tombstoning) any previously attached copy.
    pub async fn attach_plan(
        &self,
        id: ProjectId,
        farm: FarmId,
        template: PlanId,
    ) -> Result<CultivationPlan, CoreError> {
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        let copy = self
            .recipes
            .clone_template(template, current.plant, current.seed)
            .await?;
        self.projects.mutate(id, |project| {
            project.plan = Some(copy.id);
        })?;
        if let Some(previous) = current.plan {
            self.recipes.delete_plan_unchecked(previous).await?;
        }
        tracing::info!(project = %id, plan = %copy.id, "attached plan to project");
        Ok(copy)
    }

    /// The plan attached to a project, if any.
    pub async fn plan_of_project(&self, id: ProjectId) -> Result<Option<CultivationPlan>, CoreError> {
        let project = self.project_by_id(id).await?;
        match project.plan {
            Some(plan) => Ok(Some(self.recipes.plan_by_id(plan).await?)),
            None => Ok(None),
        }
    }

    /// The live entries of a project's process log, in log order.
    pub async fn processes(&self, id: ProjectId) -> Result<Vec<ProcessEntry>, CoreError> {
        let project = self.project_by_id(id).await?;
        Ok(project
            .process
            .into_iter()
            .filter(|e| !e.is_deleted)
            .collect())
    }

    /// Append a process entry to the project's log.
    pub async fn add_process(
        &self,
        id: ProjectId,
        farm: FarmId,
        draft: ProcessDraft,
    ) -> Result<ProcessEntry, CoreError> {
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        let now = Utc::now();
        let entry = process::build_entry(&draft, now)?;
        let stored = entry.clone();
        self.projects.mutate(id, move |project| {
            project.process.push(entry);
        })?;
        tracing::debug!(project = %id, entry = %stored.id, kind = ?stored.kind, "appended process entry");
        Ok(stored)
    }

    /// Replace one process entry's activity, keeping its history. The draft
    /// is validated against the entry inside the write, so a failed update
    /// leaves the log untouched.
    pub async fn update_process(
        &self,
        id: ProjectId,
        farm: FarmId,
        entry_id: ProcessId,
        draft: ProcessDraft,
    ) -> Result<ProcessEntry, CoreError> {
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        let now = Utc::now();
        let outcome = self.projects.try_mutate(id, |project| {
            let entry = project
                .process
                .iter_mut()
                .find(|e| e.id == entry_id && !e.is_deleted)
                .ok_or_else(|| CoreError::NotFound(format!("process entry {entry_id} not found")))?;
            process::apply_update(entry, &draft, now)?;
            Ok::<ProcessEntry, CoreError>(entry.clone())
        })?;
        let updated = outcome?;
        tracing::debug!(project = %id, entry = %entry_id, "updated process entry");
        Ok(updated)
    }

    /// Tombstone one process entry in place.
    pub async fn delete_process(
        &self,
        id: ProjectId,
        farm: FarmId,
        entry_id: ProcessId,
    ) -> Result<(), CoreError> {
        let current = self.project_by_id(id).await?;
        self.check_ownership(&current, farm)?;

        let now = Utc::now();
        let outcome = self.projects.try_mutate(id, |project| {
            let entry = project
                .process
                .iter_mut()
                .find(|e| e.id == entry_id && !e.is_deleted)
                .ok_or_else(|| CoreError::NotFound(format!("process entry {entry_id} not found")))?;
            entry.is_deleted = true;
            entry.deleted_at = Some(now);
            Ok::<(), CoreError>(())
        })?;
        outcome?;
        tracing::debug!(project = %id, entry = %entry_id, "deleted process entry");
        Ok(())
    }

    pub(crate) fn recipes(&self) -> &RecipeService {
        &self.recipes
    }

    fn check_ownership(&self, project: &Project, farm: FarmId) -> Result<(), CoreError> {
        if project.farm != farm {
            return Err(CoreError::Forbidden(
                "farm does not own this project".into(),
            ));
        }
        Ok(())
    }
}
