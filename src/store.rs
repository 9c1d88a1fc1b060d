//! Project Store
//!
//! Explicit in-memory session state: the project list, the active project
//! pointer and the per-project in-flight markers. The pipeline reads a
//! snapshot of the active project and writes back through a single atomic
//! commit; user edits go through the accessors below.

use crate::error::StoreError;
use crate::fingerprint::CachedStyle;
use crate::project::Project;
use crate::types::{GeneratedImage, ImageId, ProjectId, ReferenceImage};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Lightweight listing entry for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub reference_count: usize,
    pub history_len: usize,
    pub has_cached_style: bool,
    pub is_active: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    projects: Vec<Project>,
    active: Option<ProjectId>,
}

impl StoreState {
    fn find_mut(&mut self, id: &ProjectId) -> Result<&mut Project, StoreError> {
        self.projects
            .iter_mut()
            .find(|project| &project.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.clone()))
    }
}

type InFlight = Arc<Mutex<HashSet<ProjectId>>>;

/// Marks a project as having a pipeline run in flight until dropped.
#[derive(Debug)]
pub struct RunGuard {
    project_id: ProjectId,
    in_flight: InFlight,
}

impl RunGuard {
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.project_id);
    }
}

#[derive(Debug, Default)]
pub struct ProjectStore {
    state: RwLock<StoreState>,
    in_flight: InFlight,
}

impl ProjectStore {
    /// Create an empty store with no active project
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with one empty, active project
    pub fn with_default_project() -> Self {
        let store = Self::new();
        store.create_project();
        store
    }

    /// Append a new empty project named `Project {n}` and make it active.
    pub fn create_project(&self) -> ProjectId {
        let mut state = self.state.write();
        let project = Project::new(format!("Project {}", state.projects.len() + 1));
        let id = project.id.clone();
        state.projects.push(project);
        state.active = Some(id.clone());
        info!(project_id = %id, "Project created");
        id
    }

    /// Remove a project. If it was active, the first remaining project becomes active.
    pub fn delete_project(&self, id: &ProjectId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let index = state
            .projects
            .iter()
            .position(|project| &project.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.clone()))?;
        state.projects.remove(index);
        if state.active.as_ref() == Some(id) {
            state.active = state.projects.first().map(|project| project.id.clone());
        }
        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub fn rename_project(&self, id: &ProjectId, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName("name cannot be empty".to_string()));
        }
        self.update(id, |project| project.name = name.to_string())
    }

    pub fn set_active(&self, id: &ProjectId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if !state.projects.iter().any(|project| &project.id == id) {
            return Err(StoreError::ProjectNotFound(id.clone()));
        }
        state.active = Some(id.clone());
        Ok(())
    }

    pub fn active_id(&self) -> Option<ProjectId> {
        self.state.read().active.clone()
    }

    /// Snapshot of the active project
    pub fn active_project(&self) -> Option<Project> {
        let state = self.state.read();
        let active = state.active.as_ref()?;
        state
            .projects
            .iter()
            .find(|project| &project.id == active)
            .cloned()
    }

    /// Snapshot of a project by id
    pub fn project(&self, id: &ProjectId) -> Option<Project> {
        self.state
            .read()
            .projects
            .iter()
            .find(|project| &project.id == id)
            .cloned()
    }

    /// Summaries in creation order
    pub fn projects(&self) -> Vec<ProjectSummary> {
        let state = self.state.read();
        state
            .projects
            .iter()
            .map(|project| ProjectSummary {
                id: project.id.clone(),
                name: project.name.clone(),
                reference_count: project.reference_images.len(),
                history_len: project.history.len(),
                has_cached_style: project.cached_style.is_some(),
                is_active: state.active.as_ref() == Some(&project.id),
            })
            .collect()
    }

    /// Append reference images, keeping their order
    pub fn add_reference_images(
        &self,
        id: &ProjectId,
        images: Vec<ReferenceImage>,
    ) -> Result<(), StoreError> {
        let count = images.len();
        self.update(id, |project| project.reference_images.extend(images))?;
        debug!(project_id = %id, added = count, "Reference images added");
        Ok(())
    }

    pub fn remove_reference_image(
        &self,
        id: &ProjectId,
        image_id: &ImageId,
    ) -> Result<ReferenceImage, StoreError> {
        let mut state = self.state.write();
        let project = state.find_mut(id)?;
        let index = project
            .reference_images
            .iter()
            .position(|image| &image.id == image_id)
            .ok_or_else(|| StoreError::ReferenceImageNotFound(image_id.clone()))?;
        Ok(project.reference_images.remove(index))
    }

    /// Copy a history entry into the reference set under a fresh identifier.
    pub fn promote_generated(
        &self,
        id: &ProjectId,
        generated_id: &ImageId,
    ) -> Result<ImageId, StoreError> {
        let mut state = self.state.write();
        let project = state.find_mut(id)?;
        let generated = project
            .history
            .get(generated_id)
            .ok_or_else(|| StoreError::GeneratedImageNotFound(generated_id.clone()))?;
        let reference = ReferenceImage::new(generated.payload.clone());
        let reference_id = reference.id.clone();
        project.reference_images.push(reference);
        Ok(reference_id)
    }

    pub fn set_prompt(&self, id: &ProjectId, prompt: impl Into<String>) -> Result<(), StoreError> {
        let prompt = prompt.into();
        self.update(id, |project| project.prompt = prompt)
    }

    /// Mark a project as running. Fails if a run is already in flight for it.
    pub fn begin_run(&self, id: &ProjectId) -> Result<RunGuard, StoreError> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(id.clone()) {
            return Err(StoreError::RunInProgress(id.clone()));
        }
        Ok(RunGuard {
            project_id: id.clone(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_running(&self, id: &ProjectId) -> bool {
        self.in_flight.lock().contains(id)
    }

    /// Record a successful run in one state transition: prepend the new
    /// images to the history and replace the cached style.
    pub fn commit_run(
        &self,
        id: &ProjectId,
        images: Vec<GeneratedImage>,
        style: CachedStyle,
    ) -> Result<(), StoreError> {
        self.update(id, |project| {
            project.history.prepend(images);
            project.cached_style = Some(style);
        })
    }

    fn update<F>(&self, id: &ProjectId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Project),
    {
        let mut state = self.state.write();
        f(state.find_mut(id)?);
        Ok(())
    }
}
