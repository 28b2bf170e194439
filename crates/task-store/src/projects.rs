use std::sync::Arc;

use anyhow::Result;
use time::OffsetDateTime;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::ProjectId;
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::{Project, ProjectStatus, Task};

use crate::history::HistoryService;

#[derive(Debug, Clone)]
pub struct ProjectService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
    history: HistoryService,
}

impl ProjectService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        let history = HistoryService::new(store.clone(), events.clone());
        Self {
            store,
            events,
            history,
        }
    }

    pub fn all(&self) -> Vec<Project> {
        self.store.get_vec(keys::PROJECTS)
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.all().into_iter().find(|project| project.id == id)
    }

    /// Finds a project by exact name, for CLI lookups.
    pub fn find_by_name(&self, name: &str) -> Option<Project> {
        self.all().into_iter().find(|project| project.name == name)
    }

    pub fn create(&self, project: Project) -> Result<()> {
        let mut projects = self.all();
        projects.push(project);
        self.store.set(keys::PROJECTS, &projects)?;

        let created: u64 = self.store.get(keys::TOTAL_PROJECTS_CREATED).unwrap_or(0);
        self.store.set(keys::TOTAL_PROJECTS_CREATED, &(created + 1))?;

        self.events.post(ChangeEvent::ProjectsChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    /// Replaces the stored project. Moving into Completed records a
    /// history entry.
    pub fn update(&self, mut project: Project) -> Result<()> {
        let mut projects = self.all();
        let Some(slot) = projects.iter_mut().find(|stored| stored.id == project.id) else {
            return Ok(());
        };

        let newly_completed =
            project.status == ProjectStatus::Completed && slot.status != ProjectStatus::Completed;
        project.last_updated = OffsetDateTime::now_utc();
        *slot = project.clone();
        self.store.set(keys::PROJECTS, &projects)?;

        if newly_completed {
            self.history.record_project_completion(&project)?;
        }
        self.events.post(ChangeEvent::ProjectsChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    /// Removes the project and every task belonging to it.
    pub fn delete(&self, id: ProjectId) -> Result<()> {
        let mut projects = self.all();
        projects.retain(|project| project.id != id);
        self.store.set(keys::PROJECTS, &projects)?;

        let mut tasks: Vec<Task> = self.store.get_vec(keys::TASKS);
        tasks.retain(|task| task.project_id != id);
        self.store.set(keys::TASKS, &tasks)?;

        self.events.post(ChangeEvent::ProjectsChanged);
        self.events.post(ChangeEvent::TasksChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn total_created(&self) -> u64 {
        self.store.get(keys::TOTAL_PROJECTS_CREATED).unwrap_or(0)
    }
}
