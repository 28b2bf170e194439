use std::sync::Arc;

use anyhow::Result;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::{MilestoneId, ProjectId};
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::Milestone;

#[derive(Debug, Clone)]
pub struct MilestoneService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
}

impl MilestoneService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    pub fn all(&self) -> Vec<Milestone> {
        self.store.get_vec(keys::MILESTONES)
    }

    pub fn for_project(&self, project_id: ProjectId) -> Vec<Milestone> {
        self.all()
            .into_iter()
            .filter(|milestone| milestone.project_id == project_id)
            .collect()
    }

    pub fn create(&self, milestone: Milestone) -> Result<()> {
        let mut milestones = self.all();
        milestones.push(milestone);
        self.store.set(keys::MILESTONES, &milestones)?;
        self.events.post(ChangeEvent::MilestonesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn update(&self, milestone: Milestone) -> Result<()> {
        let mut milestones = self.all();
        if let Some(slot) = milestones.iter_mut().find(|stored| stored.id == milestone.id) {
            *slot = milestone;
            self.store.set(keys::MILESTONES, &milestones)?;
            self.events.post(ChangeEvent::MilestonesChanged);
            self.events.post(ChangeEvent::DataChanged);
        }
        Ok(())
    }

    pub fn delete(&self, id: MilestoneId) -> Result<()> {
        let mut milestones = self.all();
        milestones.retain(|milestone| milestone.id != id);
        self.store.set(keys::MILESTONES, &milestones)?;
        self.events.post(ChangeEvent::MilestonesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }
}
