use std::sync::Arc;

use anyhow::Result;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::{ProjectId, ResourceId};
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::Resource;

#[derive(Debug, Clone)]
pub struct ResourceService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
}

impl ResourceService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    pub fn all(&self) -> Vec<Resource> {
        self.store.get_vec(keys::RESOURCES)
    }

    pub fn for_project(&self, project_id: ProjectId) -> Vec<Resource> {
        self.all()
            .into_iter()
            .filter(|resource| resource.project_id == project_id)
            .collect()
    }

    pub fn create(&self, resource: Resource) -> Result<()> {
        let mut resources = self.all();
        resources.push(resource);
        self.store.set(keys::RESOURCES, &resources)?;
        self.events.post(ChangeEvent::ResourcesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn delete(&self, id: ResourceId) -> Result<()> {
        let mut resources = self.all();
        resources.retain(|resource| resource.id != id);
        self.store.set(keys::RESOURCES, &resources)?;
        self.events.post(ChangeEvent::ResourcesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }
}
