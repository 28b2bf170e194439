use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use time::OffsetDateTime;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::{HistoryId, ProjectId};
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::{HistoryItem, HistoryItemType, Project, Task};

/// History keeps the most recent items only, to bound store growth.
pub const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct HistoryService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
}

impl HistoryService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    pub fn all(&self) -> Vec<HistoryItem> {
        self.store.get_vec(keys::HISTORY)
    }

    /// Items filtered by kind and capped, newest first.
    pub fn recent(&self, kind: Option<HistoryItemType>, limit: Option<usize>) -> Vec<HistoryItem> {
        let mut items = self.all();
        if let Some(kind) = kind {
            items.retain(|item| item.kind == kind);
        }
        items.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        items
    }

    pub fn for_project(&self, project_id: ProjectId) -> Vec<HistoryItem> {
        self.all()
            .into_iter()
            .filter(|item| item.project_id == Some(project_id))
            .collect()
    }

    pub fn add(&self, item: HistoryItem) -> Result<()> {
        let mut items = self.all();
        items.insert(0, item);
        items.truncate(HISTORY_LIMIT);
        self.store.set(keys::HISTORY, &items)?;
        self.events.post(ChangeEvent::HistoryChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn record_task_completion(&self, task: &Task, project_name: Option<&str>) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        let completion_time_secs = task
            .start_tracking_date
            .map(|started| (now - started).whole_seconds().max(0) as u64);

        let mut metadata = HashMap::new();
        metadata.insert("priority".to_string(), task.priority.to_string());
        metadata.insert("status".to_string(), task.status.to_string());

        self.add(HistoryItem {
            id: HistoryId::new(),
            kind: HistoryItemType::Task,
            item_id: task.id.0,
            name: task.name.clone(),
            description: task.description.clone(),
            project_id: Some(task.project_id),
            project_name: project_name.map(str::to_string),
            completed_date: now,
            completion_time_secs,
            metadata,
        })
    }

    pub fn record_project_completion(&self, project: &Project) -> Result<()> {
        let mut metadata = HashMap::new();
        metadata.insert("priority".to_string(), project.priority.to_string());
        metadata.insert("category".to_string(), project.category.clone());

        self.add(HistoryItem {
            id: HistoryId::new(),
            kind: HistoryItemType::Project,
            item_id: project.id.0,
            name: project.name.clone(),
            description: project.description.clone(),
            project_id: Some(project.id),
            project_name: Some(project.name.clone()),
            completed_date: OffsetDateTime::now_utc(),
            completion_time_secs: None,
            metadata,
        })
    }
}
