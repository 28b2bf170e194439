//! Repositories over the durable key-value store: projects, tasks,
//! milestones, resources, categories, and the completion history.
//! Each mutation writes through to disk and posts a typed change event.

use std::sync::Arc;

use ventureflow_core::events::EventBus;
use ventureflow_core::store::KvStore;

mod categories;
mod history;
mod milestones;
mod projects;
mod resources;
mod stats;
mod tasks;

pub use categories::CategoryService;
pub use history::{HistoryService, HISTORY_LIMIT};
pub use milestones::MilestoneService;
pub use projects::ProjectService;
pub use resources::ResourceService;
pub use stats::compute_stats;
pub use tasks::{spawn_next_occurrence, TaskService};

/// All repositories over one shared store and event bus.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub milestones: MilestoneService,
    pub resources: ResourceService,
    pub categories: CategoryService,
    pub history: HistoryService,
}

impl Workspace {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        Self {
            projects: ProjectService::new(store.clone(), events.clone()),
            tasks: TaskService::new(store.clone(), events.clone()),
            milestones: MilestoneService::new(store.clone(), events.clone()),
            resources: ResourceService::new(store.clone(), events.clone()),
            categories: CategoryService::new(store.clone(), events.clone()),
            history: HistoryService::new(store, events),
        }
    }
}
