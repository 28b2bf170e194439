pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod recurrence;
pub mod store;
pub mod types;

pub use config::{Config, ConfigPaths};
pub use error::VentureFlowError;
pub use events::{ChangeEvent, EventBus};
pub use ids::{CategoryId, HistoryId, MilestoneId, ProjectId, ResourceId, TaskId};
pub use recurrence::{RecurrenceFrequency, RecurrenceRule};
pub use store::KvStore;
pub use types::{
    Category, HistoryItem, HistoryItemType, Milestone, MilestoneStatus, Project, ProjectStats,
    ProjectStatus, Resource, ResourceType, Subtask, Task, TaskPriority, TaskStatus,
};
