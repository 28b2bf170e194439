use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::{CategoryId, HistoryId, MilestoneId, ProjectId, ResourceId, TaskId};
use crate::recurrence::RecurrenceRule;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    #[serde(rename = "Planning")]
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskPriority {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: TaskPriority,
    pub category: String,
    pub tags: Vec<String>,
    pub start_date: OffsetDateTime,
    pub deadline: Option<OffsetDateTime>,
    pub notes: String,
    pub task_ids: Vec<TaskId>,
    pub milestone_ids: Vec<MilestoneId>,
    pub resource_ids: Vec<ResourceId>,
    pub created_date: OffsetDateTime,
    pub last_updated: OffsetDateTime,
}

impl Project {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::Planning,
            priority: TaskPriority::Medium,
            category: category.into(),
            tags: Vec::new(),
            start_date: now,
            deadline: None,
            notes: String::new(),
            task_ids: Vec::new(),
            milestone_ids: Vec::new(),
            resource_ids: Vec::new(),
            created_date: now,
            last_updated: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub project_id: ProjectId,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<OffsetDateTime>,
    pub notes: String,
    pub subtasks: Vec<Subtask>,
    pub created_date: OffsetDateTime,
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Set on tasks spawned from a recurring task.
    pub original_task_id: Option<TaskId>,
    /// When tracking started, for completion-time measurement.
    pub start_tracking_date: Option<OffsetDateTime>,
}

impl Task {
    pub fn new(name: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            description: String::new(),
            project_id,
            status: TaskStatus::ToDo,
            priority: TaskPriority::Medium,
            deadline: None,
            notes: String::new(),
            subtasks: Vec::new(),
            created_date: OffsetDateTime::now_utc(),
            recurrence_rule: None,
            original_task_id: None,
            start_tracking_date: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_overdue(&self) -> bool {
        match self.deadline {
            Some(deadline) if !self.is_completed() => deadline < OffsetDateTime::now_utc(),
            _ => false,
        }
    }

    pub fn days_until_deadline(&self) -> Option<i64> {
        let deadline = self.deadline?;
        let remaining = deadline - OffsetDateTime::now_utc();
        Some(remaining.whole_days())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: TaskId,
    pub name: String,
    pub is_completed: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MilestoneStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: MilestoneId,
    pub name: String,
    pub project_id: ProjectId,
    pub target_date: OffsetDateTime,
    pub status: MilestoneStatus,
    pub associated_task_ids: Vec<TaskId>,
    pub notes: String,
    pub created_date: OffsetDateTime,
}

impl Milestone {
    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }

    pub fn is_overdue(&self) -> bool {
        !self.is_completed() && self.target_date < OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceType {
    #[serde(rename = "File")]
    File,
    #[serde(rename = "Link")]
    Link,
    #[serde(rename = "Note")]
    Note,
    #[serde(rename = "Picture")]
    Picture,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub kind: ResourceType,
    pub project_id: ProjectId,
    pub content: String,
    pub notes: String,
    pub created_date: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
        }
    }

    pub fn default_categories() -> Vec<Category> {
        vec![
            Category::new("Work", "FF4500", "briefcase"),
            Category::new("Personal", "00FF00", "person"),
            Category::new("Learning", "FFD700", "book"),
            Category::new("Hobby", "ADD8E6", "star"),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryItemType {
    #[serde(rename = "Task")]
    Task,
    #[serde(rename = "Project")]
    Project,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryItem {
    pub id: HistoryId,
    pub kind: HistoryItemType,
    /// Id of the original task or project.
    pub item_id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    pub completed_date: OffsetDateTime,
    /// Seconds from tracking start to completion, when tracked.
    pub completion_time_secs: Option<u64>,
    pub metadata: HashMap<String, String>,
}

impl HistoryItem {
    pub fn priority(&self) -> Option<&str> {
        self.metadata.get("priority").map(String::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub on_hold_projects: usize,
    pub planning_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub upcoming_deadlines: usize,
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("unknown priority: {value}")),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        };
        write!(f, "{value}")
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in progress",
            ProjectStatus::OnHold => "on hold",
            ProjectStatus::Completed => "completed",
        };
        write!(f, "{value}")
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TaskStatus::ToDo => "to do",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        };
        write!(f, "{value}")
    }
}
