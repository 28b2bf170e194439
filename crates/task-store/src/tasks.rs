use std::sync::Arc;

use anyhow::Result;
use time::OffsetDateTime;
use tracing::debug;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::{ProjectId, TaskId};
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::{Project, Subtask, Task, TaskStatus};

use crate::history::HistoryService;

#[derive(Debug, Clone)]
pub struct TaskService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
    history: HistoryService,
}

impl TaskService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        let history = HistoryService::new(store.clone(), events.clone());
        Self {
            store,
            events,
            history,
        }
    }

    pub fn all(&self) -> Vec<Task> {
        self.store.get_vec(keys::TASKS)
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.all().into_iter().find(|task| task.id == id)
    }

    pub fn for_project(&self, project_id: ProjectId) -> Vec<Task> {
        self.all()
            .into_iter()
            .filter(|task| task.project_id == project_id)
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Task> {
        self.all().into_iter().find(|task| task.name == name)
    }

    pub fn create(&self, task: Task) -> Result<()> {
        let mut tasks = self.all();
        tasks.push(task);
        self.store.set(keys::TASKS, &tasks)?;
        self.events.post(ChangeEvent::TasksChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn update(&self, task: Task) -> Result<()> {
        let mut tasks = self.all();
        if let Some(slot) = tasks.iter_mut().find(|stored| stored.id == task.id) {
            *slot = task;
            self.store.set(keys::TASKS, &tasks)?;
            self.events.post(ChangeEvent::TasksChanged);
            self.events.post(ChangeEvent::DataChanged);
        }
        Ok(())
    }

    pub fn delete(&self, id: TaskId) -> Result<()> {
        let mut tasks = self.all();
        tasks.retain(|task| task.id != id);
        self.store.set(keys::TASKS, &tasks)?;
        self.events.post(ChangeEvent::TasksChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    /// Marks a task completed. This is the workflow with side effects:
    /// the lifetime completion counter advances, a history entry is
    /// written, and an active recurrence rule spawns the next
    /// occurrence in the same project.
    pub fn complete(&self, id: TaskId) -> Result<Option<Task>> {
        let mut tasks = self.all();
        let Some(index) = tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };
        if tasks[index].is_completed() {
            return Ok(Some(tasks[index].clone()));
        }

        tasks[index].status = TaskStatus::Completed;
        let completed = tasks[index].clone();

        if let Some(next) = spawn_next_occurrence(&completed) {
            debug!(task = %completed.name, "spawning next recurring occurrence");
            tasks.push(next);
        }
        self.store.set(keys::TASKS, &tasks)?;

        let counter: u64 = self.store.get(keys::TOTAL_TASKS_COMPLETED).unwrap_or(0);
        self.store.set(keys::TOTAL_TASKS_COMPLETED, &(counter + 1))?;

        let projects: Vec<Project> = self.store.get_vec(keys::PROJECTS);
        let project_name = projects
            .iter()
            .find(|project| project.id == completed.project_id)
            .map(|project| project.name.as_str());
        self.history.record_task_completion(&completed, project_name)?;

        self.events.post(ChangeEvent::TasksChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(Some(completed))
    }

    pub fn total_completed(&self) -> u64 {
        self.store.get(keys::TOTAL_TASKS_COMPLETED).unwrap_or(0)
    }
}

/// Builds the follow-up task for a recurring one, or None when the rule
/// is inactive, exhausted, or past its end date. Subtasks carry over
/// with their checkmarks reset; the chain is traced through
/// `original_task_id` back to the first task.
pub fn spawn_next_occurrence(completed: &Task) -> Option<Task> {
    let rule = completed.recurrence_rule.as_ref()?;
    if !rule.is_active() {
        return None;
    }
    let remaining = match rule.occurrences {
        Some(0) => return None,
        Some(count) => Some(count - 1),
        None => None,
    };

    let anchor = completed
        .deadline
        .unwrap_or_else(OffsetDateTime::now_utc);
    let next_deadline = rule.next_occurrence(anchor)?;

    let mut next_rule = rule.clone();
    next_rule.occurrences = remaining;

    Some(Task {
        id: TaskId::new(),
        name: completed.name.clone(),
        description: completed.description.clone(),
        project_id: completed.project_id,
        status: TaskStatus::ToDo,
        priority: completed.priority,
        deadline: Some(next_deadline),
        notes: completed.notes.clone(),
        subtasks: completed
            .subtasks
            .iter()
            .map(|subtask| Subtask::new(subtask.name.clone()))
            .collect(),
        created_date: OffsetDateTime::now_utc(),
        recurrence_rule: Some(next_rule),
        original_task_id: completed.original_task_id.or(Some(completed.id)),
        start_tracking_date: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventureflow_core::recurrence::{RecurrenceFrequency, RecurrenceRule};
    use ventureflow_core::types::HistoryItemType;

    fn service() -> (tempfile::TempDir, TaskService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(&dir.path().join("defaults.json")).unwrap());
        (dir, TaskService::new(store, Arc::new(EventBus::new())))
    }

    #[test]
    fn test_complete_increments_counter_and_history() {
        let (_dir, service) = service();
        let task = Task::new("write report", ProjectId::new());
        let id = task.id;
        service.create(task).unwrap();

        let completed = service.complete(id).unwrap().unwrap();
        assert!(completed.is_completed());
        assert_eq!(service.total_completed(), 1);

        let history = service.history.recent(Some(HistoryItemType::Task), None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "write report");

        // Completing again is a no-op.
        service.complete(id).unwrap();
        assert_eq!(service.total_completed(), 1);
        assert_eq!(service.history.all().len(), 1);
    }

    #[test]
    fn test_complete_unknown_task_returns_none() {
        let (_dir, service) = service();
        assert!(service.complete(TaskId::new()).unwrap().is_none());
    }

    #[test]
    fn test_recurring_task_spawns_follow_up() {
        let (_dir, service) = service();
        let mut task = Task::new("water plants", ProjectId::new());
        task.deadline = Some(OffsetDateTime::now_utc());
        task.recurrence_rule = Some(RecurrenceRule::every(RecurrenceFrequency::Daily, 1));
        let id = task.id;
        service.create(task).unwrap();

        service.complete(id).unwrap();

        let tasks = service.all();
        assert_eq!(tasks.len(), 2);
        let follow_up = tasks.iter().find(|task| !task.is_completed()).unwrap();
        assert_eq!(follow_up.name, "water plants");
        assert_eq!(follow_up.original_task_id, Some(id));
        assert!(follow_up.deadline.is_some());
    }

    #[test]
    fn test_occurrence_count_exhausts() {
        let mut task = Task::new("standup", ProjectId::new());
        task.deadline = Some(OffsetDateTime::now_utc());
        let mut rule = RecurrenceRule::every(RecurrenceFrequency::Daily, 1);
        rule.occurrences = Some(1);
        task.recurrence_rule = Some(rule);

        let next = spawn_next_occurrence(&task).unwrap();
        assert_eq!(next.recurrence_rule.as_ref().unwrap().occurrences, Some(0));
        assert!(spawn_next_occurrence(&next).is_none());
    }

    #[test]
    fn test_subtasks_reset_on_spawn() {
        let mut task = Task::new("checklist", ProjectId::new());
        task.recurrence_rule = Some(RecurrenceRule::every(RecurrenceFrequency::Weekly, 1));
        let mut subtask = Subtask::new("step one");
        subtask.is_completed = true;
        task.subtasks.push(subtask);

        let next = spawn_next_occurrence(&task).unwrap();
        assert_eq!(next.subtasks.len(), 1);
        assert!(!next.subtasks[0].is_completed);
    }
}
