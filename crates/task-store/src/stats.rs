use time::{Duration, OffsetDateTime};

use ventureflow_core::types::{Project, ProjectStats, ProjectStatus, Task};

/// Deadlines within this window count as upcoming.
const UPCOMING_WINDOW_DAYS: i64 = 7;

pub fn compute_stats(projects: &[Project], tasks: &[Task]) -> ProjectStats {
    let now = OffsetDateTime::now_utc();
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);

    ProjectStats {
        total_projects: projects.len(),
        active_projects: projects
            .iter()
            .filter(|project| project.status == ProjectStatus::InProgress)
            .count(),
        completed_projects: projects.iter().filter(|project| project.is_completed()).count(),
        on_hold_projects: projects
            .iter()
            .filter(|project| project.status == ProjectStatus::OnHold)
            .count(),
        planning_projects: projects
            .iter()
            .filter(|project| project.status == ProjectStatus::Planning)
            .count(),
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|task| task.is_completed()).count(),
        overdue_tasks: tasks.iter().filter(|task| task.is_overdue()).count(),
        upcoming_deadlines: tasks
            .iter()
            .filter(|task| !task.is_completed())
            .filter(|task| {
                task.deadline
                    .map(|deadline| deadline >= now && deadline <= horizon)
                    .unwrap_or(false)
            })
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventureflow_core::ids::ProjectId;
    use ventureflow_core::types::TaskStatus;

    #[test]
    fn test_stats_bucket_by_status() {
        let mut active = Project::new("active", "Work");
        active.status = ProjectStatus::InProgress;
        let mut done = Project::new("done", "Work");
        done.status = ProjectStatus::Completed;
        let planning = Project::new("planning", "Work");

        let project_id = active.id;
        let mut overdue = Task::new("late", project_id);
        overdue.deadline = Some(OffsetDateTime::now_utc() - Duration::days(2));
        let mut soon = Task::new("soon", project_id);
        soon.deadline = Some(OffsetDateTime::now_utc() + Duration::days(2));
        let mut finished = Task::new("finished", project_id);
        finished.status = TaskStatus::Completed;

        let stats = compute_stats(&[active, done, planning], &[overdue, soon, finished]);

        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.completed_projects, 1);
        assert_eq!(stats.planning_projects, 1);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.overdue_tasks, 1);
        assert_eq!(stats.upcoming_deadlines, 1);
    }

    #[test]
    fn test_far_deadlines_not_upcoming() {
        let mut task = Task::new("someday", ProjectId::new());
        task.deadline = Some(OffsetDateTime::now_utc() + Duration::days(30));
        let stats = compute_stats(&[], &[task]);
        assert_eq!(stats.upcoming_deadlines, 0);
    }
}
