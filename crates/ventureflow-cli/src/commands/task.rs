use std::path::PathBuf;

use anyhow::{bail, Result};
use time::{Duration, OffsetDateTime};

use ventureflow_core::types::{Task, TaskPriority};

use crate::commands::{load_config, open_workspace};

#[derive(Debug)]
pub enum TaskAction {
    Add {
        name: String,
        project: String,
        priority: Option<TaskPriority>,
        due_in_days: Option<i64>,
    },
    List {
        project: Option<String>,
    },
    Complete {
        name: String,
    },
}

pub fn execute(config_path: Option<PathBuf>, action: TaskAction) -> Result<()> {
    let workspace = open_workspace()?;
    match action {
        TaskAction::Add {
            name,
            project,
            priority,
            due_in_days,
        } => {
            let Some(project) = workspace.projects.find_by_name(&project) else {
                bail!("no project named '{project}'");
            };
            let config = load_config(config_path)?;

            let mut task = Task::new(name, project.id);
            task.priority = priority.unwrap_or(config.defaults.priority);
            if let Some(days) = due_in_days {
                task.deadline = Some(OffsetDateTime::now_utc() + Duration::days(days));
            }
            let name = task.name.clone();
            workspace.tasks.create(task)?;
            println!("Added task '{name}' to '{}'", project.name);
        }
        TaskAction::List { project } => {
            let tasks = match project {
                Some(name) => {
                    let Some(project) = workspace.projects.find_by_name(&name) else {
                        bail!("no project named '{name}'");
                    };
                    workspace.tasks.for_project(project.id)
                }
                None => workspace.tasks.all(),
            };
            if tasks.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            for task in tasks {
                let due = match task.days_until_deadline() {
                    Some(days) if days < 0 => format!("overdue by {} days", -days),
                    Some(days) => format!("due in {days} days"),
                    None => "no deadline".to_string(),
                };
                println!("{}  [{}] {} ({due})", task.name, task.status, task.priority);
            }
        }
        TaskAction::Complete { name } => {
            let Some(task) = workspace.tasks.find_by_name(&name) else {
                bail!("no task named '{name}'");
            };
            workspace.tasks.complete(task.id)?;
            println!("Completed '{name}'");
            if task.recurrence_rule.as_ref().map(|rule| rule.is_active()) == Some(true) {
                println!("Scheduled the next occurrence.");
            }
        }
    }
    Ok(())
}
