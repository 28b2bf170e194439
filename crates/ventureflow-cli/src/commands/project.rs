use std::path::PathBuf;

use anyhow::Result;

use ventureflow_core::types::{Project, TaskPriority};

use crate::commands::{load_config, open_workspace};

#[derive(Debug)]
pub enum ProjectAction {
    Add {
        name: String,
        category: Option<String>,
        priority: Option<TaskPriority>,
        description: Option<String>,
    },
    List,
}

pub fn execute(config_path: Option<PathBuf>, action: ProjectAction) -> Result<()> {
    let workspace = open_workspace()?;
    match action {
        ProjectAction::Add {
            name,
            category,
            priority,
            description,
        } => {
            let config = load_config(config_path)?;
            let category = category.unwrap_or(config.defaults.category);

            // Known categories are seeded on first use; a new name is
            // registered alongside the project.
            let known = workspace.categories.all()?;
            if !known.iter().any(|stored| stored.name == category) {
                workspace.categories.add(ventureflow_core::types::Category::new(
                    category.clone(),
                    "808080",
                    "folder",
                ))?;
            }

            let mut project = Project::new(name, category);
            project.priority = priority.unwrap_or(config.defaults.priority);
            if let Some(description) = description {
                project.description = description;
            }
            let name = project.name.clone();
            workspace.projects.create(project)?;
            println!("Added project '{name}'");
        }
        ProjectAction::List => {
            let projects = workspace.projects.all();
            if projects.is_empty() {
                println!("No projects.");
                return Ok(());
            }
            for project in projects {
                let open_tasks = workspace
                    .tasks
                    .for_project(project.id)
                    .iter()
                    .filter(|task| !task.is_completed())
                    .count();
                println!(
                    "{}  [{}] {} ({} open tasks)",
                    project.name, project.status, project.category, open_tasks
                );
            }
        }
    }
    Ok(())
}
