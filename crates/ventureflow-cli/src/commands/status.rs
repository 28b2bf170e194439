use std::path::PathBuf;

use anyhow::Result;

use task_store::compute_stats;
use ventureflow_core::store::keys;
use web_session::{CookieRecord, BLANK_SENTINEL};

use crate::commands::{load_config, open_store, open_workspace};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_store()?;

    match store.get::<bool>(keys::GATE_BLOCKED) {
        Some(true) => println!("Gate: blocked (native surface)"),
        Some(false) => println!("Gate: open (web surface)"),
        None => println!("Gate: undecided"),
    }
    if config.gate.endpoint.is_empty() {
        println!("Endpoint: (unconfigured)");
    } else {
        println!("Endpoint: {}", config.gate.endpoint);
    }

    match store.get::<String>(keys::LAST_NAVIGATED_URL) {
        Some(url) if !url.is_empty() && url != BLANK_SENTINEL => {
            println!("Last navigated: {url}");
        }
        _ => println!("Last navigated: (none)"),
    }
    let cookies: Vec<CookieRecord> = store.get_vec(keys::COOKIE_JAR);
    println!("Stored cookies: {}", cookies.len());

    let workspace = open_workspace()?;
    let stats = compute_stats(&workspace.projects.all(), &workspace.tasks.all());
    println!(
        "Projects: {} total ({} active, {} on hold, {} completed)",
        stats.total_projects, stats.active_projects, stats.on_hold_projects, stats.completed_projects
    );
    println!(
        "Tasks: {} total, {} completed, {} overdue",
        stats.total_tasks, stats.completed_tasks, stats.overdue_tasks
    );
    println!(
        "Lifetime: {} projects created, {} tasks completed",
        workspace.projects.total_created(),
        workspace.tasks.total_completed()
    );
    Ok(())
}
