use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use gate_engine::{GateEngine, Surface};
use task_store::compute_stats;
use web_session::BrowserSession;

use ventureflow_core::store::keys;

use crate::commands::{load_config, open_store, open_workspace};

pub fn execute(
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
    no_session: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(endpoint) = endpoint {
        config.gate.endpoint = endpoint;
    }
    let store = open_store()?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(async {
        let mut engine = GateEngine::new(&config.gate, store.clone())?;
        let surface = engine.resolve().await?;
        info!(?surface, "launch surface selected");

        match surface {
            Surface::Native => {
                println!("Surface: native");
                print_native_home()?;
            }
            Surface::Web => {
                println!("Surface: web");
                if no_session {
                    return Ok(());
                }
                let session = BrowserSession::bootstrap(
                    &config.session,
                    &config.gate.accept_language,
                    store.clone(),
                )?;
                println!("Entry: {} {}", session.entry_request().method, session.entry_request().url);
                let summary = session.run(&config.gate.user_agent).await?;
                println!("Session: {:?}", summary.state);
                if let Some(url) = summary.current_url {
                    println!("Reached: {url}");
                }
                if summary.stalls > 0 {
                    println!("Stalled loads: {}", summary.stalls);
                }
            }
        }
        Ok(())
    })
}

fn print_native_home() -> Result<()> {
    let store = open_store()?;
    if !store.contains(keys::HAS_SEEN_ONBOARDING) {
        println!("Welcome to VentureFlow. Add a project with 'ventureflow project add'.");
        store.set(keys::HAS_SEEN_ONBOARDING, &true)?;
    }
    let workspace = open_workspace()?;
    let stats = compute_stats(&workspace.projects.all(), &workspace.tasks.all());
    println!(
        "Projects: {} total, {} active, {} completed",
        stats.total_projects, stats.active_projects, stats.completed_projects
    );
    println!(
        "Tasks: {} total, {} completed, {} overdue, {} due this week",
        stats.total_tasks, stats.completed_tasks, stats.overdue_tasks, stats.upcoming_deadlines
    );
    Ok(())
}
