use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ventureflow_core::types::TaskPriority;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "ventureflow",
    version,
    about = "Project planner with a remote-gated launch surface"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the launch gate and boot the selected surface
    Launch {
        /// Override the configured gate endpoint for this launch
        #[arg(long)]
        endpoint: Option<String>,
        /// Decide the surface but skip driving the web session
        #[arg(long)]
        no_session: bool,
    },
    /// Show the persisted gate decision, session state and totals
    Status,
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Show the completion history, newest first
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Data {
        #[command(subcommand)]
        action: DataCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Init {
        #[arg(long)]
        force: bool,
    },
    Print,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        description: Option<String>,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    Add {
        name: String,
        /// Name of the project the task belongs to
        #[arg(long)]
        project: String,
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// Deadline as days from now
        #[arg(long)]
        due_in_days: Option<i64>,
    },
    List {
        #[arg(long)]
        project: Option<String>,
    },
    Complete {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Wipe every persisted record, including the gate and session state
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Print the raw store contents as JSON
    Export,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Launch {
            endpoint,
            no_session,
        } => commands::launch::execute(cli.config, endpoint, no_session),
        Commands::Status => commands::status::execute(cli.config),
        Commands::Config { action } => match action {
            ConfigCommand::Init { force } => commands::config::init(cli.config, force),
            ConfigCommand::Print => commands::config::print_effective(cli.config),
        },
        Commands::Project { action } => {
            let action = match action {
                ProjectCommand::Add {
                    name,
                    category,
                    priority,
                    description,
                } => commands::project::ProjectAction::Add {
                    name,
                    category,
                    priority,
                    description,
                },
                ProjectCommand::List => commands::project::ProjectAction::List,
            };
            commands::project::execute(cli.config, action)
        }
        Commands::Task { action } => {
            let action = match action {
                TaskCommand::Add {
                    name,
                    project,
                    priority,
                    due_in_days,
                } => commands::task::TaskAction::Add {
                    name,
                    project,
                    priority,
                    due_in_days,
                },
                TaskCommand::List { project } => commands::task::TaskAction::List { project },
                TaskCommand::Complete { name } => commands::task::TaskAction::Complete { name },
            };
            commands::task::execute(cli.config, action)
        }
        Commands::History { limit } => commands::history::execute(limit),
        Commands::Data { action } => match action {
            DataCommand::Clear { yes } => commands::data::clear(yes),
            DataCommand::Export => commands::data::export(),
        },
    }
}
