//! # tq - priority-driven task queue
//!
//! Capture incoming work, always pull the most urgent task next, and keep a
//! record of what was finished or dropped.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive menu
//! tq
//!
//! # Add a task via CLI
//! tq add "Replace toner on floor 2" --priority high --origin phone
//!
//! # Start the next task, then finish it
//! tq next
//! tq complete
//!
//! # Archive tasks completed over a week ago and review them
//! tq archive
//! tq archived
//! ```
//!
//! Data is stored in `~/.taskq/` (override with `--dir` or `TASKQ_DIR`) as
//! `tasks.json` and `archived_tasks.json`. Set `RUST_LOG=debug` for tracing output.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskq::cli::Cli;
use taskq::cmd::*;
use taskq::config::Config;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.dir);
    tracing::debug!(dir = %config.data_dir().display(), "using data directory");

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&config),
        Commands::Add { title, desc, priority, origin } => cmd_add(&config, title, desc, priority, origin),
        Commands::Next => cmd_next(&config),
        Commands::Priority { id, priority } => cmd_priority(&config, id, priority),
        Commands::Complete => cmd_complete(&config),
        Commands::Archive { days } => cmd_archive(&config, days),
        Commands::Delete { id } => cmd_delete(&config, id),
        Commands::Report { plain } => cmd_report(&config, plain),
        Commands::Archived { plain } => cmd_archived(&config, plain),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
