//! # Planpass
//!
//! A small personal planner for the terminal with three views:
//!
//! *   **Daily**: habits you check in once a day, with a running streak.
//! *   **Future**: milestones with a countdown, soonest first.
//! *   **Temporary**: one-off to-dos that disappear once done.
//!
//! ## Usage
//!
//! Run without arguments to open the interactive UI:
//!
//! ```bash
//! planpass
//! # or explicitly
//! planpass ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `Tab` / `1` `2` `3`: Switch view
//! *   `a`: Add task
//! *   `Space`: Check in (Daily) or mark done (Temporary)
//!
//! ### Command Line Interface
//!
//! ```bash
//! planpass add "Run 5k" --category daily --due 2025-12-31
//! planpass list --category future
//! planpass check-in 1
//! planpass complete 3
//! ```
//!
//! ## Data Storage
//!
//! By default tasks live in memory and every start begins from the seed data.
//! Pass `--db <path>` or set `PLANPASS_DB` to keep them in a JSON file;
//! `--persist` uses `~/.local/share/planpass/tasks.json`.
//!
//! Logs are written to `planpass.log` in the same data directory. Set
//! `PLANPASS_LOG` (e.g. `debug`) to change the level.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use planpass::commands::*;
use planpass::config::{self, Config};
use planpass::deadline;
use planpass::logging;
use planpass::models::Category;
use planpass::planner::Planner;
use planpass::repository::FuturePolicy;
use planpass::tui::run_tui;

#[derive(Parser)]
#[command(name = "planpass")]
#[command(about = "Daily check-ins, future milestones and to-dos", long_about = None)]
struct Cli {
    /// JSON file to keep tasks in
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Keep tasks in the default data directory
    #[arg(long, global = true, conflicts_with = "db")]
    persist: bool,
    /// Keep tasks in memory only, ignoring PLANPASS_DB
    #[arg(long, global = true, conflicts_with_all = ["db", "persist"])]
    memory: bool,
    /// Whether passed milestones stay in the future list (show-overdue, hide-passed)
    #[arg(long, global = true)]
    future_policy: Option<FuturePolicy>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        /// daily, future or temp
        #[arg(short, long, default_value = "daily")]
        category: Category,
        /// Deadline in YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        due: Option<String>,
        /// Starting streak for a daily task
        #[arg(short, long)]
        streak: Option<u32>,
    },
    /// List tasks by view
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Check in a daily task for today
    CheckIn {
        id: u64,
    },
    /// Mark a temporary task as done
    Complete {
        id: u64,
    },
    /// Show a single task
    Show {
        id: u64,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "planpass", &mut io::stdout());
        return Ok(());
    }

    let _guard = match logging::init(&config::data_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let db = if cli.persist {
        Some(config::default_db_path())
    } else {
        cli.db
    };
    let config = Config::from_env().with_overrides(db, cli.memory, cli.future_policy);
    tracing::debug!(?config, "starting");

    let mut planner = Planner::open(config.store(), config.future_policy)
        .context("failed to load tasks")?;
    let today = deadline::today();

    let result = match cli.command {
        Some(Commands::Add { name, category, due, streak }) => {
            cmd_add(&mut planner, name, category, due, streak, today, false).map(|_| ())
        }
        Some(Commands::List { category }) => {
            cmd_list(&planner, category, today);
            Ok(())
        }
        Some(Commands::CheckIn { id }) => cmd_check_in(&mut planner, id, today, false).map(|_| ()),
        Some(Commands::Complete { id }) => cmd_complete(&mut planner, id, false),
        Some(Commands::Show { id }) => cmd_show(&planner, id, today),
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => {
            run_tui(planner).context("error running TUI")?;
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}
