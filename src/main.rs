use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use tasktally::commands::{cmd_add, cmd_done, cmd_list, cmd_stats};
use tasktally::config::{resolve_db_path, DB_ENV_VAR};
use tasktally::tui::run_tui;
use tasktally::{TaskService, TaskStore};

#[derive(Parser)]
#[command(name = "tasktally", version)]
#[command(about = "Personal task tracker with priority from keywords and completion time", long_about = None)]
struct Cli {
    /// Path to the task file
    #[arg(long, global = true, env = DB_ENV_VAR)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description (all remaining words)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// List tasks sorted by priority
    List,
    /// Mark a task as done
    Done {
        /// Task id
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Show task totals and average completion time
    Stats,
    /// Open interactive TUI
    Ui,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tasktally=debug" } else { "tasktally=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Bad invocations only print usage; they are not failures.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let db_path = resolve_db_path(cli.db);
    tracing::debug!(path = %db_path.display(), "Using task file");
    let service = TaskService::new(TaskStore::new(db_path));

    let result = match command {
        Commands::Add { words } => cmd_add(&service, &words).map_err(anyhow::Error::from),
        Commands::List => cmd_list(&service).map_err(anyhow::Error::from),
        Commands::Done { id } => cmd_done(&service, &id).map_err(anyhow::Error::from),
        Commands::Stats => cmd_stats(&service).map_err(anyhow::Error::from),
        Commands::Ui => run_tui(service),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tasktally", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
