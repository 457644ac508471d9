//! SAPA admin console.
//!
//! Interactive terminal console for approving users, schools and bookings and
//! managing hospital capacity, plus one-shot subcommands for scripting.

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod actions;
mod app;
mod cli;
mod error;
mod form;
mod headless;
mod state;
mod ui;

use actions::Console;
use app::App;
use cli::{Cli, Commands};
use sapa_db::{AdminStore, InMemoryStore, MySqlStore};
use sapa_runtime::{ui_channel, TaskRunner};
use state::AdminState;

const LOG_FILTER: &str = "sapa_tui=debug,sapa_runtime=debug,sapa_db=debug";

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Console {
        email: None,
        password: None,
    });
    let interactive = matches!(command, Commands::Console { .. });

    // The terminal belongs to the UI; logs go to a file there, stderr otherwise.
    if interactive {
        if let Some(file) = open_log_file(&cli.log_file) {
            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_env_filter(env_filter(LOG_FILTER))
                .with_ansi(false)
                .init();
        }
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter("sapa_tui=info,sapa_db=warn"))
            .init();
    }

    // Workers run here; the main thread owns the UI state.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sapa-worker")
        .build()?;

    let store: Arc<dyn AdminStore> = if cli.demo {
        Arc::new(InMemoryStore::seeded())
    } else {
        Arc::new(runtime.block_on(MySqlStore::connect(&cli.db.to_config()))?)
    };
    info!(backend = store.backend_name(), "Store ready");

    let (ui_handle, mut ui) = ui_channel();
    let runner = TaskRunner::new(runtime.handle().clone(), ui_handle);
    let console = Console::new(runner, store.clone());
    let mut state = AdminState::new(store.backend_name());

    match command {
        Commands::Console { email, password } => {
            let terminal = ratatui::init();

            let mut app = App::new(state, ui, console);
            match (email, password) {
                (Some(email), Some(password)) => app.start_logged_in(email, password),
                _ => app.start_with_login(),
            }
            let result = app.run(terminal);

            ratatui::restore();
            info!("Console shutdown complete");
            result?;
        }
        command => {
            let output = headless::run_command(command, &console, &mut ui, &mut state)?;
            if !output.is_empty() {
                println!("{}", output);
            }
        }
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}

/// `RUST_LOG` if set, otherwise `default`.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Create the console log file, or say on stderr why logging is off.
fn open_log_file(path: &Path) -> Option<File> {
    match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "sapa-admin: cannot create log file {}: {}; logging disabled",
                path.display(),
                e
            );
            None
        }
    }
}
