use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Alert, ListingView, ManageError, ManagementView, RecordStore, RestRecordStore, ScreenState,
};
use shared::domain::DocenteId;
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::{load_settings, normalize_database_url, Backend, Settings};

const DEFAULT_LOG_FILTER: &str = "vincula=info,client_core=info,storage=info";
const GENERIC_FAILURE: &str = "The docente could not be saved.";

#[derive(Parser, Debug)]
#[command(name = "vincula", about = "Manage the docentes of a Docentes table")]
struct Cli {
    /// TOML settings file; missing files are ignored.
    #[arg(long, default_value = "vincula.toml")]
    config: PathBuf,
    /// Only log errors.
    #[arg(long)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the active docentes.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a docente.
    Add {
        name: String,
        regime: String,
        order: String,
    },
    /// Edit a docente; omitted fields keep their current value.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        regime: Option<String>,
        #[arg(long)]
        order: Option<String>,
    },
    /// Soft-delete a docente.
    Delete { id: i64 },
    /// Interactive session toggling between the list and management views.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let settings = load_settings(&cli.config)?;
    info!(backend = %settings.backend, table = %settings.table, "vincula starting");
    let store = open_store(&settings).await?;

    match cli.command {
        Command::List { search } => list(store, search).await,
        Command::Add {
            name,
            regime,
            order,
        } => {
            let mut view = mounted_management(store).await?;
            view.open_create();
            if let Some(form) = view.form_mut() {
                form.name = name;
                form.regime = regime;
                form.order = order;
            }
            let outcome = view.submit().await;
            finish(&mut view, outcome)
        }
        Command::Edit {
            id,
            name,
            regime,
            order,
        } => {
            let mut view = mounted_management(store).await?;
            if !view.open_edit(DocenteId(id)) {
                bail!("docente {id} not found");
            }
            if let Some(form) = view.form_mut() {
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(regime) = regime {
                    form.regime = regime;
                }
                if let Some(order) = order {
                    form.order = order;
                }
            }
            let outcome = view.submit().await;
            finish(&mut view, outcome)
        }
        Command::Delete { id } => {
            let mut view = mounted_management(store).await?;
            let outcome = view.delete(DocenteId(id)).await;
            finish(&mut view, outcome)
        }
        Command::Shell => shell::run(store).await,
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_store(settings: &Settings) -> Result<Arc<dyn RecordStore>> {
    match settings.backend {
        Backend::Rest => {
            let url = settings
                .supabase_url
                .as_deref()
                .context("supabase_url (SUPABASE_URL) is required for the rest backend")?;
            let key = settings
                .supabase_key
                .as_deref()
                .context("supabase_key (SUPABASE_KEY) is required for the rest backend")?;
            let store = RestRecordStore::new(url, key, &settings.table)?;
            Ok(Arc::new(store))
        }
        Backend::Sqlite => {
            let database_url = normalize_database_url(&settings.database_url)?;
            let storage = Storage::new(&database_url).await?;
            storage
                .health_check()
                .await
                .with_context(|| format!("database '{database_url}' is not usable"))?;
            Ok(Arc::new(storage))
        }
    }
}

async fn list(store: Arc<dyn RecordStore>, search: Option<String>) -> Result<()> {
    let mut view = ListingView::mount(store).await;
    ensure_loaded(view.state())?;
    if let Some(term) = search {
        view.set_search(term);
    }
    println!("{}", render::screen("Docentes", view.state(), &view.visible()));
    Ok(())
}

async fn mounted_management(store: Arc<dyn RecordStore>) -> Result<ManagementView> {
    let view = ManagementView::mount(store).await;
    ensure_loaded(view.state())?;
    Ok(view)
}

fn ensure_loaded(state: &ScreenState) -> Result<()> {
    if let ScreenState::Failed { message } = state {
        bail!("{message}");
    }
    Ok(())
}

/// Prints the success notice, or turns the error notice into the exit error.
/// Store details only reach the log.
fn finish(view: &mut ManagementView, outcome: Result<(), ManageError>) -> Result<()> {
    let alert = view.take_alert();
    match outcome {
        Ok(()) => {
            if let Some(alert) = alert {
                println!("{}", render::alert(&alert));
            }
            if let ScreenState::Ready(_) = view.state() {
                println!(
                    "{}",
                    render::screen("Manage docentes", view.state(), &view.visible())
                );
            }
            Ok(())
        }
        Err(err) => Err(anyhow!(failure_message(alert, &err))),
    }
}

/// Validation text is safe to show as is; store failures never are.
fn failure_message(alert: Option<Alert>, err: &ManageError) -> String {
    match (alert, err) {
        (Some(alert), _) => alert.message,
        (None, ManageError::Validation(invalid)) => invalid.to_string(),
        (None, _) => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
