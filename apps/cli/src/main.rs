#![deny(warnings)]

//! Headless planner: budget/ROI reports and scenario management.

mod args;
mod backend;
mod config;
mod report;

use anyhow::{anyhow, bail, Result};
use args::{Cli, Command, DbCmd, LocalCmd, USAGE};
use backend::Backend;
use config::CliConfig;
use persistence::FileKeyValueStore;
use planner_core::ParamsPatch;
use planner_store::{KeyedJsonPersistence, ScenarioStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Store = ScenarioStore<Backend, KeyedJsonPersistence<FileKeyValueStore>>;

fn version_line() -> String {
    format!(
        "planner {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHA"),
        env!("BUILD_DATE")
    )
}

async fn build_store(cfg: &CliConfig) -> Result<Store> {
    let backend = Backend::connect(cfg).await?;
    debug!(backend = backend.describe(), data_dir = %cfg.data_dir.display(), "store ready");
    let kv = FileKeyValueStore::new(cfg.data_dir.clone());
    Ok(ScenarioStore::new(backend, KeyedJsonPersistence::new(kv)))
}

/// Turn a failed remote action into an error carrying the recorded message.
fn remote_failure(store: &Store, action: &str) -> anyhow::Error {
    let reason = store
        .save_error()
        .unwrap_or_else(|| "unknown error".to_string());
    anyhow!("{action} failed: {reason}")
}

fn run_budget(
    store: &Store,
    preset: Option<String>,
    opex_model: Option<planner_core::OpexModel>,
    json: bool,
) -> Result<()> {
    if let Some(id) = preset {
        if !store.apply_predefined_scenario(&id) {
            bail!("unknown preset: {id}");
        }
    }
    if let Some(model) = opex_model {
        store.set_params(ParamsPatch {
            opex_model: Some(model),
            ..Default::default()
        })?;
    }
    let model = store.model();
    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", report::budget_text(model.results()));
        println!();
        print!("{}", report::roi_text(model.roi_results()));
    }
    Ok(())
}

fn run_local(store: &Store, cmd: LocalCmd) -> Result<()> {
    match cmd {
        LocalCmd::List => {
            let snap = store.snapshot();
            for s in &snap.saved_scenarios {
                println!("{}  {:<28} {}", s.id, s.name, s.updated_at.to_rfc3339());
            }
        }
        LocalCmd::Save(name) => {
            let saved = store.save_current_as_scenario(&name)?;
            println!("saved {} as {}", saved.name, saved.id);
        }
        LocalCmd::Load(id) => {
            if !store.load_scenario(id) {
                bail!("no local scenario {id}");
            }
            println!("loaded {id}");
        }
        LocalCmd::Delete(id) => {
            if !store.delete_scenario(id) {
                bail!("no local scenario {id}");
            }
            println!("deleted {id}");
        }
        LocalCmd::Rename(id, name) => {
            if !store.update_scenario_name(id, &name) {
                bail!("could not rename {id}");
            }
            println!("renamed {id} to {name}");
        }
    }
    Ok(())
}

async fn run_db(store: &Store, cmd: DbCmd) -> Result<()> {
    match cmd {
        DbCmd::List => {
            if !store.fetch_db_scenarios().await {
                return Err(remote_failure(store, "list"));
            }
            for s in &store.snapshot().db_scenarios {
                println!("{}  {:<28} {}", s.id, s.name, s.updated_at.to_rfc3339());
            }
        }
        DbCmd::Save { name, description } => {
            let row = store
                .save_to_database(&name, description.as_deref())
                .await
                .ok_or_else(|| remote_failure(store, "save"))?;
            println!("saved {} as {}", row.name, row.id);
        }
        DbCmd::Load(id) => {
            if !store.load_from_database(&id).await {
                return Err(remote_failure(store, "load"));
            }
            println!("loaded {id}");
        }
        DbCmd::Update(id) => {
            let row = store
                .update_in_database(&id)
                .await
                .ok_or_else(|| remote_failure(store, "update"))?;
            println!("updated {}", row.id);
        }
        DbCmd::Delete(id) => {
            if !store.delete_from_database(&id).await {
                return Err(remote_failure(store, "delete"));
            }
            println!("deleted {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        config_path,
        overrides,
        command,
    } = args::parse_args(std::env::args().skip(1))?;

    match command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        Command::Presets => {
            for p in planner_econ::predefined_scenarios() {
                println!("{:<20} {:<28} {}", p.id, p.name, p.description);
            }
            return Ok(());
        }
        _ => {}
    }

    let cfg = CliConfig::load(config_path.as_deref(), &overrides)?;
    let store = build_store(&cfg).await?;
    info!(?command, "running");

    match command {
        Command::Budget {
            preset,
            opex_model,
            json,
        } => run_budget(&store, preset, opex_model, json),
        Command::Local(cmd) => run_local(&store, cmd),
        Command::Db(cmd) => run_db(&store, cmd).await,
        Command::Help | Command::Version | Command::Presets => Ok(()),
    }
}
