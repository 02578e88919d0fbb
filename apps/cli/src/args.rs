//! Command-line parsing.

use crate::config::ConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use planner_core::OpexModel;
use std::path::PathBuf;
use uuid::Uuid;

pub const USAGE: &str = "\
usage: planner [--config FILE] [--api-url URL] [--db-url URL] [--data-dir DIR] COMMAND

commands:
  budget [--preset ID] [--opex-model room-based|sessions-based] [--json]
  presets
  local list | save NAME | load ID | delete ID | rename ID NAME
  db list | save NAME [--description TEXT] | load ID | update ID | delete ID
  --version";

#[derive(Clone, Debug, PartialEq)]
pub enum LocalCmd {
    List,
    Save(String),
    Load(Uuid),
    Delete(Uuid),
    Rename(Uuid, String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DbCmd {
    List,
    Save {
        name: String,
        description: Option<String>,
    },
    Load(String),
    Update(String),
    Delete(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Budget {
        preset: Option<String>,
        opex_model: Option<OpexModel>,
        json: bool,
    },
    Presets,
    Local(LocalCmd),
    Db(DbCmd),
    Version,
    Help,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cli {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub command: Command,
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn uuid_arg(raw: Option<String>) -> Result<Uuid> {
    let raw = raw.ok_or_else(|| anyhow!("missing scenario id"))?;
    Uuid::parse_str(&raw).with_context(|| format!("not a local scenario id: {raw}"))
}

fn required(raw: Option<String>, what: &str) -> Result<String> {
    raw.ok_or_else(|| anyhow!("missing {what}"))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli> {
    let mut config_path = None;
    let mut overrides = ConfigOverrides::default();
    let mut rest = Vec::new();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config_path = Some(PathBuf::from(value(&mut it, "--config")?)),
            "--api-url" => overrides.api_url = Some(value(&mut it, "--api-url")?),
            "--db-url" => overrides.db_url = Some(value(&mut it, "--db-url")?),
            "--data-dir" => overrides.data_dir = Some(PathBuf::from(value(&mut it, "--data-dir")?)),
            _ => rest.push(arg),
        }
    }

    let mut it = rest.into_iter();
    let command = match it.next().as_deref() {
        None | Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some("--version") | Some("-V") => Command::Version,
        Some("presets") => Command::Presets,
        Some("budget") => {
            let mut preset = None;
            let mut opex_model = None;
            let mut json = false;
            while let Some(arg) = it.next() {
                match arg.as_str() {
                    "--preset" => preset = Some(value(&mut it, "--preset")?),
                    "--opex-model" => {
                        let raw = value(&mut it, "--opex-model")?;
                        opex_model = Some(raw.parse::<OpexModel>().map_err(|e| anyhow!(e))?);
                    }
                    "--json" => json = true,
                    other => bail!("unknown budget option: {other}"),
                }
            }
            Command::Budget {
                preset,
                opex_model,
                json,
            }
        }
        Some("local") => Command::Local(match it.next().as_deref() {
            Some("list") => LocalCmd::List,
            Some("save") => LocalCmd::Save(required(it.next(), "scenario name")?),
            Some("load") => LocalCmd::Load(uuid_arg(it.next())?),
            Some("delete") => LocalCmd::Delete(uuid_arg(it.next())?),
            Some("rename") => {
                let id = uuid_arg(it.next())?;
                LocalCmd::Rename(id, required(it.next(), "new name")?)
            }
            other => bail!("unknown local command: {}", other.unwrap_or("<none>")),
        }),
        Some("db") => Command::Db(match it.next().as_deref() {
            Some("list") => DbCmd::List,
            Some("save") => {
                let name = required(it.next(), "scenario name")?;
                let mut description = None;
                while let Some(arg) = it.next() {
                    match arg.as_str() {
                        "--description" => description = Some(value(&mut it, "--description")?),
                        other => bail!("unknown db save option: {other}"),
                    }
                }
                DbCmd::Save { name, description }
            }
            Some("load") => DbCmd::Load(required(it.next(), "scenario id")?),
            Some("update") => DbCmd::Update(required(it.next(), "scenario id")?),
            Some("delete") => DbCmd::Delete(required(it.next(), "scenario id")?),
            other => bail!("unknown db command: {}", other.unwrap_or("<none>")),
        }),
        Some(other) => bail!("unknown command: {other}"),
    };

    Ok(Cli {
        config_path,
        overrides,
        command,
    })
}
