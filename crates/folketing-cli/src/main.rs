//! `folketing`: command-line client for the Folketing person registry.
//!
//! # Usage
//!
//! ```text
//! folketing list
//! folketing create --name "Mette Frederiksen" --party Socialdemokratiet \
//!   --position Minister --start-date 2019-06-27
//! folketing party venstre --url http://localhost:3000
//! ```

mod client;
mod output;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::ApiClient;
use folketing_core::PersonInput;
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "folketing", about = "Client for the Folketing person registry")]
struct Args {
  /// Path to a TOML config file (`url = "..."`).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<std::path::PathBuf>,

  /// Base URL of the server (default: http://localhost:3000).
  #[arg(long, env = "FOLKETING_URL", global = true)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every person, newest first.
  List,
  /// Show one person.
  Get { id: String },
  /// Register a new person.
  Create(Fields),
  /// Change some fields of an existing person.
  Update {
    id: String,
    #[command(flatten)]
    fields: Fields,
  },
  /// Delete a person.
  Delete { id: String },
  /// List holders of a position (Minister, Formand or Kandidat).
  Position { position: String },
  /// List persons whose party contains the given text.
  Party { party: String },
}

/// Person fields. Left optional here so the server reports every missing
/// field at once instead of clap stopping at the first.
#[derive(ClapArgs, Debug)]
struct Fields {
  #[arg(long)]
  name:       Option<String>,
  #[arg(long)]
  party:      Option<String>,
  #[arg(long)]
  position:   Option<String>,
  /// ISO 8601 date, e.g. 2019-06-27.
  #[arg(long)]
  start_date: Option<String>,
}

impl From<Fields> for PersonInput {
  fn from(f: Fields) -> Self {
    PersonInput {
      name:       f.name.map(Into::into),
      party:      f.party.map(Into::into),
      position:   f.position.map(Into::into),
      start_date: f.start_date.map(Into::into),
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
  if let Err(e) = run(Args::parse()).await {
    eprintln!("error: {e:#}");
    std::process::exit(1);
  }
}

async fn run(args: Args) -> Result<()> {
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let url = args
    .url
    .or(file_cfg.url)
    .unwrap_or_else(|| DEFAULT_URL.to_owned());
  let api = ApiClient::new(&url)?;

  let out = match args.command {
    Command::List => output::table(&api.list().await?),
    Command::Get { id } => output::record(&api.get(&id).await?),
    Command::Create(fields) => output::record(&api.create(&fields.into()).await?),
    Command::Update { id, fields } => output::record(&api.update(&id, &fields.into()).await?),
    Command::Delete { id } => {
      api.delete(&id).await?;
      format!("deleted {id}\n")
    }
    Command::Position { position } => output::table(&api.by_position(&position).await?),
    Command::Party { party } => output::table(&api.by_party(&party).await?),
  };
  print!("{out}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Args::command().debug_assert(); }

  #[test]
  fn create_collects_fields_into_input() {
    let args = Args::try_parse_from([
      "folketing",
      "create",
      "--name",
      "Pia",
      "--position",
      "Formand",
      "--start-date",
      "2012-09-12",
    ])
    .unwrap();
    let Command::Create(fields) = args.command else { panic!("expected create") };
    let input = PersonInput::from(fields);
    assert_eq!(input.name, Some("Pia".into()));
    assert_eq!(input.party, None);
    assert_eq!(input.start_date, Some("2012-09-12".into()));
  }

  #[test]
  fn update_takes_id_and_partial_fields() {
    let args =
      Args::try_parse_from(["folketing", "update", "abc", "--party", "Venstre"]).unwrap();
    let Command::Update { id, fields } = args.command else { panic!("expected update") };
    assert_eq!(id, "abc");
    assert_eq!(fields.party.as_deref(), Some("Venstre"));
    assert!(fields.name.is_none());
  }

  #[test]
  fn config_file_url_is_optional() {
    let cfg: ConfigFile = toml::from_str("").unwrap();
    assert!(cfg.url.is_none());
    let cfg: ConfigFile = toml::from_str("url = \"http://example.org\"").unwrap();
    assert_eq!(cfg.url.as_deref(), Some("http://example.org"));
  }
}
