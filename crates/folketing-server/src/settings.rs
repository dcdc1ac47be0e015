//! Server configuration: optional TOML file, then `FOLKETING_*` variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use folketing_api::Environment;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  pub environment:   Environment,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Read `path` if it exists, layer the environment on top and fill defaults.
pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
  load_from(config::File::from(path).required(false))
}

fn load_from<T>(file: T) -> anyhow::Result<ServerConfig>
where
  T: config::Source + Send + Sync + 'static,
{
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 3000_i64)?
    .set_default("database_path", "folketing.db")?
    .set_default("environment", "development")?
    .add_source(file)
    .add_source(config::Environment::with_prefix("FOLKETING"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = load(Path::new("definitely/not/here.toml")).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:3000");
    assert_eq!(cfg.database_path, PathBuf::from("folketing.db"));
    assert_eq!(cfg.environment, Environment::Development);
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = load_from(File::from_str(
      "port = 8080\nenvironment = \"production\"\ndatabase_path = \"/var/lib/folketing.db\"",
      FileFormat::Toml,
    ))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.environment.is_production());
    assert_eq!(cfg.database_path, PathBuf::from("/var/lib/folketing.db"));
  }

  #[test]
  fn unknown_environment_is_rejected() {
    let result = load_from(File::from_str("environment = \"staging\"", FileFormat::Toml));
    assert!(result.is_err());
  }
}
