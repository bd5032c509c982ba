//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs: where
//! the engine finds match histories, where it writes snapshots, and which
//! tournaments it replays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub tournaments: Vec<TournamentConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Directory holding `matches-<id>.json` history files.
    pub data_dir: String,
    /// Directory the rating/standings snapshots are written to.
    pub snapshot_dir: String,
}

/// One tournament the engine tracks.
#[derive(Debug, Deserialize, Clone)]
pub struct TournamentConfig {
    /// Feed id, e.g. "vf:tournament:31867".
    pub id: String,
    pub name: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [engine]
            data_dir = "data"
            snapshot_dir = "snapshots"

            [[tournaments]]
            id = "vf:tournament:31867"
            name = "English League"

            [[tournaments]]
            id = "vf:tournament:34616"
            name = "Bundesliga"
        "#;

        let cfg: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.engine.data_dir, "data");
        assert_eq!(cfg.engine.snapshot_dir, "snapshots");
        assert_eq!(cfg.tournaments.len(), 2);
        assert_eq!(cfg.tournaments[0].id, "vf:tournament:31867");
        assert_eq!(cfg.tournaments[1].name, "Bundesliga");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load("/tmp/formbook_no_such_config.toml").is_err());
    }
}
