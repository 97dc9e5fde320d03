// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::rates::DEFAULT_GROUNDSPEEDS_KT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Table settings. Defaults reproduce the standard 8-row DME table and the
/// 80-160 kt rate-of-descent table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_groundspeeds")]
    pub groundspeeds_kt: Vec<u32>,
    #[serde(default = "default_max_checkpoints")]
    pub max_checkpoints: usize,
    /// Outer end of the MDA line on the profile chart (NM).
    #[serde(default = "default_mda_line_extent")]
    pub mda_line_extent_nm: f64,
    #[serde(default)]
    pub schema_version: u32,
}

fn default_groundspeeds() -> Vec<u32> {
    DEFAULT_GROUNDSPEEDS_KT.to_vec()
}

fn default_max_checkpoints() -> usize {
    8
}

fn default_mda_line_extent() -> f64 {
    20.0
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            groundspeeds_kt: default_groundspeeds(),
            max_checkpoints: default_max_checkpoints(),
            mda_line_extent_nm: default_mda_line_extent(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

pub fn get_config_root() -> PathBuf {
    ProjectDirs::from("org", "glidepath", "glidepath")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl PlannerConfig {
    pub fn default_path() -> PathBuf {
        get_config_root().join("planner.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groundspeeds_kt.is_empty() {
            return Err(ConfigError::Invalid(
                "groundspeeds_kt must list at least one groundspeed".to_string(),
            ));
        }
        if self.groundspeeds_kt.contains(&0) {
            return Err(ConfigError::Invalid(
                "groundspeeds_kt must be positive".to_string(),
            ));
        }
        if self.max_checkpoints == 0 {
            return Err(ConfigError::Invalid(
                "max_checkpoints must be at least 1".to_string(),
            ));
        }
        if !self.mda_line_extent_nm.is_finite() || self.mda_line_extent_nm <= 0.0 {
            return Err(ConfigError::Invalid(
                "mda_line_extent_nm must be a positive distance".to_string(),
            ));
        }
        Ok(())
    }

    /// Strict load: a missing file yields defaults, a broken one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No planner config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: PlannerConfig = serde_json::from_str(&content).map_err(|e| {
            log::error!("Planner config JSON parse error for {:?}: {}", path, e);
            e
        })?;
        config.validate()?;

        if config.schema_version < CURRENT_SCHEMA_VERSION {
            // v1 files predate mda_line_extent_nm; serde defaults already filled it.
            log::info!(
                "Migrating planner config from schema v{} to v{}",
                config.schema_version,
                CURRENT_SCHEMA_VERSION
            );
            config.schema_version = CURRENT_SCHEMA_VERSION;
            if let Err(e) = config.save(path) {
                log::warn!("Could not write migrated planner config to {:?}: {}", path, e);
            }
        }

        log::info!("Loaded planner config from {:?}", path);
        Ok(config)
    }

    /// Lenient load used at startup: any problem falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring planner config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("Saved planner config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::load(&dir.path().join("planner.json")).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.groundspeeds_kt, vec![80, 100, 120, 140, 160]);
        assert_eq!(config.max_checkpoints, 8);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("planner.json");
        let config = PlannerConfig {
            groundspeeds_kt: vec![90, 110],
            max_checkpoints: 6,
            ..PlannerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(PlannerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_old_schema_is_migrated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(&path, r#"{"groundspeeds_kt": [70, 90], "max_checkpoints": 5}"#).unwrap();

        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.mda_line_extent_nm, 20.0);

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("\"schema_version\": 2"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(&path, r#"{"groundspeeds_kt": [], "schema_version": 2}"#).unwrap();
        assert!(matches!(
            PlannerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(PlannerConfig::load_or_default(&path), PlannerConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PlannerConfig::load(&path), Err(ConfigError::Json(_))));
    }
}
