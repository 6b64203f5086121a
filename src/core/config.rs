//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::engine::DuplicatePolicy;

/// Documented fallback used when no layer supplies a threshold
pub const DEFAULT_BORDERLINE_THRESHOLD_PCT: f64 = 10.0;

/// Specgate configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Judgment tunables
    pub judgment: JudgmentConfig,

    /// Specification loading tunables
    pub specifications: SpecificationsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JudgmentConfig {
    /// Passing margins at or below this percentage are flagged BORDERLINE
    pub borderline_threshold_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpecificationsConfig {
    /// How duplicate (part_id, measurement_type) keys are handled
    pub duplicate_keys: Option<DuplicatePolicy>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/specgate/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Local config (./specgate.yaml)
        let local_path = PathBuf::from("specgate.yaml");
        if local_path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&local_path) {
                if let Ok(local) = serde_yml::from_str::<Config>(&contents) {
                    config.merge(local);
                }
            }
        }

        // 4. Environment variables
        if let Ok(raw) = std::env::var("SPECGATE_BORDERLINE_THRESHOLD") {
            if let Ok(pct) = raw.trim().parse::<f64>() {
                config.judgment.borderline_threshold_pct = Some(pct);
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "specgate")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.judgment.borderline_threshold_pct.is_some() {
            self.judgment.borderline_threshold_pct = other.judgment.borderline_threshold_pct;
        }
        if other.specifications.duplicate_keys.is_some() {
            self.specifications.duplicate_keys = other.specifications.duplicate_keys;
        }
    }

    /// Effective borderline threshold, defaulting to 10 when unset
    pub fn borderline_threshold(&self) -> f64 {
        self.judgment
            .borderline_threshold_pct
            .unwrap_or(DEFAULT_BORDERLINE_THRESHOLD_PCT)
    }

    /// Effective duplicate-key policy, defaulting to overwrite
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.specifications.duplicate_keys.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.borderline_threshold(), 10.0);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_parse_yaml() {
        let config: Config = serde_yml::from_str(
            "judgment:\n  borderline_threshold_pct: 15.5\nspecifications:\n  duplicate_keys: reject\n",
        )
        .unwrap();
        assert_eq!(config.borderline_threshold(), 15.5);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config =
            serde_yml::from_str("judgment:\n  borderline_threshold_pct: 5\n").unwrap();
        assert_eq!(config.borderline_threshold(), 5.0);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_merge_precedence() {
        let mut base: Config =
            serde_yml::from_str("judgment:\n  borderline_threshold_pct: 5\n").unwrap();
        let overlay: Config =
            serde_yml::from_str("judgment:\n  borderline_threshold_pct: 20\n").unwrap();
        base.merge(overlay);
        assert_eq!(base.borderline_threshold(), 20.0);

        // An empty overlay changes nothing
        base.merge(Config::default());
        assert_eq!(base.borderline_threshold(), 20.0);
    }
}
