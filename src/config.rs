use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const VALIDATION_TYPES: [&str; 9] = [
    "end_to_end",
    "data_flow",
    "business_logic",
    "integration",
    "user_workflow",
    "error_handling",
    "performance",
    "security",
    "data_consistency",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    pub thresholds: Thresholds,
    pub validations: BTreeMap<String, bool>,
    pub automation: AutomationSettings,
    pub dataset: DatasetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Thresholds {
    pub performance: PerformanceThresholds,
    pub accuracy: AccuracyThresholds,
    pub security: SecurityThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub max_response_time: f64,
    pub min_throughput: u32,
    pub max_memory_usage: u32,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            max_response_time: 5.0,
            min_throughput: 100,
            max_memory_usage: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyThresholds {
    pub min_success_rate: f64,
    pub max_error_rate: f64,
    pub data_precision: f64,
}

impl Default for AccuracyThresholds {
    fn default() -> Self {
        Self {
            min_success_rate: 0.95,
            max_error_rate: 0.05,
            data_precision: 0.99,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityThresholds {
    pub max_failed_attempts: u32,
    pub session_timeout: u64,
    pub password_strength: String,
}

impl Default for SecurityThresholds {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            session_timeout: 3600,
            password_strength: "strong".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettings {
    pub enabled: bool,
    pub schedule: String,
    pub time: String,
    pub notifications: Vec<String>,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "daily".to_string(),
            time: "03:00".to_string(),
            notifications: vec!["email".to_string(), "slack".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub name: String,
    pub directory: Option<PathBuf>,
    pub fallback_to_mock: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            name: "comprehensive".to_string(),
            directory: None,
            fallback_to_mock: true,
        }
    }
}

impl ValidationConfig {
    pub fn default_config() -> Self {
        Self {
            thresholds: Thresholds::default(),
            validations: VALIDATION_TYPES
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
            automation: AutomationSettings::default(),
            dataset: DatasetSettings::default(),
        }
    }

    // A missing or unreadable config file is recovered locally via the
    // built-in defaults and never surfaced as an error.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("no config file given; using built-in defaults");
            return Self::default_config();
        };

        if !path.exists() {
            warn!(path = %path.display(), "config file missing; using built-in defaults");
            return Self::default_config();
        }

        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config file unreadable; using built-in defaults");
                return Self::default_config();
            }
        };

        match serde_json::from_slice::<Self>(&raw) {
            Ok(mut config) => {
                if config.validations.is_empty() {
                    config.validations = Self::default_config().validations;
                }
                info!(path = %path.display(), "loaded validation config");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config file invalid; using built-in defaults");
                Self::default_config()
            }
        }
    }

    pub fn is_enabled(&self, validation_type: &str) -> bool {
        self.validations
            .get(validation_type)
            .copied()
            .unwrap_or(false)
    }
}
