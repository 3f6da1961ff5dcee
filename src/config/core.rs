use super::labels::DisplayLabels;
use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.monitoring-report.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Report-wide settings
    #[serde(default)]
    pub report: ReportSettings,

    /// Display vocabulary used in cells and captions
    #[serde(default)]
    pub labels: DisplayLabels,

    /// Where generated documents are stored
    #[serde(default)]
    pub storage: StorageSettings,

    /// Audit registry configuration
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Filesystem data source configuration
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSettings {
    /// City printed in the report's place-and-date line
    #[serde(default = "default_city")]
    pub city: String,

    /// Offset from UTC, in hours, for generation dates and object keys
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            city: default_city(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl ReportSettings {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            Error::config(format!(
                "utc_offset_hours {} is out of range",
                self.utc_offset_hours
            ))
        })
    }
}

fn default_city() -> String {
    "Florianópolis".to_string()
}

fn default_utc_offset_hours() -> i32 {
    -3
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Directory that receives uploaded documents
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Base of the public URL returned for stored documents
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("reports")
}

fn default_public_base_url() -> String {
    "file://reports".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrySettings {
    /// JSON-lines file that records every generated report
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("reports/registry.jsonl")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSettings {
    /// Root of the `assets/`, `configurations/` and `campaigns/` trees
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            root: default_data_root(),
        }
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}
