//! Configuration: application settings and report reference data.

mod categories;
mod core;
mod indicators;
mod labels;
mod loader;
pub mod profile;
mod thresholds;

pub use categories::ParameterCategory;
pub use core::{AppConfig, DataSettings, RegistrySettings, ReportSettings, StorageSettings};
pub use indicators::IndicatorDefinition;
pub use labels::DisplayLabels;
pub use loader::{
    config_candidates, directory_ancestors, load_config, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use profile::{ChartSettings, ProfileRegistry, ReportProfile};
pub use thresholds::{Limit, ThresholdEntry, ThresholdTable};
