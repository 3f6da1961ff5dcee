//! Report profiles: the reference data that turns the generic compiler
//! into a surface water, groundwater or sediment report.
//!
//! The built-in profiles are TOML documents compiled into the binary and
//! parsed once per process into a [`ProfileRegistry`]. The registry is
//! immutable after construction and is shared by reference.

use super::categories::ParameterCategory;
use super::indicators::IndicatorDefinition;
use super::thresholds::ThresholdTable;
use crate::core::ColumnNames;
use crate::errors::{Entity, Error, Result, ResultExt};
use crate::report::layout;
use crate::report::ReportType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const SURFACE_WATER: &str = include_str!("../../profiles/surface_water.toml");
const GROUNDWATER: &str = include_str!("../../profiles/groundwater.toml");
const SEDIMENT: &str = include_str!("../../profiles/sediment.toml");

/// Chart styling that belongs to the report rather than to the code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Fill colors of the composition chart segments, in category order
    #[serde(default)]
    pub composition_colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    pub report: ReportType,
    pub title: String,
    /// Form type used to look up the asset's configuration
    pub form_type: String,
    /// Template identifier handed to the templating engine
    pub template: String,
    /// Storage bucket for generated documents
    pub bucket: String,
    #[serde(default)]
    pub columns: ColumnNames,
    /// Parameters used when the asset configuration does not choose any
    #[serde(default)]
    pub chosen_parameters: Vec<String>,
    #[serde(default)]
    pub categories: Vec<ParameterCategory>,
    #[serde(default)]
    pub thresholds: ThresholdTable,
    #[serde(default)]
    pub indicators: Vec<IndicatorDefinition>,
    #[serde(default)]
    pub charts: ChartSettings,
}

impl ReportProfile {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let profile: ReportProfile = toml::from_str(contents)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn category(&self, name: &str) -> Result<&ParameterCategory> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                Error::config(format!(
                    "profile {} has no category `{}`",
                    self.report.code(),
                    name
                ))
            })
    }

    /// Check that the profile provides everything its report layout uses.
    pub fn validate(&self) -> Result<()> {
        for name in layout::required_categories(self.report) {
            self.category(name)?;
        }

        for (index, color) in self.charts.composition_colors.iter().enumerate() {
            crate::charts::parse_hex_color(color).ok_or_else(|| {
                Error::config(format!(
                    "composition color #{} `{}` is not a #rrggbb value",
                    index + 1,
                    color
                ))
            })?;
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = self.categories.iter().find(|c| !seen.insert(&c.name)) {
            return Err(Error::config(format!(
                "category `{}` is defined twice",
                duplicate.name
            )));
        }

        Ok(())
    }
}

/// All report profiles available to this process.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<ReportType, ReportProfile>,
}

impl ProfileRegistry {
    /// Parse the profiles compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::default();
        for (name, contents) in [
            ("surface_water", SURFACE_WATER),
            ("groundwater", GROUNDWATER),
            ("sediment", SEDIMENT),
        ] {
            let profile = ReportProfile::from_toml(contents)
                .context(format!("built-in profile {}", name))?;
            registry.insert(profile);
        }
        debug!(count = registry.profiles.len(), "Loaded built-in report profiles");
        Ok(registry)
    }

    /// Replace the profile for its report type with one read from disk.
    pub fn load_override(&mut self, path: &Path) -> Result<ReportType> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system("Failed to read profile", path, e))?;
        let profile = ReportProfile::from_toml(&contents)
            .context(format!("profile {}", path.display()))?;
        let report = profile.report;
        debug!(report = report.code(), path = %path.display(), "Loaded profile override");
        self.insert(profile);
        Ok(report)
    }

    pub fn insert(&mut self, profile: ReportProfile) {
        self.profiles.insert(profile.report, profile);
    }

    pub fn get(&self, report: ReportType) -> Result<&ReportProfile> {
        self.profiles
            .get(&report)
            .ok_or_else(|| Error::not_found(Entity::Profile, report.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limit;

    #[test]
    fn builtin_profiles_parse_and_validate() {
        let registry = ProfileRegistry::builtin().unwrap();
        for report in ReportType::ALL {
            let profile = registry.get(report).unwrap();
            assert_eq!(profile.report, report);
            assert!(!profile.indicators.is_empty());
        }
    }

    #[test]
    fn sediment_profile_carries_composition_colors() {
        let registry = ProfileRegistry::builtin().unwrap();
        let profile = registry.get(ReportType::Sediment).unwrap();
        let fractions = profile.category("granulometria").unwrap();
        assert_eq!(fractions.len(), profile.charts.composition_colors.len());
    }

    #[test]
    fn surface_water_thresholds_are_numeric_where_expected() {
        let registry = ProfileRegistry::builtin().unwrap();
        let profile = registry.get(ReportType::SurfaceWater).unwrap();
        assert_eq!(
            profile.thresholds.limit("Classe 2", "Cromo total (mg/L Cr)"),
            Limit::Value(0.05)
        );
    }

    #[test]
    fn missing_layout_category_is_rejected() {
        let err = ReportProfile::from_toml(
            r#"
            report = "qsd"
            title = "t"
            form_type = "f"
            template = "t"
            bucket = "b"
            "#,
        )
        .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn bad_composition_color_is_rejected() {
        let registry = ProfileRegistry::builtin().unwrap();
        let mut profile = registry.get(ReportType::Sediment).unwrap().clone();
        profile.charts.composition_colors[0] = "blue".to_string();
        assert!(profile.validate().is_err());
    }
}
