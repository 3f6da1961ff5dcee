//! Report types, their template field vocabularies and the context
//! assembler that fills them.

pub mod assembler;
pub mod context;
pub mod fields;
pub mod layout;

pub use assembler::{compile, AssetRecord, CampaignRecord, CompileInputs, FormConfiguration};
pub use context::{ContextValue, ReportContext};
pub use fields::{vocabulary, FieldId, FIELD_VOCABULARY_VERSION};
pub use layout::{layout_for, LayoutEntry, ParameterScope, Section};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three monitoring reports. All share one compiler and differ only in
/// their profile and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ReportType {
    /// Surface water quality
    #[serde(rename = "qag")]
    #[value(name = "qag")]
    SurfaceWater,
    /// Groundwater quality
    #[serde(rename = "qags")]
    #[value(name = "qags")]
    Groundwater,
    /// Sediment quality
    #[serde(rename = "qsd")]
    #[value(name = "qsd")]
    Sediment,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [
        ReportType::SurfaceWater,
        ReportType::Groundwater,
        ReportType::Sediment,
    ];

    /// Short code used in object keys, the registry and the CLI.
    pub fn code(self) -> &'static str {
        match self {
            ReportType::SurfaceWater => "qag",
            ReportType::Groundwater => "qags",
            ReportType::Sediment => "qsd",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_serde() {
        for report in ReportType::ALL {
            let json = serde_json::to_string(&report).unwrap();
            assert_eq!(json, format!("\"{}\"", report.code()));
            let back: ReportType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, report);
        }
    }
}
