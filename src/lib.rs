// Export modules for library usage
pub mod charts;
pub mod cli;
pub mod commands;
pub mod compliance;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod report;
pub mod scorecard;
pub mod service;
pub mod tables;

// Re-export commonly used types
pub use crate::core::{ColumnNames, RawValue, SampleRecord, SampleSet, Stratum};

pub use crate::compliance::{
    evaluate, evaluate_category, ComplianceEvaluation, ComplianceRecord, ComplianceSummary,
    UnknownReason, Verdict,
};

pub use crate::config::{
    load_config, AppConfig, DisplayLabels, ParameterCategory, ProfileRegistry, ReportProfile,
    ThresholdTable,
};

pub use crate::errors::{Error, Result};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::report::{compile, CompileInputs, ContextValue, FieldId, ReportContext, ReportType};

pub use crate::service::{
    Collaborators, GenerationOutcome, GenerationRequest, Registration, ReportService,
};

pub use crate::tables::{Cell, Column, PresentationTable};
