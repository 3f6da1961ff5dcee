use super::compile::load_profiles;
use crate::config::{load_config, AppConfig};
use crate::io::{DirectoryStorage, FsDataSource, JsonBundleRenderer, JsonLinesRegistry, SystemClock};
use crate::report::ReportType;
use crate::service::{Collaborators, GenerationOutcome, GenerationRequest, ReportService};
use anyhow::Result;
use chrono::NaiveDate;
use colored::*;
use std::path::PathBuf;

pub struct GenerateConfig {
    pub report: ReportType,
    pub asset_id: String,
    pub campaign_date: NaiveDate,
    pub user_id: String,
    pub description: String,
    pub name: Option<String>,
    pub periodicity: Option<String>,
    pub profile: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Filesystem-backed collaborators, built once per process.
pub struct FsCollaborators {
    pub data: FsDataSource,
    pub storage: DirectoryStorage,
    pub registry: JsonLinesRegistry,
    pub renderer: JsonBundleRenderer,
    pub clock: SystemClock,
}

impl FsCollaborators {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            data: FsDataSource::new(&config.data.root),
            storage: DirectoryStorage::new(&config.storage.root, &config.storage.public_base_url),
            registry: JsonLinesRegistry::new(&config.registry.path),
            renderer: JsonBundleRenderer,
            clock: SystemClock,
        }
    }

    pub fn as_collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            assets: &self.data,
            configurations: &self.data,
            samples: &self.data,
            renderer: &self.renderer,
            storage: &self.storage,
            registry: &self.registry,
            clock: &self.clock,
        }
    }
}

/// Runs the workflow and prints its outcome. A registry failure is not an
/// error here; callers inspect [`GenerationOutcome::is_registered`].
pub fn generate_report(config: GenerateConfig) -> Result<GenerationOutcome> {
    let app = load_config(config.config.as_deref());
    let profiles = load_profiles(config.report, config.profile.as_deref())?;
    let collaborators = FsCollaborators::from_config(&app);
    let service = ReportService::new(
        &profiles,
        &app.labels,
        &app.report,
        collaborators.as_collaborators(),
    );

    let outcome = service.generate(&GenerationRequest {
        report: config.report,
        asset_id: config.asset_id,
        campaign_date: config.campaign_date,
        user_id: config.user_id,
        name: config.name,
        description: config.description,
        periodicity: config.periodicity,
    })?;

    print_outcome(&outcome);
    Ok(outcome)
}

fn print_outcome(outcome: &GenerationOutcome) {
    if outcome.is_registered() {
        println!("{}", outcome.message().green());
    } else {
        println!("{}", outcome.message().yellow());
    }
    println!("  {} {}", "Report:".bold(), outcome.report);
    println!("  {} {}", "Key:".bold(), outcome.object_key);
    println!("  {} {}", "URL:".bold(), outcome.url);
    if !outcome.missing_fields.is_empty() {
        let names: Vec<String> = outcome.missing_fields.iter().map(ToString::to_string).collect();
        println!(
            "  {} {}",
            format!("{} fields not set:", names.len()).dimmed(),
            names.join(", ")
        );
    }
}
