use crate::config::{load_config, ProfileRegistry};
use crate::core::SampleSet;
use crate::io::{self, Clock, OutputFormat, SystemClock};
use crate::report::{
    compile, AssetRecord, CampaignRecord, CompileInputs, FormConfiguration, ReportType,
};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CompileConfig {
    pub report: ReportType,
    pub samples: PathBuf,
    pub campaign: Option<PathBuf>,
    pub asset: Option<PathBuf>,
    pub configuration: Option<PathBuf>,
    pub periodicity: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub profile: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn compile_report(config: CompileConfig) -> Result<()> {
    let app = load_config(config.config.as_deref());
    let profiles = load_profiles(config.report, config.profile.as_deref())?;
    let profile = profiles.get(config.report)?;

    let (rows, embedded_campaign) = read_samples(&config.samples)?;
    let campaign = match &config.campaign {
        Some(path) => Some(read_json::<CampaignRecord>(path)?),
        None => embedded_campaign,
    };
    let asset = config
        .asset
        .as_deref()
        .map(read_json::<AssetRecord>)
        .transpose()?;
    let configuration = config
        .configuration
        .as_deref()
        .map(read_json::<FormConfiguration>)
        .transpose()?;

    let samples = SampleSet::from_json_rows(&rows, &profile.columns, &app.labels.unavailable)?;
    let generated_at = SystemClock.now().with_timezone(&app.report.offset()?);

    let context = compile(&CompileInputs {
        profile,
        samples: &samples,
        labels: &app.labels,
        settings: &app.report,
        generated_at,
        asset: asset.as_ref(),
        configuration: configuration.as_ref(),
        campaign: campaign.as_ref(),
        periodicity: config.periodicity.as_deref(),
    })?;

    match config.output {
        Some(path) => {
            let mut buffer = Vec::new();
            io::create_writer(config.format, &mut buffer).write_context(&context)?;
            let text = String::from_utf8(buffer).context("Report output is not valid UTF-8")?;
            io::write_file(&path, &text)?;
            eprintln!("Wrote {} context to {}", config.report, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            io::create_writer(config.format, stdout.lock()).write_context(&context)?;
        }
    }
    Ok(())
}

/// Built-in profiles, with the given report's profile replaced from disk.
pub fn load_profiles(report: ReportType, profile: Option<&Path>) -> Result<ProfileRegistry> {
    let mut profiles = ProfileRegistry::builtin()?;
    if let Some(path) = profile {
        let overridden = profiles.load_override(path)?;
        if overridden != report {
            anyhow::bail!(
                "Profile {} is for report type {}, not {}",
                path.display(),
                overridden,
                report
            );
        }
    }
    Ok(profiles)
}

/// A samples file is either a bare array of rows or a whole campaign
/// record, whose metadata is then used too.
fn read_samples(path: &Path) -> Result<(Vec<Value>, Option<CampaignRecord>)> {
    match read_json::<Value>(path)? {
        Value::Array(rows) => Ok((rows, None)),
        value @ Value::Object(_) => {
            let campaign: CampaignRecord = serde_json::from_value(value)
                .with_context(|| format!("{} is not a campaign record", path.display()))?;
            Ok((campaign.results.clone(), Some(campaign)))
        }
        _ => anyhow::bail!(
            "{} must hold an array of sample rows or a campaign record",
            path.display()
        ),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
