use crate::io::OutputFormat;
use crate::report::ReportType;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "monitoring-report")]
#[command(about = "Environmental monitoring report compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to searching for .monitoring-report.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a report context from local JSON files
    Compile {
        /// Report type
        #[arg(long, value_enum)]
        report: ReportType,

        /// Sample rows: a JSON array of row objects, or a campaign record
        #[arg(long)]
        samples: PathBuf,

        /// Campaign record (lab identity, photos, technical reports)
        #[arg(long)]
        campaign: Option<PathBuf>,

        /// Asset record
        #[arg(long)]
        asset: Option<PathBuf>,

        /// Form configuration record
        #[arg(long)]
        configuration: Option<PathBuf>,

        /// Periodicity printed in the report
        #[arg(long)]
        periodicity: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the built-in profile for this report type
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Generate, store and register a report from the data directory
    Generate {
        /// Report type
        #[arg(long, value_enum)]
        report: ReportType,

        /// Monitored asset identifier
        #[arg(long = "asset-id")]
        asset_id: String,

        /// Campaign date (YYYY-MM-DD)
        #[arg(long = "campaign-date")]
        campaign_date: NaiveDate,

        /// User requesting the report
        #[arg(long = "user-id")]
        user_id: String,

        /// Description stored in the registry
        #[arg(long)]
        description: String,

        /// Report name stored in the registry (defaults to the profile title)
        #[arg(long)]
        name: Option<String>,

        /// Periodicity printed in the report
        #[arg(long)]
        periodicity: Option<String>,

        /// Replace the built-in profile for this report type
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Print the template field vocabulary of a report type
    Fields {
        /// Report type
        #[arg(long, value_enum)]
        report: ReportType,
    },

    /// Initialize a new .monitoring-report.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
