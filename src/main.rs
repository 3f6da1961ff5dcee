use anyhow::Result;
use clap::Parser;
use monitoring_report::cli::{Cli, Commands};
use monitoring_report::commands;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MONITORING_REPORT_LOG";
const REGISTRATION_FAILED_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Compile {
            report,
            samples,
            campaign,
            asset,
            configuration,
            periodicity,
            format,
            output,
            profile,
        } => commands::compile::compile_report(commands::compile::CompileConfig {
            report,
            samples,
            campaign,
            asset,
            configuration,
            periodicity,
            format,
            output,
            profile,
            config: config.map(Into::into),
        }),
        Commands::Generate {
            report,
            asset_id,
            campaign_date,
            user_id,
            description,
            name,
            periodicity,
            profile,
        } => {
            let outcome = commands::generate::generate_report(commands::generate::GenerateConfig {
                report,
                asset_id,
                campaign_date,
                user_id,
                description,
                name,
                periodicity,
                profile,
                config: config.map(Into::into),
            })?;
            // Stored but not registered: distinct from both success and failure.
            if !outcome.is_registered() {
                std::process::exit(REGISTRATION_FAILED_EXIT_CODE);
            }
            Ok(())
        }
        Commands::Fields { report } => commands::fields::print_fields(report),
        Commands::Init { force } => commands::init::init_config(force),
    }
}

/// Logs go to stderr. `MONITORING_REPORT_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
