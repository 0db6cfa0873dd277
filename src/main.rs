//! portsweep command-line entry point.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use portsweep::cli::{Args, OutputFormat};
use portsweep::config::AppSettings;
use portsweep::error::{CliError, CliResult};
use portsweep::output;
use portsweep::scanner::ScanCoordinator;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match AppSettings::resolve(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => return fail(&CliError::from(e)),
    };

    if let Err(e) = init_tracing(&args.log_filter(&settings)) {
        output::print_warning(&format!("{:#}", e));
    }

    match run(&args, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &CliError) -> ExitCode {
    output::print_error(&err.to_string());
    ExitCode::from(err.exit_code())
}

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter '{}'", default_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}

async fn run(args: &Args, settings: &AppSettings) -> CliResult<()> {
    let plan = args.plan(settings)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing with partial results");
            ctrl_c.cancel();
        }
    });

    let mut coordinator = ScanCoordinator::new(plan.prober).with_cancellation(cancel);
    if args.progress && !args.quiet {
        coordinator = coordinator.with_progress(progress_bar());
    }

    let report = coordinator.scan(&plan.request).await?;

    output::print_report(&report, plan.output)?;
    if !args.quiet && plan.output == OutputFormat::Plain {
        output::print_summary(&report);
    }

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
