mod logging;

use clap::Parser;
use fedtidy_cloud::{AgePolicy, CloudProvider, Coordinator};
use fedtidy_cloud_gcp::{GcpConfig, GcpProvider};
use logging::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fedtidy")]
#[command(version, about = "Deletes stale cloud objects left behind by federation e2e runs", long_about = None)]
struct Cli {
    /// path to the JSON file containing the project DNS Zone name map
    #[arg(short = 'c', long = "config", env = "FEDTIDY_CONFIG")]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let projects = fedtidy_config::load_projects(&cli.config).inspect_err(|e| {
        tracing::error!(config_file = %cli.config.display(), error = %e, "Unable to load the config");
    })?;

    let provider = GcpProvider::connect(GcpConfig::from_env())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to create default client"))?;

    let auth = provider.check_auth().await?;
    if !auth.authenticated {
        let reason = auth.error.unwrap_or_else(|| "unknown".to_string());
        tracing::error!(error = %reason, "failed to create default client");
        anyhow::bail!("authentication failed: {}", reason);
    }
    tracing::info!(
        provider = provider.name(),
        credentials = auth.account_info.as_deref().unwrap_or("unknown"),
        "Authenticated"
    );

    let coordinator = Coordinator::new(Arc::new(provider), AgePolicy::default());
    let reports = coordinator.run(projects).await;

    for report in reports.iter().filter(|r| !r.is_success()) {
        let failed: Vec<String> = report.failed_sweeps().iter().map(|k| k.to_string()).collect();
        tracing::warn!(project = %report.project, failed = %failed.join(", "), "Some sweeps failed");
    }

    Ok(())
}

