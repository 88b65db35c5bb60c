//! Concurrent fan-out over configured projects

use crate::age::AgePolicy;
use crate::provider::CloudProvider;
use crate::report::{ProjectReport, RunSummary};
use crate::runner::ProjectRunner;
use fedtidy_config::ProjectConfig;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Starts one task per project and waits for all of them.
///
/// Tasks share nothing mutable; each gets its own handle to the provider.
pub struct Coordinator {
    provider: Arc<dyn CloudProvider>,
    policy: AgePolicy,
}

impl Coordinator {
    pub fn new(provider: Arc<dyn CloudProvider>, policy: AgePolicy) -> Self {
        Self { provider, policy }
    }

    /// Sweep every project concurrently.
    ///
    /// Reports come back in completion order. A project task that panics is
    /// logged and has no report.
    pub async fn run(&self, projects: Vec<ProjectConfig>) -> Vec<ProjectReport> {
        tracing::info!(
            provider = self.provider.name(),
            projects = projects.len(),
            "Sweeping projects"
        );

        let mut tasks = JoinSet::new();
        for config in projects {
            let runner = ProjectRunner::new(config, Arc::clone(&self.provider), self.policy.clone());
            tasks.spawn(async move { runner.run().await });
        }

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!(error = %e, "project task did not complete"),
            }
        }

        let summary = RunSummary::from_reports(&reports);
        tracing::info!(
            projects = summary.projects,
            deleted = summary.deleted,
            failed_sweeps = summary.failed_sweeps,
            "{}",
            summary
        );
        reports
    }
}
