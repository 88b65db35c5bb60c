//! Per-project sweep sequence

use crate::age::AgePolicy;
use crate::error::SweepError;
use crate::provider::CloudProvider;
use crate::report::{ProjectReport, SweepResult};
use crate::resource::ResourceKind;
use crate::sweep::Sweeper;
use fedtidy_config::ProjectConfig;
use std::sync::Arc;

/// Runs every sweep for one project, one after another.
///
/// A failed sweep is logged and recorded; the next sweep still runs.
pub struct ProjectRunner {
    config: ProjectConfig,
    provider: Arc<dyn CloudProvider>,
    policy: AgePolicy,
}

impl ProjectRunner {
    pub fn new(config: ProjectConfig, provider: Arc<dyn CloudProvider>, policy: AgePolicy) -> Self {
        Self {
            config,
            provider,
            policy,
        }
    }

    pub async fn run(&self) -> ProjectReport {
        let project = self.config.project.as_str();
        let sweeper = Sweeper::new(self.provider.as_ref(), project, &self.policy);
        let mut report = ProjectReport::new(project);

        for kind in ResourceKind::SWEEP_ORDER {
            let outcome = match kind {
                ResourceKind::DnsRecordSet => {
                    if !self.config.has_dns_zone() {
                        tracing::info!(project = %project, "No dns zone configured, skipping dns records");
                        continue;
                    }
                    sweeper.sweep_record_sets(&self.config.dns_zone).await
                }
                _ => sweeper.sweep(kind).await,
            };
            self.log_outcome(kind, &outcome);
            report.record(kind, outcome);
        }

        tracing::info!(project = %project, "Done");
        report
    }

    fn log_outcome(&self, kind: ResourceKind, outcome: &Result<SweepResult, SweepError>) {
        if let Err(e) = outcome {
            tracing::error!(
                error = %e,
                project = %self.config.project,
                dns_zone = %self.config.dns_zone,
                kind = %kind,
                "failed to process {} list",
                kind
            );
        }
    }
}
