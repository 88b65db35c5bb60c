//! Sweep and project outcome types

use crate::error::SweepError;
use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

/// Counters for one completed sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub kind: ResourceKind,

    /// Resources accepted by the classifier
    pub candidates_found: usize,

    /// Candidates that were obsolete and deleted
    pub deleted: usize,

    /// Failed deletions. A failed deletion aborts the sweep, so a returned
    /// result always has zero here.
    pub failed: usize,
}

impl SweepResult {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            candidates_found: 0,
            deleted: 0,
            failed: 0,
        }
    }

    /// Candidates left in place because they were not yet obsolete
    pub fn retained(&self) -> usize {
        self.candidates_found - self.deleted - self.failed
    }
}

/// Outcome of every sweep run for one project
#[derive(Debug)]
pub struct ProjectReport {
    pub project: String,
    pub outcomes: Vec<(ResourceKind, Result<SweepResult, SweepError>)>,
}

impl ProjectReport {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: ResourceKind, outcome: Result<SweepResult, SweepError>) {
        self.outcomes.push((kind, outcome));
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&Result<SweepResult, SweepError>> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    /// Resources deleted across all completed sweeps
    pub fn deleted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
            .map(|result| result.deleted)
            .sum()
    }

    pub fn failed_sweeps(&self) -> Vec<ResourceKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_ok())
    }
}

/// Totals across all projects of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub projects: usize,
    pub deleted: usize,
    pub failed_sweeps: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[ProjectReport]) -> Self {
        Self {
            projects: reports.len(),
            deleted: reports.iter().map(ProjectReport::deleted).sum(),
            failed_sweeps: reports.iter().map(|r| r.failed_sweeps().len()).sum(),
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} projects swept, {} resources deleted, {} sweeps failed",
            self.projects, self.deleted, self.failed_sweeps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;

    fn completed(kind: ResourceKind, candidates: usize, deleted: usize) -> SweepResult {
        SweepResult {
            kind,
            candidates_found: candidates,
            deleted,
            failed: 0,
        }
    }

    #[test]
    fn test_project_report_totals() {
        let mut report = ProjectReport::new("fed-e2e");
        report.record(
            ResourceKind::ForwardingRule,
            Ok(completed(ResourceKind::ForwardingRule, 4, 3)),
        );
        report.record(
            ResourceKind::TargetPool,
            Err(SweepError::Pagination {
                kind: ResourceKind::TargetPool,
                source: CloudError::ApiError("quota".to_string()),
            }),
        );
        report.record(ResourceKind::Disk, Ok(completed(ResourceKind::Disk, 2, 2)));

        assert_eq!(report.deleted(), 5);
        assert_eq!(report.failed_sweeps(), vec![ResourceKind::TargetPool]);
        assert!(!report.is_success());
        assert_eq!(
            report.get(ResourceKind::ForwardingRule).unwrap().as_ref().unwrap().retained(),
            1
        );
    }

    #[test]
    fn test_run_summary_display() {
        let mut a = ProjectReport::new("a");
        a.record(ResourceKind::Disk, Ok(completed(ResourceKind::Disk, 1, 1)));
        let b = ProjectReport::new("b");

        let summary = RunSummary::from_reports(&[a, b]);
        assert_eq!(
            summary.to_string(),
            "2 projects swept, 1 resources deleted, 0 sweeps failed"
        );
    }
}
