//! Paginated list, filter and delete
//!
//! A sweep walks every page of one resource kind in one project, deletes the
//! candidates that are obsolete, and stops at the first error. Nothing is
//! carried between sweeps.

use crate::age::AgePolicy;
use crate::batch::BatchDeleter;
use crate::classify::{Classifier, classifier_for};
use crate::error::SweepError;
use crate::provider::CloudProvider;
use crate::report::SweepResult;
use crate::resource::{CloudResource, DnsRecordSet, ResourceKind};

/// Runs sweeps for a single project
pub struct Sweeper<'a> {
    provider: &'a dyn CloudProvider,
    project: &'a str,
    policy: &'a AgePolicy,
}

impl<'a> Sweeper<'a> {
    pub fn new(provider: &'a dyn CloudProvider, project: &'a str, policy: &'a AgePolicy) -> Self {
        Self {
            provider,
            project,
            policy,
        }
    }

    /// Sweep `kind` with its standard classifier
    pub async fn sweep(&self, kind: ResourceKind) -> Result<SweepResult, SweepError> {
        self.sweep_with(kind, classifier_for(kind)).await
    }

    /// Sweep a compute resource kind with an explicit classifier
    pub async fn sweep_with(
        &self,
        kind: ResourceKind,
        classifier: Classifier,
    ) -> Result<SweepResult, SweepError> {
        let mut result = SweepResult::new(kind);
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .provider
                .list_resources(self.project, kind, page_token.as_deref())
                .await
                .map_err(|source| SweepError::Pagination { kind, source })?;

            self.process_page(kind, &page.items, classifier, &mut result)
                .await?;

            if page.is_last() {
                break;
            }
            page_token = page.next_page_token;
        }

        tracing::info!(
            count = result.deleted,
            project = %self.project,
            kind = %kind,
            "Resources deleted"
        );
        Ok(result)
    }

    async fn process_page(
        &self,
        kind: ResourceKind,
        items: &[CloudResource],
        classifier: Classifier,
        result: &mut SweepResult,
    ) -> Result<(), SweepError> {
        if !kind.is_aggregated() {
            tracing::info!(project = %self.project, kind = %kind, "Deleting resources");
        }

        let mut current_scope: Option<&str> = None;
        for resource in items {
            if kind.is_aggregated() && current_scope != Some(resource.scope.as_str()) {
                current_scope = Some(resource.scope.as_str());
                tracing::info!(
                    project = %self.project,
                    scope = %resource.scope,
                    kind = %kind,
                    "Deleting resources"
                );
            }

            if !classifier(resource) {
                continue;
            }
            result.candidates_found += 1;

            if !self.is_obsolete(resource)? {
                continue;
            }

            self.provider
                .delete_resource(self.project, resource)
                .await
                .map_err(|source| SweepError::Deletion {
                    kind,
                    name: resource.name.clone(),
                    source,
                })?;
            result.deleted += 1;

            tracing::debug!(
                project = %self.project,
                scope = %resource.scope,
                name = %resource.name,
                "Deleted {}",
                kind
            );
        }

        Ok(())
    }

    /// A missing timestamp is treated as unparsable.
    fn is_obsolete(&self, resource: &CloudResource) -> Result<bool, SweepError> {
        let timestamp = resource.creation_timestamp.as_deref().unwrap_or_default();
        self.policy
            .is_obsolete(timestamp)
            .map_err(|source| SweepError::Parse {
                name: resource.name.clone(),
                timestamp: timestamp.to_string(),
                source,
            })
    }

    /// Sweep CNAME record sets in a managed zone.
    ///
    /// Record sets carry no creation time, so the classifier alone approves
    /// them. Approved sets from every page are deleted in batches once the
    /// listing is exhausted.
    pub async fn sweep_record_sets(&self, zone: &str) -> Result<SweepResult, SweepError> {
        self.sweep_record_sets_with(BatchDeleter::new(self.provider, self.project, zone), zone)
            .await
    }

    pub async fn sweep_record_sets_with(
        &self,
        deleter: BatchDeleter<'_>,
        zone: &str,
    ) -> Result<SweepResult, SweepError> {
        let kind = ResourceKind::DnsRecordSet;
        let classifier = classifier_for(kind);
        let mut result = SweepResult::new(kind);
        let mut approved: Vec<DnsRecordSet> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .provider
                .list_record_sets(self.project, zone, page_token.as_deref())
                .await
                .map_err(|source| SweepError::Pagination { kind, source })?;

            approved.extend(
                page.items
                    .into_iter()
                    .filter(|rrset| classifier(&rrset.as_resource(zone))),
            );

            if page.next_page_token.as_deref().is_none_or(str::is_empty) {
                break;
            }
            page_token = page.next_page_token;
        }

        result.candidates_found = approved.len();
        result.deleted = deleter.delete_all(&approved).await?;

        tracing::info!(
            count = result.deleted,
            project = %self.project,
            dns_zone = %zone,
            kind = %kind,
            "Resources deleted"
        );
        Ok(result)
    }
}
