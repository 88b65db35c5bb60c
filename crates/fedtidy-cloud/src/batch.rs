//! Batched DNS record set deletion
//!
//! Cloud DNS only accepts bounded change requests, so approved deletions are
//! split into consecutive chunks and submitted one change per chunk.

use crate::error::SweepError;
use crate::provider::CloudProvider;
use crate::resource::DnsRecordSet;
use std::ops::Range;

/// Largest number of deletions submitted in one change request
pub const DNS_BATCH_SIZE: usize = 500;

/// Consecutive index ranges of at most `size` covering `0..len`
pub fn batch_ranges(len: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

/// Submits record set deletions for one managed zone
pub struct BatchDeleter<'a> {
    provider: &'a dyn CloudProvider,
    project: &'a str,
    zone: &'a str,
    batch_size: usize,
}

impl<'a> BatchDeleter<'a> {
    pub fn new(provider: &'a dyn CloudProvider, project: &'a str, zone: &'a str) -> Self {
        Self {
            provider,
            project,
            zone,
            batch_size: DNS_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Delete `records` in order, one change request per batch.
    ///
    /// Stops at the first rejected batch; later batches are not submitted.
    /// Returns the number of record sets deleted.
    pub async fn delete_all(&self, records: &[DnsRecordSet]) -> Result<usize, SweepError> {
        let total = records.len();
        let mut deleted = 0;

        for range in batch_ranges(total, self.batch_size) {
            tracing::info!(
                start = range.start,
                end = range.end,
                project = %self.project,
                total,
                "CNAME batch"
            );

            self.provider
                .delete_record_sets(self.project, self.zone, &records[range.clone()])
                .await
                .map_err(|source| SweepError::BatchDeletion {
                    start: range.start,
                    end: range.end,
                    total,
                    source,
                })?;

            deleted += range.len();
            tracing::info!(count = range.len(), project = %self.project, "Deleted");
        }

        Ok(deleted)
    }
}
