//! Cloud provider trait definition

use crate::error::Result;
use crate::resource::{CloudResource, DnsRecordSet, Page, ResourceKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cloud provider abstraction trait
///
/// The engine lists, filters and deletes through this trait only. Retries and
/// timeouts, if any, belong to the implementation.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Returns the provider name (e.g., "gcp")
    fn name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Fetch one page of `kind` in `project`.
    ///
    /// Aggregated kinds are flattened; each resource's `scope` holds the
    /// aggregation key it was listed under.
    async fn list_resources(
        &self,
        project: &str,
        kind: ResourceKind,
        page_token: Option<&str>,
    ) -> Result<Page<CloudResource>>;

    /// Delete a single resource previously returned by `list_resources`
    async fn delete_resource(&self, project: &str, resource: &CloudResource) -> Result<()>;

    /// Fetch one page of record sets in a managed zone
    async fn list_record_sets(
        &self,
        project: &str,
        zone: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DnsRecordSet>>;

    /// Submit one change request deleting `deletions` atomically
    async fn delete_record_sets(
        &self,
        project: &str,
        zone: &str,
        deletions: &[DnsRecordSet],
    ) -> Result<()>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/credential source if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}
