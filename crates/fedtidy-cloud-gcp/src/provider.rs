//! Google Cloud provider implementation

use crate::auth::{AccessToken, Credentials};
use crate::compute::{COMPUTE_API_BASE, ComputeClient};
use crate::dns::{DNS_API_BASE, DnsClient};
use crate::error::Result;
use async_trait::async_trait;
use fedtidy_cloud::{AuthStatus, CloudProvider, CloudResource, DnsRecordSet, Page, ResourceKind};
use std::sync::Arc;

pub const COMPUTE_ENDPOINT_ENV: &str = "FEDTIDY_COMPUTE_ENDPOINT";
pub const DNS_ENDPOINT_ENV: &str = "FEDTIDY_DNS_ENDPOINT";

/// API endpoints used by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpConfig {
    pub compute_endpoint: String,
    pub dns_endpoint: String,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            compute_endpoint: COMPUTE_API_BASE.to_string(),
            dns_endpoint: DNS_API_BASE.to_string(),
        }
    }
}

impl GcpConfig {
    /// Defaults, overridden by `FEDTIDY_COMPUTE_ENDPOINT` / `FEDTIDY_DNS_ENDPOINT`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            compute_endpoint: std::env::var(COMPUTE_ENDPOINT_ENV)
                .unwrap_or(defaults.compute_endpoint),
            dns_endpoint: std::env::var(DNS_ENDPOINT_ENV).unwrap_or(defaults.dns_endpoint),
        }
    }
}

/// Google Cloud provider
pub struct GcpProvider {
    compute: ComputeClient,
    dns: DnsClient,
    credentials: Arc<Credentials>,
}

impl GcpProvider {
    /// Acquire credentials and build the API clients
    pub async fn connect(config: GcpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fedtidy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let credentials = Credentials::acquire(client.clone()).await?;
        tracing::info!(source = %credentials.source().await, "Obtained access token");

        Ok(Self::with_credentials(client, Arc::new(credentials), config))
    }

    pub fn with_token(client: reqwest::Client, token: AccessToken, config: GcpConfig) -> Self {
        let credentials = Arc::new(Credentials::from_token(client.clone(), token));
        Self::with_credentials(client, credentials, config)
    }

    fn with_credentials(
        client: reqwest::Client,
        credentials: Arc<Credentials>,
        config: GcpConfig,
    ) -> Self {
        Self {
            compute: ComputeClient::new(client.clone(), credentials.clone(), config.compute_endpoint),
            dns: DnsClient::new(client, credentials.clone(), config.dns_endpoint),
            credentials,
        }
    }
}

#[async_trait]
impl CloudProvider for GcpProvider {
    fn name(&self) -> &str {
        "gcp"
    }

    async fn check_auth(&self) -> fedtidy_cloud::Result<AuthStatus> {
        if self.credentials.token().await.is_empty() {
            return Ok(AuthStatus::failed("empty access token"));
        }
        Ok(AuthStatus::ok(self.credentials.source().await.to_string()))
    }

    async fn list_resources(
        &self,
        project: &str,
        kind: ResourceKind,
        page_token: Option<&str>,
    ) -> fedtidy_cloud::Result<Page<CloudResource>> {
        Ok(self.compute.list_page(project, kind, page_token).await?)
    }

    async fn delete_resource(
        &self,
        project: &str,
        resource: &CloudResource,
    ) -> fedtidy_cloud::Result<()> {
        Ok(self.compute.delete(project, resource).await?)
    }

    async fn list_record_sets(
        &self,
        project: &str,
        zone: &str,
        page_token: Option<&str>,
    ) -> fedtidy_cloud::Result<Page<DnsRecordSet>> {
        Ok(self.dns.list_record_sets(project, zone, page_token).await?)
    }

    async fn delete_record_sets(
        &self,
        project: &str,
        zone: &str,
        deletions: &[DnsRecordSet],
    ) -> fedtidy_cloud::Result<()> {
        Ok(self.dns.create_change(project, zone, deletions).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialSource;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                (COMPUTE_ENDPOINT_ENV, Some("http://localhost:9000/compute/v1")),
                (DNS_ENDPOINT_ENV, None),
            ],
            || {
                let config = GcpConfig::from_env();
                assert_eq!(config.compute_endpoint, "http://localhost:9000/compute/v1");
                assert_eq!(config.dns_endpoint, DNS_API_BASE);
            },
        );
    }

    #[tokio::test]
    async fn test_check_auth() {
        let provider = GcpProvider::with_token(
            reqwest::Client::new(),
            AccessToken {
                token: "ya29.x".to_string(),
                source: CredentialSource::Environment,
            },
            GcpConfig::default(),
        );

        let status = provider.check_auth().await.unwrap();
        assert_eq!(provider.name(), "gcp");
        assert!(status.authenticated);
        assert_eq!(status.account_info.as_deref(), Some("GOOGLE_OAUTH_ACCESS_TOKEN"));
    }

    #[tokio::test]
    async fn test_dns_kind_rejected_by_compute() {
        let provider = GcpProvider::with_token(
            reqwest::Client::new(),
            AccessToken {
                token: "ya29.x".to_string(),
                source: CredentialSource::Environment,
            },
            GcpConfig::default(),
        );

        let err = provider
            .list_resources("p", ResourceKind::DnsRecordSet, None)
            .await
            .unwrap_err();
        assert!(matches!(err, fedtidy_cloud::CloudError::InvalidResource(_)));
    }
}
