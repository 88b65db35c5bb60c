//! Compute Engine API client
//!
//! Lists and deletes the load-balancer objects and disks the collector
//! handles. Deletions return as soon as the operation is accepted; the
//! operation itself is not awaited.

use crate::auth::Credentials;
use crate::error::{GcpError, Result};
use crate::http::{ListQuery, send_authorized};
use fedtidy_cloud::{CloudResource, GLOBAL_SCOPE, Page, ResourceKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const COMPUTE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Compute Engine REST client
pub struct ComputeClient {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    base_url: String,
}

impl ComputeClient {
    pub fn new(
        client: reqwest::Client,
        credentials: Arc<Credentials>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one page of `kind`
    pub async fn list_page(
        &self,
        project: &str,
        kind: ResourceKind,
        page_token: Option<&str>,
    ) -> Result<Page<CloudResource>> {
        let url = format!("{}/{}", self.base_url, list_path(project, kind)?);
        tracing::debug!(url = %url, page_token = ?page_token, "Listing {}", kind);

        let query = ListQuery::new(page_token);
        let response = send_authorized(&self.credentials, |token| {
            self.client.get(&url).bearer_auth(token).query(&query)
        })
        .await?;
        let body = response.text().await?;

        if kind.is_aggregated() {
            parse_aggregated_page(kind, &body)
        } else {
            parse_flat_page(kind, &body)
        }
    }

    /// Request deletion of a listed resource
    pub async fn delete(&self, project: &str, resource: &CloudResource) -> Result<()> {
        let url = format!("{}/{}", self.base_url, delete_path(project, resource)?);
        tracing::debug!(url = %url, "Deleting {}", resource.kind);

        send_authorized(&self.credentials, |token| {
            self.client.delete(&url).bearer_auth(token)
        })
        .await?;
        Ok(())
    }
}

/// Collection path for listing `kind`
pub fn list_path(project: &str, kind: ResourceKind) -> Result<String> {
    let path = match kind {
        ResourceKind::ForwardingRule => "aggregated/forwardingRules",
        ResourceKind::TargetPool => "aggregated/targetPools",
        ResourceKind::Disk => "aggregated/disks",
        ResourceKind::HealthCheck => "global/httpHealthChecks",
        ResourceKind::SslCertificate => "global/sslCertificates",
        ResourceKind::FirewallRule => "global/firewalls",
        ResourceKind::DnsRecordSet => {
            return Err(GcpError::UnsupportedResource(
                "dns records are not compute resources".to_string(),
            ));
        }
    };
    Ok(format!("projects/{}/{}", project, path))
}

/// Resource path for deleting `resource`, derived from its kind and scope
pub fn delete_path(project: &str, resource: &CloudResource) -> Result<String> {
    let unsupported = || {
        GcpError::UnsupportedResource(format!(
            "{} {:?} in scope {:?}",
            resource.kind, resource.name, resource.scope
        ))
    };

    let collection = match resource.kind {
        ResourceKind::ForwardingRule if resource.is_global() => {
            "global/forwardingRules".to_string()
        }
        ResourceKind::ForwardingRule => {
            let region = resource.region().ok_or_else(unsupported)?;
            format!("regions/{}/forwardingRules", region)
        }
        ResourceKind::TargetPool => {
            let region = resource.region().ok_or_else(unsupported)?;
            format!("regions/{}/targetPools", region)
        }
        ResourceKind::Disk => {
            let zone = resource.zone().ok_or_else(unsupported)?;
            format!("zones/{}/disks", zone)
        }
        ResourceKind::HealthCheck => "global/httpHealthChecks".to_string(),
        ResourceKind::SslCertificate => "global/sslCertificates".to_string(),
        ResourceKind::FirewallRule => "global/firewalls".to_string(),
        ResourceKind::DnsRecordSet => return Err(unsupported()),
    };

    Ok(format!("projects/{}/{}/{}", project, collection, resource.name))
}

/// Field holding the resources inside an aggregated scoped list
fn scoped_list_field(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::ForwardingRule => "forwardingRules",
        ResourceKind::TargetPool => "targetPools",
        ResourceKind::Disk => "disks",
        _ => "items",
    }
}

/// Flatten an aggregated list page; scopes come out in key order.
pub fn parse_aggregated_page(kind: ResourceKind, body: &str) -> Result<Page<CloudResource>> {
    let list: AggregatedList = serde_json::from_str(body)?;
    let field = scoped_list_field(kind);

    let mut items = Vec::new();
    for (scope, mut scoped) in list.items {
        let Some(values) = scoped.remove(field) else {
            continue;
        };
        let resources: Vec<ApiResource> = serde_json::from_value(values)?;
        items.extend(resources.into_iter().map(|r| r.into_resource(kind, &scope)));
    }

    Ok(Page::new(items, list.next_page_token))
}

pub fn parse_flat_page(kind: ResourceKind, body: &str) -> Result<Page<CloudResource>> {
    let list: FlatList = serde_json::from_str(body)?;
    let items = list
        .items
        .into_iter()
        .map(|r| r.into_resource(kind, GLOBAL_SCOPE))
        .collect();
    Ok(Page::new(items, list.next_page_token))
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregatedList {
    #[serde(default)]
    items: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatList {
    #[serde(default)]
    items: Vec<ApiResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResource {
    name: String,
    #[serde(default)]
    description: String,
    creation_timestamp: Option<String>,
}

impl ApiResource {
    fn into_resource(self, kind: ResourceKind, scope: &str) -> CloudResource {
        let mut resource = CloudResource::new(kind, self.name, scope).with_description(self.description);
        resource.creation_timestamp = self.creation_timestamp;
        resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_path() {
        assert_eq!(
            list_path("p", ResourceKind::ForwardingRule).unwrap(),
            "projects/p/aggregated/forwardingRules"
        );
        assert_eq!(
            list_path("p", ResourceKind::HealthCheck).unwrap(),
            "projects/p/global/httpHealthChecks"
        );
        assert!(list_path("p", ResourceKind::DnsRecordSet).is_err());
    }

    #[test]
    fn test_delete_path_by_scope() {
        let global = CloudResource::new(ResourceKind::ForwardingRule, "fr", GLOBAL_SCOPE);
        let regional = CloudResource::new(ResourceKind::ForwardingRule, "fr", "regions/us-east1");
        let pool = CloudResource::new(ResourceKind::TargetPool, "tp", "regions/us-east1");
        let disk = CloudResource::new(ResourceKind::Disk, "d-pvc-1", "zones/us-east1-b");
        let firewall = CloudResource::new(ResourceKind::FirewallRule, "k8s-fw", GLOBAL_SCOPE);

        assert_eq!(
            delete_path("p", &global).unwrap(),
            "projects/p/global/forwardingRules/fr"
        );
        assert_eq!(
            delete_path("p", &regional).unwrap(),
            "projects/p/regions/us-east1/forwardingRules/fr"
        );
        assert_eq!(
            delete_path("p", &pool).unwrap(),
            "projects/p/regions/us-east1/targetPools/tp"
        );
        assert_eq!(
            delete_path("p", &disk).unwrap(),
            "projects/p/zones/us-east1-b/disks/d-pvc-1"
        );
        assert_eq!(
            delete_path("p", &firewall).unwrap(),
            "projects/p/global/firewalls/k8s-fw"
        );
    }

    #[test]
    fn test_delete_path_rejects_bad_scope() {
        let disk = CloudResource::new(ResourceKind::Disk, "d", "regions/us-east1");
        assert!(matches!(
            delete_path("p", &disk),
            Err(GcpError::UnsupportedResource(_))
        ));
    }

    #[test]
    fn test_parse_aggregated_page() {
        let body = r#"{
            "kind": "compute#diskAggregatedList",
            "items": {
                "zones/us-central1-b": {
                    "disks": [
                        {"name": "pd-pvc-2", "creationTimestamp": "2017-05-01T10:00:00.000-07:00"}
                    ]
                },
                "zones/us-central1-a": {
                    "disks": [
                        {"name": "pd-pvc-1", "description": "", "creationTimestamp": "2017-05-01T09:00:00.000-07:00"}
                    ]
                },
                "zones/asia-east1-a": {
                    "warning": {"code": "NO_RESULTS_ON_PAGE", "message": "empty"}
                }
            },
            "nextPageToken": "abc"
        }"#;

        let page = parse_aggregated_page(ResourceKind::Disk, body).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "pd-pvc-1");
        assert_eq!(page.items[0].scope, "zones/us-central1-a");
        assert_eq!(page.items[1].scope, "zones/us-central1-b");
        assert_eq!(
            page.items[1].creation_timestamp.as_deref(),
            Some("2017-05-01T10:00:00.000-07:00")
        );
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_flat_page() {
        let body = r#"{
            "items": [
                {"name": "k8s-fw-a", "creationTimestamp": "2017-05-01T10:00:00.000-07:00"},
                {"name": "allow-ssh", "description": "ssh", "creationTimestamp": "2017-05-01T10:00:00.000-07:00"}
            ]
        }"#;

        let page = parse_flat_page(ResourceKind::FirewallRule, body).unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|r| r.is_global()));
        assert_eq!(page.items[1].description, "ssh");
        assert!(page.is_last());
    }

    #[test]
    fn test_parse_empty_list() {
        let page = parse_flat_page(ResourceKind::SslCertificate, r#"{"kind": "x"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }
}
