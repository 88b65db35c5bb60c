//! Cloud DNS API client

use crate::auth::Credentials;
use crate::error::Result;
use crate::http::{ListQuery, send_authorized};
use fedtidy_cloud::{DnsRecordSet, Page};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DNS_API_BASE: &str = "https://dns.googleapis.com/dns/v1";

/// Cloud DNS REST client
pub struct DnsClient {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    base_url: String,
}

impl DnsClient {
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

    fn zone_url(&self, project: &str, zone: &str) -> String {
        format!(
            "{}/projects/{}/managedZones/{}",
            self.base_url, project, zone
        )
    }

    /// Fetch one page of record sets in `zone`
    pub async fn list_record_sets(
        &self,
        project: &str,
        zone: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DnsRecordSet>> {
        let url = format!("{}/rrsets", self.zone_url(project, zone));
        tracing::debug!(url = %url, page_token = ?page_token, "Listing record sets");

        let query = ListQuery::new(page_token);
        let response = send_authorized(&self.credentials, |token| {
            self.client.get(&url).bearer_auth(token).query(&query)
        })
        .await?;
        let list: RecordSetList = response.json().await?;

        Ok(Page::new(list.rrsets, list.next_page_token))
    }

    /// Create one change that deletes `deletions`
    pub async fn create_change(
        &self,
        project: &str,
        zone: &str,
        deletions: &[DnsRecordSet],
    ) -> Result<()> {
        let url = format!("{}/changes", self.zone_url(project, zone));

        let change = Change::deleting(deletions);
        send_authorized(&self.credentials, |token| {
            self.client.post(&url).bearer_auth(token).json(&change)
        })
        .await?;
        Ok(())
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordSetList {
    #[serde(default)]
    rrsets: Vec<DnsRecordSet>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct Change<'a> {
    deletions: &'a [DnsRecordSet],
}

impl<'a> Change<'a> {
    fn deleting(deletions: &'a [DnsRecordSet]) -> Self {
        Self { deletions }
    }
}
