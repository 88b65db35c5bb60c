//! Uniform view over the listed cloud resources

use serde::{Deserialize, Serialize};

/// Scope key for resources that are not regional or zonal.
pub const GLOBAL_SCOPE: &str = "global";

pub const REGION_PREFIX: &str = "regions/";
pub const ZONE_PREFIX: &str = "zones/";

/// Resource kinds handled by the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ForwardingRule,
    TargetPool,
    HealthCheck,
    SslCertificate,
    FirewallRule,
    Disk,
    DnsRecordSet,
}

impl ResourceKind {
    /// Every kind, in the order a project is swept.
    pub const SWEEP_ORDER: [ResourceKind; 7] = [
        ResourceKind::ForwardingRule,
        ResourceKind::TargetPool,
        ResourceKind::HealthCheck,
        ResourceKind::SslCertificate,
        ResourceKind::FirewallRule,
        ResourceKind::DnsRecordSet,
        ResourceKind::Disk,
    ];

    /// Whether the listing API returns this kind keyed by region/zone.
    pub fn is_aggregated(&self) -> bool {
        matches!(
            self,
            ResourceKind::ForwardingRule | ResourceKind::TargetPool | ResourceKind::Disk
        )
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::ForwardingRule => write!(f, "forwarding rules"),
            ResourceKind::TargetPool => write!(f, "target pools"),
            ResourceKind::HealthCheck => write!(f, "http health checks"),
            ResourceKind::SslCertificate => write!(f, "SSL certificates"),
            ResourceKind::FirewallRule => write!(f, "firewall rules"),
            ResourceKind::Disk => write!(f, "disks"),
            ResourceKind::DnsRecordSet => write!(f, "dns records"),
        }
    }
}

/// A listed resource of any kind.
///
/// Only read by the engine; deletion is requested through the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudResource {
    pub kind: ResourceKind,

    pub name: String,

    /// `global`, `regions/<region>` or `zones/<zone>`
    pub scope: String,

    /// Free-text annotation; the orchestrator stores a JSON fingerprint here
    #[serde(default)]
    pub description: String,

    /// RFC3339 creation time, absent for DNS record sets
    pub creation_timestamp: Option<String>,

    /// DNS record type (`A`, `CNAME`, ...), only set for DNS record sets
    pub record_type: Option<String>,
}

impl CloudResource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            scope: scope.into(),
            description: String::new(),
            creation_timestamp: None,
            record_type: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_creation_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.creation_timestamp = Some(timestamp.into());
        self
    }

    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn is_global(&self) -> bool {
        self.scope == GLOBAL_SCOPE
    }

    /// Region name for `regions/<region>` scopes
    pub fn region(&self) -> Option<&str> {
        self.scope.strip_prefix(REGION_PREFIX)
    }

    /// Zone name for `zones/<zone>` scopes
    pub fn zone(&self) -> Option<&str> {
        self.scope.strip_prefix(ZONE_PREFIX)
    }
}

/// A Cloud DNS resource record set as it is listed and deleted.
///
/// A deletion must echo the record set exactly, so fields the collector does
/// not read are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSet {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrdatas: Vec<String>,

    /// `kind`, `signatureRrdatas`, `routingPolicy`, ...
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DnsRecordSet {
    pub fn new(name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl: Some(300),
            rrdatas: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Classifier view of this record set within `zone`
    pub fn as_resource(&self, zone: &str) -> CloudResource {
        CloudResource::new(ResourceKind::DnsRecordSet, &self.name, zone)
            .with_record_type(&self.record_type)
    }
}

/// One page of a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Cursor for the next page; `None` on the last page
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn is_last(&self) -> bool {
        self.next_page_token.as_deref().is_none_or(str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_helpers() {
        let regional = CloudResource::new(ResourceKind::TargetPool, "tp", "regions/us-central1");
        assert_eq!(regional.region(), Some("us-central1"));
        assert_eq!(regional.zone(), None);
        assert!(!regional.is_global());

        let zonal = CloudResource::new(ResourceKind::Disk, "d", "zones/us-central1-a");
        assert_eq!(zonal.zone(), Some("us-central1-a"));

        let global = CloudResource::new(ResourceKind::FirewallRule, "fw", GLOBAL_SCOPE);
        assert!(global.is_global());
    }

    #[test]
    fn test_page_is_last() {
        assert!(Page::<u8>::last(vec![]).is_last());
        assert!(Page::<u8>::new(vec![], Some(String::new())).is_last());
        assert!(!Page::<u8>::new(vec![], Some("next".to_string())).is_last());
    }

    #[test]
    fn test_dns_record_set_serde() {
        let json = r#"{"name":"a.example.com.","type":"CNAME","ttl":60,"rrdatas":["b.example.com."],"kind":"dns#resourceRecordSet"}"#;
        let rrset: DnsRecordSet = serde_json::from_str(json).unwrap();
        assert_eq!(rrset.record_type, "CNAME");
        assert_eq!(rrset.ttl, Some(60));
        assert_eq!(rrset.rrdatas, vec!["b.example.com."]);

        let value = serde_json::to_value(&rrset).unwrap();
        assert_eq!(value["type"], "CNAME");
    }

    /// Fields the collector never reads survive into the deletion payload
    #[test]
    fn test_dns_record_set_echoes_listed_json() {
        let listed = serde_json::json!({
            "kind": "dns#resourceRecordSet",
            "name": "svc.fed.example.com.",
            "type": "CNAME",
            "ttl": 300,
            "rrdatas": ["lb.example.com."],
            "signatureRrdatas": ["CNAME 8 4 300 20170701000000 20170601000000 1234 fed.example.com. c2ln"],
            "routingPolicy": {
                "wrr": {"items": [{"weight": 1.0, "rrdatas": ["lb.example.com."]}]}
            }
        });

        let rrset: DnsRecordSet = serde_json::from_value(listed.clone()).unwrap();
        assert!(rrset.extra.contains_key("routingPolicy"));

        assert_eq!(serde_json::to_value(&rrset).unwrap(), listed);
    }

    #[test]
    fn test_sweep_order() {
        assert_eq!(ResourceKind::SWEEP_ORDER[0], ResourceKind::ForwardingRule);
        assert_eq!(ResourceKind::SWEEP_ORDER[5], ResourceKind::DnsRecordSet);
        assert_eq!(ResourceKind::SWEEP_ORDER[6], ResourceKind::Disk);
    }
}
