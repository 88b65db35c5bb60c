//! Fingerprint rules that mark a listed resource as a deletion candidate
//!
//! Classifiers look only at name, description, scope and record type. Age is
//! checked separately by [`crate::age::AgePolicy`].

use crate::resource::{CloudResource, ResourceKind, ZONE_PREFIX};

/// Name prefixes of global forwarding rules created for federated ingresses
pub const GLOBAL_FORWARDING_RULE_PREFIXES: [&str; 2] = [
    "k8s-fw-e2e-tests-federated-ingress-",
    "k8s-fws-e2e-tests-federated-ingress-",
];

/// Description suffixes the service controller leaves on regional objects
pub const FEDERATED_DESCRIPTION_SUFFIXES: [&str; 3] = [
    "federated-ingress-service\"}",
    "federated-service\"}",
    "-apiserver\"}",
];

pub const FIREWALL_RULE_PREFIX: &str = "k8s-";

/// Persistent volume claim disks carry this in their name
pub const DISK_NAME_MARKER: &str = "-pvc-";

pub const CNAME: &str = "CNAME";

/// A candidate predicate
pub type Classifier = fn(&CloudResource) -> bool;

/// Whether `resource` was produced by the federation e2e harness.
///
/// Health checks and SSL certificates carry no fingerprint and are always
/// candidates.
pub fn is_candidate(resource: &CloudResource) -> bool {
    classifier_for(resource.kind)(resource)
}

/// The classifier for one resource kind
pub fn classifier_for(kind: ResourceKind) -> Classifier {
    match kind {
        ResourceKind::ForwardingRule => forwarding_rule,
        ResourceKind::TargetPool => target_pool,
        ResourceKind::HealthCheck => health_check,
        ResourceKind::SslCertificate => ssl_certificate,
        ResourceKind::FirewallRule => firewall_rule,
        ResourceKind::Disk => disk,
        ResourceKind::DnsRecordSet => dns_record_set,
    }
}

pub fn forwarding_rule(resource: &CloudResource) -> bool {
    if resource.is_global() {
        GLOBAL_FORWARDING_RULE_PREFIXES
            .iter()
            .any(|prefix| resource.name.starts_with(prefix))
    } else {
        has_federated_description(resource)
    }
}

/// Global target pools are never created by the service controller.
pub fn target_pool(resource: &CloudResource) -> bool {
    !resource.is_global() && has_federated_description(resource)
}

pub fn health_check(_resource: &CloudResource) -> bool {
    true
}

pub fn ssl_certificate(_resource: &CloudResource) -> bool {
    true
}

pub fn firewall_rule(resource: &CloudResource) -> bool {
    resource.name.starts_with(FIREWALL_RULE_PREFIX)
}

pub fn disk(resource: &CloudResource) -> bool {
    resource.scope.starts_with(ZONE_PREFIX) && resource.name.contains(DISK_NAME_MARKER)
}

pub fn dns_record_set(resource: &CloudResource) -> bool {
    resource.record_type.as_deref() == Some(CNAME)
}

fn has_federated_description(resource: &CloudResource) -> bool {
    FEDERATED_DESCRIPTION_SUFFIXES
        .iter()
        .any(|suffix| resource.description.ends_with(suffix))
}
