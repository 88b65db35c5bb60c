use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fedtidy_cloud::{
    AuthStatus, CloudError, CloudProvider, CloudResource, DnsRecordSet, Page, ResourceKind,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap()
}

/// RFC3339 timestamp `hours` before [`now`]
pub fn hours_ago(hours: i64) -> String {
    (now() - Duration::hours(hours)).to_rfc3339()
}

pub fn resource(kind: ResourceKind, name: &str, scope: &str, age_hours: i64) -> CloudResource {
    CloudResource::new(kind, name, scope).with_creation_timestamp(hours_ago(age_hours))
}

/// In-memory provider serving canned pages and recording every mutation
#[derive(Default)]
pub struct FakeProvider {
    pages: HashMap<(String, ResourceKind), Vec<Page<CloudResource>>>,
    list_failures: HashMap<(String, ResourceKind), usize>,
    delete_failures: HashSet<String>,
    record_pages: HashMap<(String, String), Vec<Page<DnsRecordSet>>>,
    change_failures: HashSet<usize>,
    pub deletes: Mutex<Vec<(String, ResourceKind, String)>>,
    pub changes: Mutex<Vec<(String, String, Vec<String>)>>,
    pub list_calls: Mutex<Vec<(String, ResourceKind, Option<String>)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` for `kind`; page tokens are assigned automatically.
    pub fn with_pages(
        mut self,
        project: &str,
        kind: ResourceKind,
        pages: Vec<Vec<CloudResource>>,
    ) -> Self {
        self.pages
            .insert((project.to_string(), kind), chain(pages));
        self
    }

    /// Fail the listing call for page `index` of `kind`
    pub fn failing_list(mut self, project: &str, kind: ResourceKind, index: usize) -> Self {
        self.list_failures.insert((project.to_string(), kind), index);
        self
    }

    pub fn failing_delete(mut self, name: &str) -> Self {
        self.delete_failures.insert(name.to_string());
        self
    }

    pub fn with_record_pages(
        mut self,
        project: &str,
        zone: &str,
        pages: Vec<Vec<DnsRecordSet>>,
    ) -> Self {
        self.record_pages
            .insert((project.to_string(), zone.to_string()), chain(pages));
        self
    }

    /// Fail the `index`-th change request (zero based, across all zones)
    pub fn failing_change(mut self, index: usize) -> Self {
        self.change_failures.insert(index);
        self
    }

    pub fn deleted_names(&self, project: &str) -> Vec<String> {
        self.deletes
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _, _)| p == project)
            .map(|(_, _, name)| name.clone())
            .collect()
    }

    pub fn change_sizes(&self) -> Vec<usize> {
        self.changes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, names)| names.len())
            .collect()
    }
}

fn chain<T>(pages: Vec<Vec<T>>) -> Vec<Page<T>> {
    let count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, items)| {
            let next = (i + 1 < count).then(|| format!("page-{}", i + 1));
            Page::new(items, next)
        })
        .collect()
}

fn page_index(token: Option<&str>) -> usize {
    token
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl CloudProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn check_auth(&self) -> fedtidy_cloud::Result<AuthStatus> {
        Ok(AuthStatus::ok("fake"))
    }

    async fn list_resources(
        &self,
        project: &str,
        kind: ResourceKind,
        page_token: Option<&str>,
    ) -> fedtidy_cloud::Result<Page<CloudResource>> {
        self.list_calls.lock().unwrap().push((
            project.to_string(),
            kind,
            page_token.map(str::to_string),
        ));

        let key = (project.to_string(), kind);
        let index = page_index(page_token);
        if self.list_failures.get(&key) == Some(&index) {
            return Err(CloudError::ApiError("backend error".to_string()));
        }

        Ok(self
            .pages
            .get(&key)
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new())))
    }

    async fn delete_resource(
        &self,
        project: &str,
        resource: &CloudResource,
    ) -> fedtidy_cloud::Result<()> {
        if self.delete_failures.contains(&resource.name) {
            return Err(CloudError::ApiError(format!(
                "resource {} is in use",
                resource.name
            )));
        }
        self.deletes.lock().unwrap().push((
            project.to_string(),
            resource.kind,
            resource.name.clone(),
        ));
        Ok(())
    }

    async fn list_record_sets(
        &self,
        project: &str,
        zone: &str,
        page_token: Option<&str>,
    ) -> fedtidy_cloud::Result<Page<DnsRecordSet>> {
        Ok(self
            .record_pages
            .get(&(project.to_string(), zone.to_string()))
            .and_then(|pages| pages.get(page_index(page_token)))
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new())))
    }

    async fn delete_record_sets(
        &self,
        project: &str,
        zone: &str,
        deletions: &[DnsRecordSet],
    ) -> fedtidy_cloud::Result<()> {
        let mut changes = self.changes.lock().unwrap();
        if self.change_failures.contains(&changes.len()) {
            return Err(CloudError::ApiError("change rejected".to_string()));
        }
        changes.push((
            project.to_string(),
            zone.to_string(),
            deletions.iter().map(|r| r.name.clone()).collect(),
        ));
        Ok(())
    }
}
