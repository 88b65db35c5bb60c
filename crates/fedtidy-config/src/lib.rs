pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One cloud project swept by the collector, paired with the managed DNS
/// zone that holds its test records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: String,

    /// Managed zone name. Empty means the project has no DNS sweep.
    #[serde(default)]
    pub dns_zone: String,
}

impl ProjectConfig {
    pub fn new(project: impl Into<String>, dns_zone: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            dns_zone: dns_zone.into(),
        }
    }

    pub fn has_dns_zone(&self) -> bool {
        !self.dns_zone.is_empty()
    }
}

/// Load the ordered project list from a JSON file.
///
/// The file holds an array of `{"project": "...", "dnsZone": "..."}` objects.
pub fn load_projects(path: impl AsRef<Path>) -> Result<Vec<ProjectConfig>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let projects = parse_projects(&content).map_err(|e| match e {
        ConfigError::Json { source, .. } => ConfigError::Json {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    tracing::debug!(
        config = %path.display(),
        count = projects.len(),
        "Loaded project config"
    );
    Ok(projects)
}

/// Decode and validate a project list from its JSON text.
pub fn parse_projects(content: &str) -> Result<Vec<ProjectConfig>> {
    let projects: Vec<ProjectConfig> =
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: Default::default(),
            source,
        })?;

    if projects.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "no projects configured".to_string(),
        ));
    }

    if let Some(idx) = projects.iter().position(|p| p.project.trim().is_empty()) {
        return Err(ConfigError::InvalidConfig(format!(
            "entry {} has an empty project",
            idx
        )));
    }

    Ok(projects)
}
