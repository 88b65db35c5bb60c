//! Access token acquisition
//!
//! Tokens are looked up in this order:
//! 1. `GOOGLE_OAUTH_ACCESS_TOKEN` environment variable
//! 2. GCE metadata server (default service account)
//! 3. `gcloud auth print-access-token`

use crate::error::{GcpError, Result};
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::RwLock;

/// Scopes requested for the compute and DNS APIs
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/ndev.clouddns.readwrite",
];

pub const TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const METADATA_TIMEOUT: Duration = Duration::from_secs(2);

/// Where an access token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    MetadataServer,
    Gcloud,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "{}", TOKEN_ENV),
            CredentialSource::MetadataServer => write!(f, "metadata server"),
            CredentialSource::Gcloud => write!(f, "gcloud"),
        }
    }
}

/// Bearer token for the Google APIs
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub source: CredentialSource,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Shared, refreshable access token.
///
/// Tokens expire after about an hour; a request rejected with 401 calls
/// [`Credentials::refresh`] and retries once.
pub struct Credentials {
    client: reqwest::Client,
    current: RwLock<AccessToken>,
}

impl Credentials {
    pub async fn acquire(client: reqwest::Client) -> Result<Self> {
        let token = acquire_token(&client).await?;
        Ok(Self::from_token(client, token))
    }

    pub fn from_token(client: reqwest::Client, token: AccessToken) -> Self {
        Self {
            client,
            current: RwLock::new(token),
        }
    }

    pub async fn token(&self) -> String {
        self.current.read().await.token.clone()
    }

    pub async fn source(&self) -> CredentialSource {
        self.current.read().await.source
    }

    /// Replace `stale` with a newly acquired token.
    ///
    /// Returns `false` when no different token could be obtained, so the
    /// caller should not retry.
    pub async fn refresh(&self, stale: &str) -> Result<bool> {
        let mut current = self.current.write().await;
        if current.token != stale {
            // another request already refreshed it
            return Ok(true);
        }

        let fresh = acquire_token(&self.client).await?;
        if fresh.token == stale {
            return Ok(false);
        }
        tracing::info!(source = %fresh.source, "Refreshed access token");
        *current = fresh;
        Ok(true)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Obtain a token from the first source that yields one
pub async fn acquire_token(client: &reqwest::Client) -> Result<AccessToken> {
    if let Some(token) = token_from_env() {
        return Ok(token);
    }

    match token_from_metadata(client).await {
        Ok(token) => return Ok(token),
        Err(e) => tracing::debug!(error = %e, "metadata server token unavailable"),
    }

    token_from_gcloud().await.map_err(|e| {
        GcpError::AuthenticationFailed(format!(
            "no credentials found ({} unset, metadata server unreachable, {})",
            TOKEN_ENV, e
        ))
    })
}

pub fn token_from_env() -> Option<AccessToken> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|token| AccessToken {
            token,
            source: CredentialSource::Environment,
        })
}

async fn token_from_metadata(client: &reqwest::Client) -> Result<AccessToken> {
    let response = client
        .get(METADATA_TOKEN_URL)
        .query(&[("scopes", SCOPES.join(","))])
        .header("Metadata-Flavor", "Google")
        .timeout(METADATA_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GcpError::AuthenticationFailed(format!(
            "metadata server returned {}",
            response.status()
        )));
    }

    let body: MetadataToken = response.json().await?;
    Ok(AccessToken {
        token: body.access_token,
        source: CredentialSource::MetadataServer,
    })
}

async fn token_from_gcloud() -> Result<AccessToken> {
    let mut cmd = Command::new("gcloud");
    cmd.args(["auth", "print-access-token"]);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running: gcloud auth print-access-token");

    let output = cmd.output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GcpError::CommandFailed(stderr.trim().to_string()));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GcpError::CommandFailed(
            "gcloud printed an empty token".to_string(),
        ));
    }

    Ok(AccessToken {
        token,
        source: CredentialSource::Gcloud,
    })
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}
