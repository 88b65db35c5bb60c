//! Google Cloud provider for fedtidy
//!
//! Implements the `CloudProvider` trait on top of the Compute Engine and
//! Cloud DNS REST APIs.
//!
//! # Requirements
//!
//! One of:
//! - `GOOGLE_OAUTH_ACCESS_TOKEN` set to a bearer token
//! - running on GCE with a service account
//! - `gcloud` installed and logged in
//!
//! # Example
//!
//! ```ignore
//! use fedtidy_cloud_gcp::{GcpConfig, GcpProvider};
//! use fedtidy_cloud::CloudProvider;
//!
//! let provider = GcpProvider::connect(GcpConfig::from_env()).await?;
//! let page = provider
//!     .list_resources("my-project", ResourceKind::Disk, None)
//!     .await?;
//! ```

pub mod auth;
pub mod compute;
pub mod dns;
pub mod error;
mod http;
pub mod provider;

pub use auth::{AccessToken, CredentialSource, Credentials, SCOPES, acquire_token};
pub use compute::ComputeClient;
pub use dns::DnsClient;
pub use error::{GcpError, Result};
pub use provider::{GcpConfig, GcpProvider};
