//! fedtidy cloud engine
//!
//! Finds cloud objects left behind by federation e2e runs and deletes the
//! ones older than eight hours.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Coordinator                     │
//! │          (one task per configured project)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                ProjectRunner                     │
//! │  forwarding rules → target pools → health checks │
//! │  → SSL certs → firewalls → dns records → disks   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                  Sweeper                         │
//! │  ┌────────────┐ ┌───────────┐ ┌──────────────┐  │
//! │  │ Classifier │ │ AgePolicy │ │ BatchDeleter │  │
//! │  └────────────┘ └───────────┘ └──────────────┘  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │        trait CloudProvider { list, delete }      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod age;
pub mod batch;
pub mod classify;
pub mod coordinator;
pub mod error;
pub mod provider;
pub mod report;
pub mod resource;
pub mod runner;
pub mod sweep;

// Re-exports
pub use age::{AgePolicy, Clock, FixedClock, OBSOLETE_AFTER, SystemClock, is_obsolete};
pub use batch::{BatchDeleter, DNS_BATCH_SIZE};
pub use classify::{Classifier, classifier_for, is_candidate};
pub use coordinator::Coordinator;
pub use error::{CloudError, Result, SweepError};
pub use provider::{AuthStatus, CloudProvider};
pub use report::{ProjectReport, RunSummary, SweepResult};
pub use resource::{CloudResource, DnsRecordSet, GLOBAL_SCOPE, Page, ResourceKind};
pub use runner::ProjectRunner;
pub use sweep::Sweeper;
