//! Age-based expiry policy

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Resources created longer ago than this are obsolete.
pub const OBSOLETE_AFTER: Duration = Duration::hours(8);

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Decides whether a creation timestamp is older than [`OBSOLETE_AFTER`].
///
/// The clock is read on every check, never cached.
#[derive(Clone)]
pub struct AgePolicy {
    clock: Arc<dyn Clock>,
}

impl AgePolicy {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self::new(Arc::new(FixedClock(now)))
    }

    pub fn is_obsolete(&self, timestamp: &str) -> Result<bool, chrono::ParseError> {
        is_obsolete_at(timestamp, self.clock.now())
    }
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for AgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgePolicy")
            .field("now", &self.clock.now())
            .finish()
    }
}

/// `true` iff `now - timestamp` is strictly greater than eight hours.
pub fn is_obsolete_at(timestamp: &str, now: DateTime<Utc>) -> Result<bool, chrono::ParseError> {
    let created = DateTime::parse_from_rfc3339(timestamp)?;
    Ok(now.signed_duration_since(created) > OBSOLETE_AFTER)
}

/// [`is_obsolete_at`] against the current wall-clock time.
pub fn is_obsolete(timestamp: &str) -> Result<bool, chrono::ParseError> {
    is_obsolete_at(timestamp, Utc::now())
}
