//! Connection identity and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate an opaque per-connection ID for correlating log lines
//! - Record connection teardown exactly once, whatever ends the connection

use std::sync::Arc;

use uuid::Uuid;

use crate::observability::Stats;

/// Unique identifier for a connection.
///
/// Carries no protocol meaning; it only tags log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements the current-connection count when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    stats: Arc<Stats>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub(crate) fn new(stats: Arc<Stats>, id: ConnectionId) -> Self {
        Self { stats, id }
    }

    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.stats.connection_closed();
        tracing::trace!(connection_id = %self.id, "Connection released");
    }
}
