//! Client statistics
//!
//! Every execution of a request run through an [`HttpClient`](super::HttpClient)
//! bumps these counters. They are shared by clones of the client.

use std::sync::atomic::{AtomicU64, Ordering};

/// Event counters of one client
#[derive(Debug, Default)]
pub struct ClientStats {
    started: AtomicU64,
    resolved: AtomicU64,
    failed: AtomicU64,
    body_bytes: AtomicU64,
    connected: AtomicU64,
    connect_failures: AtomicU64,
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl ClientStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An execution was forked.
    pub fn execution_started(&self) {
        bump(&self.started, 1);
    }

    /// An execution obtained a response head in `[200, 400)`.
    pub fn execution_resolved(&self) {
        bump(&self.resolved, 1);
    }

    /// An execution failed or was aborted before its head.
    pub fn execution_failed(&self) {
        bump(&self.failed, 1);
    }

    /// A buffered request read `bytes` of body.
    pub fn body_buffered(&self, bytes: u64) {
        bump(&self.body_bytes, bytes);
    }

    pub fn connection_opened(&self) {
        bump(&self.connected, 1);
    }

    /// A connect attempt was refused, failed or ran out of time.
    pub fn connection_failed(&self) {
        bump(&self.connect_failures, 1);
    }

    #[must_use]
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        let read = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        ClientStatsSnapshot {
            requests_total: read(&self.started),
            requests_successful: read(&self.resolved),
            requests_failed: read(&self.failed),
            bytes_received: read(&self.body_bytes),
            connections_total: read(&self.connected),
            connections_failed: read(&self.connect_failures),
        }
    }
}

/// Counter values at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStatsSnapshot {
    pub requests_total: u64,
    pub requests_successful: u64,
    pub requests_failed: u64,
    pub bytes_received: u64,
    pub connections_total: u64,
    pub connections_failed: u64,
}

impl ClientStatsSnapshot {
    /// Executions that have not settled yet.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        self.requests_total
            .saturating_sub(self.requests_successful + self.requests_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_are_zero() {
        assert_eq!(ClientStats::new().snapshot(), ClientStatsSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_recorded_events() {
        let stats = ClientStats::new();
        stats.execution_started();
        stats.execution_started();
        stats.execution_started();
        stats.execution_resolved();
        stats.execution_failed();
        stats.connection_opened();
        stats.connection_failed();
        stats.body_buffered(5);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.requests_total, 3);
        assert_eq!(snapshot.requests_successful, 1);
        assert_eq!(snapshot.requests_failed, 1);
        assert_eq!(snapshot.in_flight(), 1);
        assert_eq!(snapshot.connections_total, 1);
        assert_eq!(snapshot.connections_failed, 1);
        assert_eq!(snapshot.bytes_received, 5);
    }
}
