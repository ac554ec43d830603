//! Cached band address.
//!
//! Holds the last discovered peer together with the instant it was seen.
//! Time comes from [`tokio::time::Instant`] so tests can pause and advance
//! the clock.

use std::time::Duration;

use tokio::time::Instant;

/// How long a discovered address counts as fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Single-slot cache for the discovered band.
#[derive(Debug, Clone)]
pub struct AddressCache<P> {
    entry: Option<(P, Instant)>,
}

impl<P> Default for AddressCache<P> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<P> AddressCache<P> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `peer` as seen now, replacing any previous entry.
    pub fn record(&mut self, peer: P) {
        self.entry = Some((peer, Instant::now()));
    }

    /// The cached peer, fresh or not.
    pub fn peer(&self) -> Option<&P> {
        self.entry.as_ref().map(|(peer, _)| peer)
    }

    /// Time since the cached peer was recorded.
    pub fn age(&self) -> Option<Duration> {
        self.entry.as_ref().map(|(_, seen)| seen.elapsed())
    }

    /// Whether a peer is cached and younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age().is_some_and(|age| age < ttl)
    }

    /// Whether any peer is cached.
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Drop the cached peer.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
