// src/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

#[derive(Default)]
pub struct Metrics {
    pub lines_total: AtomicU64,
    pub lines_skipped: AtomicU64,
    pub chunks_planned: AtomicU64,
    pub chunks_merged: AtomicU64,
    pub bytes_read: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_lines(&self) {
        self.lines_total.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_skipped(&self) {
        self.lines_skipped.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_chunks_merged(&self) {
        self.chunks_merged.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn add_bytes_read(&self, n: u64) {
        self.bytes_read.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_chunks_planned(&self, n: u64) {
        self.chunks_planned.store(n, Ordering::Relaxed);
    }

    pub fn log_summary(&self) {
        // Relaxed loads everywhere; the summary is informational, not transactional.
        info!(
            lines = self.lines_total.load(Ordering::Relaxed),
            skipped = self.lines_skipped.load(Ordering::Relaxed),
            chunks_planned = self.chunks_planned.load(Ordering::Relaxed),
            chunks_merged = self.chunks_merged.load(Ordering::Relaxed),
            bytes_read = self.bytes_read.load(Ordering::Relaxed),
            "scan complete"
        );
    }
}
