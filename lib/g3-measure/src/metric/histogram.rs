/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::{Mutex, PoisonError, TryLockError};

use g3_histogram::{HistogramRecorder, HistogramSnapshot, KeepingHistogram};
use log::{debug, warn};

/// Pending values above which an update will try to merge them in place.
const DRAIN_THRESHOLD: usize = 4096;

/// Sample distribution of u64 values.
///
/// Updates only send the value to the histogram, which is merged at snapshot time
/// or by the updating thread once too many values are pending.
pub struct Histogram {
    recorder: HistogramRecorder<u64>,
    inner: Mutex<KeepingHistogram<u64>>,
}

impl Histogram {
    pub fn new() -> Self {
        let (inner, recorder) = KeepingHistogram::new();
        Histogram {
            recorder,
            inner: Mutex::new(inner),
        }
    }

    pub fn update(&self, v: u64) {
        if let Err(e) = self.recorder.record(v) {
            debug!("failed to record histogram value: {e}");
            return;
        }
        if self.recorder.pending() >= DRAIN_THRESHOLD {
            self.drain();
        }
    }

    /// Merge pending values if no one else is doing it.
    fn drain(&self) {
        let mut inner = match self.inner.try_lock() {
            Ok(inner) => inner,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };
        if let Err(e) = inner.refresh() {
            warn!("failed to merge histogram values: {e}");
        }
    }

    /// Number of updates not yet merged into the histogram.
    pub fn pending(&self) -> usize {
        self.recorder.pending()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = inner.refresh() {
            warn!("failed to merge histogram values: {e}");
        }
        inner.snapshot(&HistogramSnapshot::DEFAULT_QUANTILES)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram::new()
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g3_histogram::Quantile;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn snapshot() {
        let h = Histogram::new();
        let s = h.snapshot();
        assert_eq!(s.count, 0);

        for v in [10, 20, 30, 40] {
            h.update(v);
        }
        let s = h.snapshot();
        assert_eq!(s.count, 4);
        assert_eq!(s.min, 10);
        assert_eq!(s.max, 40);
        assert!((s.mean - 25.0).abs() < 1e-9);
        assert_eq!(s.quantile(Quantile::PCT999), Some(40));

        h.update(50);
        assert_eq!(h.snapshot().count, 5);
    }

    #[test]
    fn concurrent_update() {
        let h = Arc::new(Histogram::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let h = h.clone();
                thread::spawn(move || {
                    for v in 0..100 {
                        h.update(i * 100 + v);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let s = h.snapshot();
        assert_eq!(s.count, 400);
        assert_eq!(s.min, 0);
        assert_eq!(s.max, 399);
    }

    #[test]
    fn backlog_bounded_without_snapshot() {
        let h = Histogram::new();
        for v in 0..1_000_000 {
            h.update(v % 1000);
            assert!(h.pending() < DRAIN_THRESHOLD);
        }
        let s = h.snapshot();
        assert_eq!(s.count, 1_000_000);
        assert_eq!(h.pending(), 0);
    }

    #[test]
    fn backlog_bounded_concurrent() {
        let h = Arc::new(Histogram::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let h = h.clone();
                thread::spawn(move || {
                    for v in 0..50_000 {
                        h.update(v);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        h.update(0);
        assert!(h.pending() < DRAIN_THRESHOLD);
        assert_eq!(h.snapshot().count, 200_001);
    }
}
