/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hdrhistogram::{Counter, CreationError, Histogram, RecordError};
use tokio::sync::mpsc;

use crate::{HistogramRecorder, HistogramSnapshot, Quantile};

/// A histogram that keeps all values since creation.
///
/// Values sent by the paired [`HistogramRecorder`] are merged in when
/// [`KeepingHistogram::refresh`] is called, no async runtime is needed.
pub struct KeepingHistogram<T: Counter> {
    inner: Histogram<T>,
    receiver: mpsc::UnboundedReceiver<T>,
    pending: Arc<AtomicUsize>,
}

impl<T: Counter> KeepingHistogram<T> {
    pub fn new() -> (Self, HistogramRecorder<T>) {
        KeepingHistogram::with_sigfig(3).expect("3 is a valid number of significant figures")
    }

    pub fn with_sigfig(sigfig: u8) -> Result<(Self, HistogramRecorder<T>), CreationError> {
        let inner = Histogram::new(sigfig)?;
        Ok(KeepingHistogram::with_inner(inner))
    }

    fn with_inner(inner: Histogram<T>) -> (Self, HistogramRecorder<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        (
            KeepingHistogram {
                inner,
                receiver,
                pending: pending.clone(),
            },
            HistogramRecorder::new(sender, pending),
        )
    }

    /// Merge all pending values.
    ///
    /// All pending values are consumed even if some of them failed to be
    /// recorded, and the last error will be returned.
    pub fn refresh(&mut self) -> Result<(), RecordError> {
        use mpsc::error::TryRecvError;

        let mut result = Ok(());
        let mut received = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(v) => {
                    received += 1;
                    if let Err(e) = self.inner.record(v.as_u64()) {
                        result = Err(e);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.pending.fetch_sub(received, Ordering::Relaxed);
        result
    }

    /// Number of recorded values not yet merged.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &Histogram<T> {
        &self.inner
    }

    pub fn snapshot(&self, quantiles: &[Quantile]) -> HistogramSnapshot {
        HistogramSnapshot::new(&self.inner, quantiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh() {
        let (mut h, r) = KeepingHistogram::<u64>::new();
        for v in 1..=100 {
            r.record(v).unwrap();
        }
        assert!(h.inner().is_empty());
        assert_eq!(h.pending(), 100);
        assert_eq!(r.pending(), 100);

        h.refresh().unwrap();
        assert_eq!(h.pending(), 0);
        assert_eq!(h.inner().len(), 100);
        assert_eq!(h.inner().min(), 1);
        assert_eq!(h.inner().max(), 100);

        let r2 = r.clone();
        r2.record(1000).unwrap();
        drop(r);
        drop(r2);
        h.refresh().unwrap();
        assert_eq!(h.inner().len(), 101);
        assert_eq!(h.inner().max(), 1000);
    }

    #[test]
    fn large_value() {
        let (mut h, r) = KeepingHistogram::<u64>::new();
        r.record(60_000_000_000).unwrap();
        h.refresh().unwrap();
        assert_eq!(h.inner().len(), 1);
    }

    #[test]
    fn closed() {
        let (h, r) = KeepingHistogram::<u64>::with_sigfig(3).unwrap();
        assert!(!r.is_closed());
        drop(h);
        assert!(r.is_closed());
        assert!(r.record(1).is_err());
        assert_eq!(r.pending(), 0);
    }
}
