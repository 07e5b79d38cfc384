/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hdrhistogram::Counter;
use tokio::sync::mpsc;

/// The sending half of a histogram.
///
/// Recording never blocks and never takes a lock, the values will be merged
/// into the histogram when it is refreshed.
#[derive(Clone)]
pub struct HistogramRecorder<T: Counter> {
    sender: mpsc::UnboundedSender<T>,
    pending: Arc<AtomicUsize>,
}

impl<T: Counter> HistogramRecorder<T> {
    pub(crate) fn new(sender: mpsc::UnboundedSender<T>, pending: Arc<AtomicUsize>) -> Self {
        HistogramRecorder { sender, pending }
    }

    pub fn record(&self, v: T) -> Result<(), mpsc::error::SendError<T>> {
        // counted before sending, so the receiver never sees a value not yet counted
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.sender.send(v).inspect_err(|_| {
            self.pending.fetch_sub(1, Ordering::Relaxed);
        })
    }

    /// Number of recorded values not yet merged into the histogram.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// Check if the histogram side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
