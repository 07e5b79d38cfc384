/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use portable_atomic::AtomicF64;

pub(super) const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Exponentially weighted moving average of a rate, ticked every
/// [`TICK_INTERVAL`].
pub(super) struct Ewma {
    alpha: f64,
    uncounted: AtomicU64,
    rate: AtomicF64,
    initialized: AtomicBool,
}

impl Ewma {
    fn with_alpha(alpha: f64) -> Self {
        Ewma {
            alpha,
            uncounted: AtomicU64::new(0),
            rate: AtomicF64::new(0.0),
            initialized: AtomicBool::new(false),
        }
    }

    pub(super) fn with_minutes(minutes: u32) -> Self {
        let interval = TICK_INTERVAL.as_secs_f64();
        let alpha = 1.0 - (-interval / 60.0 / minutes as f64).exp();
        Ewma::with_alpha(alpha)
    }

    pub(super) fn update(&self, n: u64) {
        self.uncounted.fetch_add(n, Ordering::Relaxed);
    }

    /// Should only be called by one thread at a time.
    pub(super) fn tick(&self) {
        let count = self.uncounted.swap(0, Ordering::Relaxed);
        let instant_rate = count as f64 / TICK_INTERVAL.as_secs_f64();
        if self.initialized.load(Ordering::Relaxed) {
            let rate = self.rate.load(Ordering::Relaxed);
            self.rate
                .store(rate + self.alpha * (instant_rate - rate), Ordering::Relaxed);
        } else {
            self.rate.store(instant_rate, Ordering::Relaxed);
            self.initialized.store(true, Ordering::Relaxed);
        }
    }

    /// Events per second.
    pub(super) fn rate(&self) -> f64 {
        self.rate.load(Ordering::Relaxed)
    }
}
