/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ewma::{Ewma, TICK_INTERVAL};
use crate::clock::duration_nanos;
use crate::{ArcClock, MeterSnapshot};

/// Event count with mean rate and 1, 5 and 15 minutes moving average rates.
pub struct Meter {
    clock: ArcClock,
    count: AtomicU64,
    start_time: u64,
    last_tick: AtomicU64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

impl Meter {
    pub fn new(clock: ArcClock) -> Self {
        let start_time = duration_nanos(clock.now());
        Meter {
            clock,
            count: AtomicU64::new(0),
            start_time,
            last_tick: AtomicU64::new(start_time),
            m1: Ewma::with_minutes(1),
            m5: Ewma::with_minutes(5),
            m15: Ewma::with_minutes(15),
        }
    }

    #[inline]
    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.tick_if_necessary();
        self.count.fetch_add(n, Ordering::Relaxed);
        self.m1.update(n);
        self.m5.update(n);
        self.m15.update(n);
    }

    fn tick_if_necessary(&self) {
        let tick_interval = duration_nanos(TICK_INTERVAL);
        let old_tick = self.last_tick.load(Ordering::Acquire);
        let now = duration_nanos(self.clock.now());
        let Some(age) = now.checked_sub(old_tick) else {
            return;
        };
        if age <= tick_interval {
            return;
        }
        let new_tick = now - age % tick_interval;
        // only the winner of the race does the ticks
        if self
            .last_tick
            .compare_exchange(old_tick, new_tick, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            for _ in 0..age / tick_interval {
                self.m1.tick();
                self.m5.tick();
                self.m15.tick();
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let now = duration_nanos(self.clock.now());
        let elapsed = now.saturating_sub(self.start_time);
        if elapsed == 0 {
            return 0.0;
        }
        count as f64 / (elapsed as f64 / 1_000_000_000.0)
    }

    pub fn one_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m1.rate()
    }

    pub fn five_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m5.rate()
    }

    pub fn fifteen_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m15.rate()
    }

    pub(crate) fn clock(&self) -> &ArcClock {
        &self.clock
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.tick_if_necessary();
        MeterSnapshot {
            count: self.count(),
            mean_rate: self.mean_rate(),
            one_minute_rate: self.m1.rate(),
            five_minute_rate: self.m5.rate(),
            fifteen_minute_rate: self.m15.rate(),
        }
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meter")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}
