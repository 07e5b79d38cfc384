/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::time::Duration;

use super::{Histogram, Meter};
use crate::clock::duration_nanos;
use crate::{ArcClock, TimerSnapshot};

/// A histogram of durations in nanoseconds, and a meter of their occurrence.
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new(clock: ArcClock) -> Self {
        Timer {
            histogram: Histogram::new(),
            meter: Meter::new(clock),
        }
    }

    pub fn update(&self, d: Duration) {
        self.histogram.update(duration_nanos(d));
        self.meter.mark();
    }

    pub fn time<T, F: FnOnce() -> T>(&self, f: F) -> T {
        let ctx = self.start();
        let r = f();
        ctx.stop();
        r
    }

    pub fn start(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            start: self.meter.clock().now(),
        }
    }

    pub fn count(&self) -> u64 {
        self.meter.count()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            histogram: self.histogram.snapshot(),
            meter: self.meter.snapshot(),
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

pub struct TimerContext<'a> {
    timer: &'a Timer,
    start: Duration,
}

impl TimerContext<'_> {
    pub fn stop(self) -> Duration {
        let elapsed = self
            .timer
            .meter
            .clock()
            .now()
            .saturating_sub(self.start);
        self.timer.update(elapsed);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use std::sync::Arc;

    #[test]
    fn update() {
        let clock = Arc::new(ManualClock::default());
        let timer = Timer::new(clock);
        timer.update(Duration::from_millis(10));
        timer.update(Duration::from_millis(30));
        assert_eq!(timer.count(), 2);

        let s = timer.snapshot();
        assert_eq!(s.meter.count, 2);
        assert_eq!(s.histogram.count, 2);
        // 3 significant figures
        assert!(s.histogram.min.abs_diff(10_000_000) <= 10_000);
        assert!(s.histogram.max.abs_diff(30_000_000) <= 30_000);
    }

    #[test]
    fn context() {
        let clock = Arc::new(ManualClock::default());
        let timer = Timer::new(clock.clone());

        let ctx = timer.start();
        clock.advance(Duration::from_millis(250));
        assert_eq!(ctx.stop(), Duration::from_millis(250));

        let v = timer.time(|| {
            clock.advance(Duration::from_millis(50));
            7
        });
        assert_eq!(v, 7);
        assert_eq!(timer.count(), 2);
    }
}
