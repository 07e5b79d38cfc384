/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::atomic::Ordering;
use std::time::Duration;

use portable_atomic::AtomicU128;

use super::{Meter, Timer};
use crate::{ArcClock, MeterSnapshot, TimerSnapshot};

/// Event count of the last fully elapsed second.
///
/// The second and the count of a bucket are packed into one 64 bit word,
/// the second in the higher 32 bits and the count in the lower 32 bits.
/// The current bucket is kept in the lower word of the state and the
/// previous one in the higher word, so both always change together.
pub struct OneSecondCounter {
    state: AtomicU128,
}

impl Default for OneSecondCounter {
    fn default() -> Self {
        OneSecondCounter {
            state: AtomicU128::new(0),
        }
    }
}

#[inline]
fn pack(second: u32, count: u32) -> u64 {
    ((second as u64) << 32) | count as u64
}

#[inline]
fn unpack(v: u64) -> (u32, u32) {
    ((v >> 32) as u32, v as u32)
}

#[inline]
fn join_buckets(previous: u64, current: u64) -> u128 {
    ((previous as u128) << 64) | current as u128
}

#[inline]
fn split_buckets(v: u128) -> (u64, u64) {
    ((v >> 64) as u64, v as u64)
}

#[inline]
fn count_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl OneSecondCounter {
    pub fn mark_n(&self, now_sec: u64, n: u64) {
        let now_sec = now_sec as u32;
        let n = count_u32(n);
        let mut state = self.state.load(Ordering::Acquire);
        loop {
            let (previous, current) = split_buckets(state);
            let (sec, count) = unpack(current);
            let new = if sec < now_sec {
                join_buckets(current, pack(now_sec, n))
            } else {
                // late updates from an older second are counted in the current bucket
                join_buckets(previous, pack(sec, count.saturating_add(n)))
            };
            match self.state.compare_exchange_weak(
                state,
                new,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(v) => state = v,
            }
        }
    }

    /// Get the count of the second before `now_sec`, 0 if there were no events.
    pub fn rate(&self, now_sec: u64) -> u64 {
        let now_sec = now_sec as u32;
        let Some(last_sec) = now_sec.checked_sub(1) else {
            return 0;
        };
        let (previous, current) = split_buckets(self.state.load(Ordering::Acquire));
        let (sec, count) = unpack(current);
        if sec == last_sec {
            return count as u64;
        }
        if sec == now_sec {
            let (prev_sec, prev_count) = unpack(previous);
            if prev_sec == last_sec {
                return prev_count as u64;
            }
        }
        0
    }
}

/// A meter that also reports the event count of the last second.
pub struct ThroughputMeter {
    meter: Meter,
    one_second: OneSecondCounter,
}

impl ThroughputMeter {
    pub fn new(clock: ArcClock) -> Self {
        ThroughputMeter {
            meter: Meter::new(clock),
            one_second: OneSecondCounter::default(),
        }
    }

    #[inline]
    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.meter.mark_n(n);
        self.one_second.mark_n(self.meter.clock().now_secs(), n);
    }

    pub fn count(&self) -> u64 {
        self.meter.count()
    }

    pub fn one_second_rate(&self) -> u64 {
        self.one_second.rate(self.meter.clock().now_secs())
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.meter.snapshot()
    }
}

impl fmt::Debug for ThroughputMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThroughputMeter")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

/// A timer that also reports the event count of the last second.
pub struct ThroughputTimer {
    clock: ArcClock,
    timer: Timer,
    one_second: OneSecondCounter,
}

impl ThroughputTimer {
    pub fn new(clock: ArcClock) -> Self {
        ThroughputTimer {
            timer: Timer::new(clock.clone()),
            clock,
            one_second: OneSecondCounter::default(),
        }
    }

    pub fn update(&self, d: Duration) {
        self.timer.update(d);
        self.one_second.mark_n(self.clock.now_secs(), 1);
    }

    pub fn count(&self) -> u64 {
        self.timer.count()
    }

    pub fn one_second_rate(&self) -> u64 {
        self.one_second.rate(self.clock.now_secs())
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }
}

impl fmt::Debug for ThroughputTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThroughputTimer")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clock, ManualClock};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn last_full_second() {
        let c = OneSecondCounter::default();
        for _ in 0..5 {
            c.mark_n(100, 1);
        }
        // in progress bucket is not reported
        assert_eq!(c.rate(100), 0);
        assert_eq!(c.rate(101), 5);
        assert_eq!(c.rate(102), 0);
    }

    #[test]
    fn rollover() {
        let c = OneSecondCounter::default();
        c.mark_n(10, 3);
        c.mark_n(11, 2);
        assert_eq!(c.rate(11), 3);
        assert_eq!(c.rate(12), 2);

        c.mark_n(12, 1);
        assert_eq!(c.rate(12), 2);
        c.mark_n(15, 1);
        assert_eq!(c.rate(15), 0);
        assert_eq!(c.rate(16), 1);
    }

    #[test]
    fn late_update() {
        let c = OneSecondCounter::default();
        c.mark_n(20, 1);
        c.mark_n(19, 1);
        assert_eq!(c.rate(21), 2);
    }

    #[test]
    fn concurrent_mark() {
        let c = Arc::new(OneSecondCounter::default());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let c = c.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        c.mark_n(7, 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.rate(8), 1000);
    }

    #[test]
    fn rollover_race() {
        // many threads roll the second over at once, the bucket of the
        // finished second must never be lost
        for round in 0..50u64 {
            let c = Arc::new(OneSecondCounter::default());
            let sec = 100 + round;
            c.mark_n(sec, 7);
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let c = c.clone();
                    thread::spawn(move || {
                        c.mark_n(sec + 1, 1);
                        assert_eq!(c.rate(sec + 1), 7);
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            assert_eq!(c.rate(sec + 1), 7);
            assert_eq!(c.rate(sec + 2), 8);
        }
    }

    #[test]
    fn meter() {
        let clock = Arc::new(ManualClock::new(Duration::from_secs(1000)));
        let m = ThroughputMeter::new(clock.clone());
        for _ in 0..5 {
            m.mark();
        }
        assert_eq!(m.one_second_rate(), 0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(m.one_second_rate(), 5);
        clock.advance(Duration::from_secs(1));
        assert_eq!(m.one_second_rate(), 0);
        assert_eq!(m.count(), 5);
    }

    #[test]
    fn timer() {
        let clock = Arc::new(ManualClock::new(Duration::from_millis(500)));
        let t = ThroughputTimer::new(clock.clone());
        t.update(Duration::from_millis(3));
        t.update(Duration::from_millis(4));
        clock.advance(Duration::from_millis(600));
        assert_eq!(clock.now_secs(), 1);
        assert_eq!(t.one_second_rate(), 2);
        assert_eq!(t.count(), 2);
        assert_eq!(t.snapshot().histogram.count, 2);
    }
}
