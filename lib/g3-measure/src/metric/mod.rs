/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;

use crate::{ArcClock, MetricSnapshot};

mod counter;
pub use counter::Counter;

mod gauge;
pub use gauge::Gauge;

mod ewma;

mod meter;
pub use meter::Meter;

mod histogram;
pub use histogram::Histogram;

mod timer;
pub use timer::{Timer, TimerContext};

mod throughput;
pub use throughput::{OneSecondCounter, ThroughputMeter, ThroughputTimer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
    Meter,
    ThroughputMeter,
    Timer,
    ThroughputTimer,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::ThroughputMeter => "throughput meter",
            MetricKind::Timer => "timer",
            MetricKind::ThroughputTimer => "throughput timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared handle to a registered metric.
#[derive(Clone)]
pub enum AnyMetric {
    Gauge(Arc<Gauge>),
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    ThroughputMeter(Arc<ThroughputMeter>),
    Timer(Arc<Timer>),
    ThroughputTimer(Arc<ThroughputTimer>),
}

impl AnyMetric {
    /// Create a new metric of the given kind.
    ///
    /// Gauges have no default value supplier, so `None` is returned for them.
    pub(crate) fn new(kind: MetricKind, clock: &ArcClock) -> Option<Self> {
        let m = match kind {
            MetricKind::Gauge => return None,
            MetricKind::Counter => AnyMetric::Counter(Arc::new(Counter::default())),
            MetricKind::Histogram => AnyMetric::Histogram(Arc::new(Histogram::new())),
            MetricKind::Meter => AnyMetric::Meter(Arc::new(Meter::new(clock.clone()))),
            MetricKind::ThroughputMeter => {
                AnyMetric::ThroughputMeter(Arc::new(ThroughputMeter::new(clock.clone())))
            }
            MetricKind::Timer => AnyMetric::Timer(Arc::new(Timer::new(clock.clone()))),
            MetricKind::ThroughputTimer => {
                AnyMetric::ThroughputTimer(Arc::new(ThroughputTimer::new(clock.clone())))
            }
        };
        Some(m)
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            AnyMetric::Gauge(_) => MetricKind::Gauge,
            AnyMetric::Counter(_) => MetricKind::Counter,
            AnyMetric::Histogram(_) => MetricKind::Histogram,
            AnyMetric::Meter(_) => MetricKind::Meter,
            AnyMetric::ThroughputMeter(_) => MetricKind::ThroughputMeter,
            AnyMetric::Timer(_) => MetricKind::Timer,
            AnyMetric::ThroughputTimer(_) => MetricKind::ThroughputTimer,
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        match self {
            AnyMetric::Gauge(g) => MetricSnapshot::Gauge(g.value()),
            AnyMetric::Counter(c) => MetricSnapshot::Counter(c.count()),
            AnyMetric::Histogram(h) => MetricSnapshot::Histogram(h.snapshot()),
            AnyMetric::Meter(m) => MetricSnapshot::Meter(m.snapshot()),
            AnyMetric::ThroughputMeter(m) => {
                MetricSnapshot::ThroughputMeter(m.snapshot(), m.one_second_rate())
            }
            AnyMetric::Timer(t) => MetricSnapshot::Timer(t.snapshot()),
            AnyMetric::ThroughputTimer(t) => {
                MetricSnapshot::ThroughputTimer(t.snapshot(), t.one_second_rate())
            }
        }
    }

    /// Check whether the two handles point to the same metric instance.
    pub fn ptr_eq(&self, other: &AnyMetric) -> bool {
        match (self, other) {
            (AnyMetric::Gauge(a), AnyMetric::Gauge(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::Counter(a), AnyMetric::Counter(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::Histogram(a), AnyMetric::Histogram(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::Meter(a), AnyMetric::Meter(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::ThroughputMeter(a), AnyMetric::ThroughputMeter(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::Timer(a), AnyMetric::Timer(b)) => Arc::ptr_eq(a, b),
            (AnyMetric::ThroughputTimer(a), AnyMetric::ThroughputTimer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for AnyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyMetric({})", self.kind())
    }
}
