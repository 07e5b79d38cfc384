/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod clock;
pub use clock::{ArcClock, Clock, ManualClock, MonotonicClock};

mod error;
pub use error::{MeasureError, RegistryError};

pub mod metric;
pub use metric::{AnyMetric, MetricKind};

mod registry;
pub use registry::{MetricRegistry, SharedRegistries};

mod name;
pub use name::{compose, compose_dynamic};

mod filter;
pub use filter::{monitored_node, should_monitor};

mod snapshot;
pub use snapshot::{MeterSnapshot, MetricSnapshot, TimerSnapshot};

mod measured;
pub use measured::{Measured, MeasuredRef};

mod service;
pub use service::MetricsService;

mod options;
pub use options::MetricsOptions;

mod context;
pub use context::MeasureContext;

pub mod component;
