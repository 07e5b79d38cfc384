/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use g3_types::metrics::{MetricName, NodeName};

use crate::metric::{Counter, Gauge, Timer};
use crate::{MeasureError, Measured, MetricRegistry};

/// A task waiting in the queue of a pool.
pub struct PoolTask {
    submitted: Duration,
}

/// A task holding a resource of a pool.
pub struct PoolUsage {
    begin: Duration,
}

/// Metrics of a worker or connection pool, under `<root>.pool.<type>.<name>`.
pub struct PoolMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    queue_delay: Arc<Timer>,
    queue_size: Arc<Counter>,
    usage: Arc<Timer>,
    in_use: Arc<Counter>,
}

impl PoolMetrics {
    /// The max pool size gauges are only registered if `max_size` is not 0.
    pub fn new(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        pool_type: &str,
        pool_name: &str,
        max_size: usize,
    ) -> Result<Self, MeasureError> {
        let mut base = root.join_path("pool")?;
        base.push(NodeName::escape(pool_type));
        base.push(NodeName::escape(pool_name));

        let queue_delay = registry.timer(&base.join_path("queue-delay")?)?;
        let queue_size = registry.counter(&base.join_path("queue-size")?)?;
        let usage = registry.timer(&base.join_path("usage")?)?;
        let in_use = registry.counter(&base.join_path("in-use")?)?;

        if max_size > 0 {
            registry.register_gauge(&base.join_path("max-pool-size")?, || {
                Gauge::with_value(max_size)
            })?;
            let in_use_c = in_use.clone();
            let max = max_size as f64;
            registry.register_gauge(&base.join_path("pool-ratio")?, move || {
                Gauge::ratio(move || in_use_c.count() as f64, move || max)
            })?;
        }

        Ok(PoolMetrics {
            registry,
            base,
            queue_delay,
            queue_size,
            usage,
            in_use,
        })
    }

    fn elapsed(&self, start: Duration) -> Duration {
        self.registry.clock().now().saturating_sub(start)
    }

    pub fn submitted(&self) -> PoolTask {
        self.queue_size.inc();
        PoolTask {
            submitted: self.registry.clock().now(),
        }
    }

    pub fn rejected(&self, _task: PoolTask) {
        self.queue_size.dec();
    }

    /// The task leaves the queue and starts to use a pool resource.
    pub fn begin(&self, task: PoolTask) -> PoolUsage {
        self.queue_size.dec();
        self.queue_delay.update(self.elapsed(task.submitted));
        self.in_use.inc();
        PoolUsage {
            begin: self.registry.clock().now(),
        }
    }

    pub fn end(&self, usage: PoolUsage) {
        self.in_use.dec();
        self.usage.update(self.elapsed(usage.begin));
    }

    pub fn close(&self) -> usize {
        self.registry.remove(&self.base)
    }
}

impl Measured for PoolMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}
