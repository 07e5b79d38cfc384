/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use serde_json::Value;

use g3_types::metrics::MetricName;

use super::{dynamic_name, log_registry_error};
use crate::metric::{Counter, Gauge};
use crate::{MeasureError, Measured, MetricRegistry};

/// Runtime wide metrics, directly under the root name.
pub struct RuntimeMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    verticles: Arc<Counter>,
}

impl RuntimeMetrics {
    pub fn new(
        registry: Arc<MetricRegistry>,
        root: MetricName,
        event_loop_size: usize,
        worker_pool_size: usize,
    ) -> Result<Self, MeasureError> {
        registry.register_gauge(&root.join_path("event-loop-size")?, || {
            Gauge::with_value(event_loop_size)
        })?;
        registry.register_gauge(&root.join_path("worker-pool-size")?, || {
            Gauge::with_value(worker_pool_size)
        })?;
        let verticles = registry.counter(&root.join_path("verticles")?)?;
        Ok(RuntimeMetrics {
            registry,
            base: root,
            verticles,
        })
    }

    /// Add the cluster gauges, only for clustered runtimes.
    pub fn set_cluster(&self, host: &str, port: u16) -> Result<(), MeasureError> {
        let host = Value::String(host.to_string());
        self.registry
            .register_gauge(&self.base.join_path("cluster-host")?, || {
                Gauge::with_value(host)
            })?;
        self.registry
            .register_gauge(&self.base.join_path("cluster-port")?, || {
                Gauge::with_value(port)
            })?;
        Ok(())
    }

    fn verticle_counter(&self, name: &str) -> Option<Arc<Counter>> {
        dynamic_name(&self.base, "verticles", name)
            .and_then(|name| log_registry_error(self.registry.counter(&name)))
    }

    pub fn verticle_deployed(&self, name: &str) {
        self.verticles.inc();
        if let Some(c) = self.verticle_counter(name) {
            c.inc();
        }
    }

    pub fn verticle_undeployed(&self, name: &str) {
        self.verticles.dec();
        if let Some(c) = self.verticle_counter(name) {
            c.dec();
        }
    }

    pub fn verticles(&self) -> i64 {
        self.verticles.count()
    }

    /// Remove the runtime wide metrics.
    ///
    /// Metrics of other components under the same root are kept.
    pub fn close(&self) -> usize {
        let mut removed = 0;
        for local in [
            "event-loop-size",
            "worker-pool-size",
            "cluster-host",
            "cluster-port",
            "verticles",
        ] {
            if let Ok(name) = self.base.join_path(local) {
                removed += self.registry.remove(&name);
            }
        }
        removed
    }
}

impl Measured for RuntimeMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}
