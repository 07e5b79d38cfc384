/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use g3_types::metrics::MetricName;

use crate::registry::snapshot_to_json;
use crate::{Measured, MetricRegistry, MetricSnapshot};

/// Read access to the metrics of a registry.
#[derive(Clone)]
pub struct MetricsService {
    registry: Arc<MetricRegistry>,
}

impl MetricsService {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        MetricsService { registry }
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn base_name<'a>(&self, measured: &'a dyn Measured) -> &'a MetricName {
        measured.metric_base_name()
    }

    /// Snapshot the metrics of a component, keyed by the name relative to its base name.
    pub fn snapshot(&self, measured: &dyn Measured) -> BTreeMap<String, MetricSnapshot> {
        self.registry.snapshot(measured.metric_base_name())
    }

    /// Snapshot the metrics under a dotted prefix, keyed by the relative name.
    ///
    /// All metrics are returned if the prefix is empty. An invalid prefix
    /// matches nothing.
    pub fn snapshot_prefix(&self, prefix: &str) -> BTreeMap<String, MetricSnapshot> {
        if prefix.is_empty() {
            return self.registry.snapshot_all();
        }
        match MetricName::from_str(prefix) {
            Ok(name) => self.registry.snapshot(&name),
            Err(e) => {
                debug!("no metric will match invalid prefix {prefix}: {e}");
                BTreeMap::new()
            }
        }
    }

    /// Snapshot all metrics, keyed by their full name.
    pub fn snapshot_all(&self) -> BTreeMap<String, MetricSnapshot> {
        self.registry.snapshot_all()
    }

    pub fn snapshot_json(&self, measured: &dyn Measured) -> Map<String, Value> {
        snapshot_to_json(self.snapshot(measured))
    }

    pub fn snapshot_prefix_json(&self, prefix: &str) -> Map<String, Value> {
        snapshot_to_json(self.snapshot_prefix(prefix))
    }

    pub fn snapshot_all_json(&self) -> Map<String, Value> {
        snapshot_to_json(self.snapshot_all())
    }

    /// Full names of all metrics of a component.
    pub fn metric_names(&self, measured: &dyn Measured) -> BTreeSet<String> {
        self.registry
            .names_with_prefix(measured.metric_base_name())
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn all_metric_names(&self) -> BTreeSet<String> {
        self.registry
            .names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MeasuredRef;
    use serde_json::json;

    fn setup() -> MetricsService {
        let registry = Arc::new(MetricRegistry::new());
        for n in [
            "vertx.eventbus.handlers",
            "vertx.net.servers.localhost:80.exceptions",
            "vertx.verticles",
        ] {
            registry
                .counter(&MetricName::from_str(n).unwrap())
                .unwrap()
                .inc();
        }
        MetricsService::new(registry)
    }

    #[test]
    fn measured_snapshot() {
        let service = setup();
        let eb = MeasuredRef::from_str("vertx.eventbus").unwrap();
        let v = Value::Object(service.snapshot_json(&eb));
        assert_eq!(v, json!({"handlers": {"type": "counter", "count": 1}}));

        let names = service.metric_names(&eb);
        assert_eq!(names.len(), 1);
        assert!(names.contains("vertx.eventbus.handlers"));
    }

    #[test]
    fn prefix_snapshot() {
        let service = setup();
        let s = service.snapshot_prefix("vertx.net.servers");
        assert_eq!(s.len(), 1);
        assert!(s.contains_key("localhost:80.exceptions"));

        assert_eq!(service.snapshot_prefix("").len(), 3);
        assert!(service.snapshot_prefix("vertx..net").is_empty());
        assert!(service.snapshot_prefix("other").is_empty());
    }

    #[test]
    fn all() {
        let service = setup();
        let all = service.snapshot_all_json();
        assert_eq!(all.len(), 3);
        assert_eq!(all["vertx.verticles"], json!({"type": "counter", "count": 1}));
        assert_eq!(service.all_metric_names().len(), 3);
    }
}
