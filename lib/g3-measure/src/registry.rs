/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use foldhash::fast::FixedState;
use serde_json::{Map, Value};

use g3_types::metrics::MetricName;

use crate::metric::{Counter, Gauge, Histogram, Meter, ThroughputMeter, ThroughputTimer, Timer};
use crate::{AnyMetric, ArcClock, MetricKind, MetricSnapshot, MonotonicClock, RegistryError};

macro_rules! typed_get_or_create {
    ($fn_name:ident, $kind:ident, $ty:ty) => {
        pub fn $fn_name(&self, name: &MetricName) -> Result<Arc<$ty>, RegistryError> {
            match self.get_or_create(name, MetricKind::$kind)? {
                AnyMetric::$kind(m) => Ok(m),
                other => Err(RegistryError::KindMismatch {
                    name: name.clone(),
                    registered: other.kind(),
                    requested: MetricKind::$kind,
                }),
            }
        }
    };
}

/// All metrics of a measuring subsystem, keyed by their full name.
pub struct MetricRegistry {
    clock: ArcClock,
    metrics: RwLock<HashMap<MetricName, AnyMetric, FixedState>>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        MetricRegistry::new()
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        MetricRegistry::with_clock(Arc::new(MonotonicClock::default()))
    }

    pub fn with_clock(clock: ArcClock) -> Self {
        MetricRegistry {
            clock,
            metrics: RwLock::new(HashMap::with_hasher(FixedState::with_seed(0))),
        }
    }

    pub fn clock(&self) -> &ArcClock {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, name: &MetricName) -> Option<AnyMetric> {
        let ht = self.metrics.read().unwrap_or_else(PoisonError::into_inner);
        ht.get(name).cloned()
    }

    /// Get the metric with this name, or create it if not existed.
    ///
    /// Gauges can not be created here, use [`MetricRegistry::gauge`] instead.
    pub fn get_or_create(
        &self,
        name: &MetricName,
        kind: MetricKind,
    ) -> Result<AnyMetric, RegistryError> {
        self.get_or_insert_with(name, kind, || AnyMetric::new(kind, &self.clock))
    }

    fn get_or_insert_with<F>(
        &self,
        name: &MetricName,
        kind: MetricKind,
        create: F,
    ) -> Result<AnyMetric, RegistryError>
    where
        F: FnOnce() -> Option<AnyMetric>,
    {
        let check_kind = |m: &AnyMetric| {
            if m.kind() == kind {
                Ok(m.clone())
            } else {
                Err(RegistryError::KindMismatch {
                    name: name.clone(),
                    registered: m.kind(),
                    requested: kind,
                })
            }
        };

        if let Some(m) = self
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return check_kind(m);
        }

        let mut ht = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        // check again as some other thread may have created it
        if let Some(m) = ht.get(name) {
            return check_kind(m);
        }
        let Some(m) = create() else {
            return Err(RegistryError::GaugeSupplierRequired(name.clone()));
        };
        ht.insert(name.clone(), m.clone());
        Ok(m)
    }

    typed_get_or_create!(counter, Counter, Counter);
    typed_get_or_create!(histogram, Histogram, Histogram);
    typed_get_or_create!(meter, Meter, Meter);
    typed_get_or_create!(throughput_meter, ThroughputMeter, ThroughputMeter);
    typed_get_or_create!(timer, Timer, Timer);
    typed_get_or_create!(throughput_timer, ThroughputTimer, ThroughputTimer);

    /// Register a gauge, the existing one will be returned if already registered.
    pub fn gauge<F>(&self, name: &MetricName, supplier: F) -> Result<Arc<Gauge>, RegistryError>
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.register_gauge(name, || Gauge::new(supplier))
    }

    pub fn register_gauge<F>(
        &self,
        name: &MetricName,
        build: F,
    ) -> Result<Arc<Gauge>, RegistryError>
    where
        F: FnOnce() -> Gauge,
    {
        let m = self.get_or_insert_with(name, MetricKind::Gauge, || {
            Some(AnyMetric::Gauge(Arc::new(build())))
        })?;
        match m {
            AnyMetric::Gauge(g) => Ok(g),
            other => Err(RegistryError::KindMismatch {
                name: name.clone(),
                registered: other.kind(),
                requested: MetricKind::Gauge,
            }),
        }
    }

    /// Remove the metric with this name and all metrics under it.
    ///
    /// Returns the number of removed metrics.
    pub fn remove(&self, prefix: &MetricName) -> usize {
        let mut ht = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        let old_len = ht.len();
        ht.retain(|name, _| !name.starts_with(prefix));
        old_len - ht.len()
    }

    pub fn clear(&self) {
        let mut ht = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        ht.clear();
    }

    fn collect<F>(&self, filter: F) -> Vec<(MetricName, AnyMetric)>
    where
        F: Fn(&MetricName) -> bool,
    {
        let ht = self.metrics.read().unwrap_or_else(PoisonError::into_inner);
        ht.iter()
            .filter(|(name, _)| filter(name))
            .map(|(name, m)| (name.clone(), m.clone()))
            .collect()
    }

    /// Full names of all metrics, in order.
    pub fn names(&self) -> Vec<MetricName> {
        let mut names: Vec<MetricName> = self
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Full names of the metric with this name and all metrics under it, in order.
    pub fn names_with_prefix(&self, prefix: &MetricName) -> Vec<MetricName> {
        let mut names: Vec<MetricName> = self
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Snapshot all metrics under `prefix`, keyed by the name relative to it.
    ///
    /// A metric with exactly the prefix name is keyed by its full name.
    /// The registry lock is released before any metric value is read.
    pub fn snapshot(&self, prefix: &MetricName) -> BTreeMap<String, MetricSnapshot> {
        self.collect(|name| name.starts_with(prefix))
            .into_iter()
            .map(|(name, m)| {
                let key = name.relative_to(prefix).unwrap_or_else(|| name.to_string());
                (key, m.snapshot())
            })
            .collect()
    }

    /// Snapshot all metrics, keyed by their full name.
    pub fn snapshot_all(&self) -> BTreeMap<String, MetricSnapshot> {
        self.collect(|_| true)
            .into_iter()
            .map(|(name, m)| (name.to_string(), m.snapshot()))
            .collect()
    }

    pub fn snapshot_json(&self, prefix: &MetricName) -> Map<String, Value> {
        snapshot_to_json(self.snapshot(prefix))
    }

    pub fn snapshot_all_json(&self) -> Map<String, Value> {
        snapshot_to_json(self.snapshot_all())
    }
}

pub(crate) fn snapshot_to_json(snapshot: BTreeMap<String, MetricSnapshot>) -> Map<String, Value> {
    let mut map = Map::with_capacity(snapshot.len());
    for (k, v) in snapshot {
        map.insert(k, v.to_json());
    }
    map
}

/// Registries shared by name, so that measuring subsystems configured with the
/// same registry name record into the same registry.
#[derive(Default)]
pub struct SharedRegistries {
    inner: Mutex<HashMap<String, Arc<MetricRegistry>, FixedState>>,
}

impl SharedRegistries {
    pub fn get_or_create(&self, name: &str) -> Arc<MetricRegistry> {
        let mut ht = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        ht.entry(name.to_string())
            .or_insert_with(|| Arc::new(MetricRegistry::new()))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<MetricRegistry>> {
        let ht = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        ht.get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Arc<MetricRegistry>> {
        let mut ht = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        ht.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let ht = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = ht.keys().cloned().collect();
        names.sort();
        names
    }
}
