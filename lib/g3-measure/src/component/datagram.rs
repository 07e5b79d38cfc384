/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, OnceLock};

use log::debug;

use g3_types::metrics::MetricName;

use super::{host_port_node, log_registry_error};
use crate::metric::{Counter, Histogram};
use crate::{MeasureError, Measured, MetricRegistry};

struct Listening {
    base: MetricName,
    bytes_read: Arc<Histogram>,
}

/// Metrics of a datagram socket, under `<root>.datagram`.
///
/// All datagram sockets share the same base name, so only the metrics of the
/// listening address are removed when the socket is closed.
pub struct DatagramMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    sockets: Arc<Counter>,
    exceptions: Arc<Counter>,
    bytes_written: Arc<Histogram>,
    listening: OnceLock<Listening>,
}

impl DatagramMetrics {
    pub fn new(registry: Arc<MetricRegistry>, root: &MetricName) -> Result<Self, MeasureError> {
        let base = root.join_path("datagram")?;
        let sockets = registry.counter(&base.join_path("sockets")?)?;
        let exceptions = registry.counter(&base.join_path("exceptions")?)?;
        let bytes_written = registry.histogram(&base.join_path("bytes-written")?)?;
        sockets.inc();
        Ok(DatagramMetrics {
            registry,
            base,
            sockets,
            exceptions,
            bytes_written,
            listening: OnceLock::new(),
        })
    }

    /// The socket is bound to `host:port`, only the first call takes effect.
    pub fn listening(&self, host: &str, port: u16) {
        if self.listening.get().is_some() {
            debug!("datagram socket already listening, {host}:{port} ignored");
            return;
        }
        let base = self.base.child(host_port_node(host, port));
        let Ok(name) = base.join_path("bytes-read") else {
            return;
        };
        let Some(bytes_read) = log_registry_error(self.registry.histogram(&name)) else {
            return;
        };
        if let Err(lost) = self.listening.set(Listening { base, bytes_read }) {
            // a concurrent call won, drop what was registered for this one
            let won = self.listening.get().map(|l| &l.base);
            if won != Some(&lost.base) {
                debug!("datagram socket already listening, {host}:{port} ignored");
                self.registry.remove(&lost.base);
            }
        }
    }

    /// Bytes received, ignored if the socket is not listening.
    pub fn bytes_read(&self, n: u64) {
        if let Some(l) = self.listening.get() {
            l.bytes_read.update(n);
        }
    }

    pub fn bytes_written(&self, n: u64) {
        self.bytes_written.update(n);
    }

    pub fn exception_occurred(&self) {
        self.exceptions.inc();
    }

    pub fn close(&self) -> usize {
        self.sockets.dec();
        match self.listening.get() {
            Some(l) => self.registry.remove(&l.base),
            None => 0,
        }
    }
}

impl Measured for DatagramMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricSnapshot;
    use std::str::FromStr;
    use std::thread;

    #[test]
    fn datagram() {
        let registry = Arc::new(MetricRegistry::new());
        let root = MetricName::from_str("vertx").unwrap();
        let d1 = DatagramMetrics::new(registry.clone(), &root).unwrap();
        let d2 = DatagramMetrics::new(registry.clone(), &root).unwrap();

        d1.bytes_read(10);
        d1.listening("localhost", 9000);
        d1.listening("localhost", 9001);
        d1.bytes_read(20);
        d2.bytes_written(30);
        d2.exception_occurred();

        let snap = registry.snapshot(d1.metric_base_name());
        assert_eq!(snap["sockets"], MetricSnapshot::Counter(2));
        assert_eq!(snap["exceptions"], MetricSnapshot::Counter(1));
        let MetricSnapshot::Histogram(h) = &snap["localhost:9000.bytes-read"] else {
            panic!("not a histogram");
        };
        assert_eq!(h.count, 1);
        assert_eq!(h.max, 20);
        assert!(!snap.contains_key("localhost:9001.bytes-read"));

        assert_eq!(d1.close(), 1);
        assert_eq!(d2.close(), 0);
        let snap = registry.snapshot(d1.metric_base_name());
        assert_eq!(snap["sockets"], MetricSnapshot::Counter(0));
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn concurrent_listening() {
        for _ in 0..20 {
            let registry = Arc::new(MetricRegistry::new());
            let root = MetricName::from_str("vertx").unwrap();
            let d = Arc::new(DatagramMetrics::new(registry.clone(), &root).unwrap());
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let d = d.clone();
                    thread::spawn(move || d.listening("localhost", 9000 + i))
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }

            let snap = registry.snapshot(d.metric_base_name());
            let bytes_read = snap.keys().filter(|k| k.ends_with(".bytes-read")).count();
            assert_eq!(bytes_read, 1);
            assert_eq!(d.close(), 1);
            assert_eq!(registry.len(), 3);
        }
    }
}
