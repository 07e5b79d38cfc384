/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use g3_types::metrics::{MetricName, NodeName};

use super::{dynamic_name, host_port_node, log_registry_error};
use crate::metric::{Counter, Histogram, Timer};
use crate::{MeasureError, Measured, MetricRegistry};

/// Metrics of a tcp server or client, also used by http servers and clients.
pub struct TcpMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    open_sockets: Arc<Counter>,
    connections: Arc<Timer>,
    exceptions: Arc<Counter>,
    bytes_read: Arc<Histogram>,
    bytes_written: Arc<Histogram>,
}

/// A connected socket.
pub struct SocketMetric {
    remote: Option<Arc<Counter>>,
    start: Duration,
}

impl TcpMetrics {
    pub fn new(registry: Arc<MetricRegistry>, base: MetricName) -> Result<Self, MeasureError> {
        let open_sockets = registry.counter(&base.join_path("open-netsockets")?)?;
        let connections = registry.timer(&base.join_path("connections")?)?;
        let exceptions = registry.counter(&base.join_path("exceptions")?)?;
        let bytes_read = registry.histogram(&base.join_path("bytes-read")?)?;
        let bytes_written = registry.histogram(&base.join_path("bytes-written")?)?;
        Ok(TcpMetrics {
            registry,
            base,
            open_sockets,
            connections,
            exceptions,
            bytes_read,
            bytes_written,
        })
    }

    /// `<root>.net.servers.<host>:<port>`
    pub fn net_server(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        host: &str,
        port: u16,
    ) -> Result<Self, MeasureError> {
        let base = root
            .join_path("net.servers")?
            .child(host_port_node(host, port));
        TcpMetrics::new(registry, base)
    }

    /// `<root>.net.clients`, or `<root>.net.clients.<id>` if the id is not empty.
    pub fn net_client(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        id: Option<&str>,
    ) -> Result<Self, MeasureError> {
        let base = client_base(root, "net.clients", id)?;
        TcpMetrics::new(registry, base)
    }

    pub(super) fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn connected(&self, remote_host: &str) -> SocketMetric {
        self.open_sockets.inc();
        let remote = dynamic_name(&self.base, "open-netsockets", remote_host)
            .and_then(|name| log_registry_error(self.registry.counter(&name)));
        if let Some(c) = &remote {
            c.inc();
        }
        SocketMetric {
            remote,
            start: self.registry.clock().now(),
        }
    }

    pub fn disconnected(&self, socket: SocketMetric) {
        self.open_sockets.dec();
        if let Some(c) = socket.remote {
            c.dec();
        }
        let elapsed = self.registry.clock().now().saturating_sub(socket.start);
        self.connections.update(elapsed);
    }

    pub fn bytes_read(&self, n: u64) {
        self.bytes_read.update(n);
    }

    pub fn bytes_written(&self, n: u64) {
        self.bytes_written.update(n);
    }

    pub fn exception_occurred(&self) {
        self.exceptions.inc();
    }

    pub fn open_sockets(&self) -> i64 {
        self.open_sockets.count()
    }

    pub(super) fn open_sockets_counter(&self) -> &Arc<Counter> {
        &self.open_sockets
    }

    /// Remove all metrics of this component.
    pub fn close(&self) -> usize {
        self.registry.remove(&self.base)
    }
}

impl Measured for TcpMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}

pub(super) fn client_base(
    root: &MetricName,
    local: &str,
    id: Option<&str>,
) -> Result<MetricName, MeasureError> {
    let mut base = root.join_path(local)?;
    if let Some(id) = id.filter(|s| !s.is_empty()) {
        base.push(NodeName::escape(id));
    }
    Ok(base)
}
