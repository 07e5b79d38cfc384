/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use log::warn;

use g3_types::matcher::MatchRuleSet;
use g3_types::metrics::MetricName;

use super::http_server::RequestMetric;
use super::tcp::client_base;
use super::{RESPONSE_CLASS_NAMES, TcpMetrics, response_class};
use crate::metric::{Counter, Gauge, Meter, ThroughputTimer, Timer};
use crate::{MeasureError, Measured, MetricRegistry, monitored_node};

/// A request waiting for a connection of an endpoint.
pub struct QueuedRequest {
    start: Duration,
}

/// A request sent on a connection of an endpoint.
pub struct EndpointRequest {
    start: Duration,
}

/// Metrics of a monitored endpoint, under `<client>.endpoint.<host:port>`.
pub struct EndpointMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    queue_delay: Arc<Timer>,
    queue_size: Arc<Counter>,
    open_sockets: Arc<Counter>,
    usage: Arc<Timer>,
    in_use: Arc<Counter>,
    ttfb: Arc<Timer>,
}

impl EndpointMetrics {
    fn new(registry: Arc<MetricRegistry>, base: MetricName) -> Result<Self, MeasureError> {
        Ok(EndpointMetrics {
            queue_delay: registry.timer(&base.join_path("queue-delay")?)?,
            queue_size: registry.counter(&base.join_path("queue-size")?)?,
            open_sockets: registry.counter(&base.join_path("open-netsockets")?)?,
            usage: registry.timer(&base.join_path("usage")?)?,
            in_use: registry.counter(&base.join_path("in-use")?)?,
            ttfb: registry.timer(&base.join_path("ttfb")?)?,
            registry,
            base,
        })
    }

    fn elapsed(&self, start: Duration) -> Duration {
        self.registry.clock().now().saturating_sub(start)
    }

    pub fn enqueue(&self) -> QueuedRequest {
        self.queue_size.inc();
        QueuedRequest {
            start: self.registry.clock().now(),
        }
    }

    pub fn dequeue(&self, queued: QueuedRequest) {
        self.queue_size.dec();
        self.queue_delay.update(self.elapsed(queued.start));
    }

    pub fn connected(&self) {
        self.open_sockets.inc();
    }

    pub fn disconnected(&self) {
        self.open_sockets.dec();
    }

    pub fn request_begin(&self) -> EndpointRequest {
        self.in_use.inc();
        EndpointRequest {
            start: self.registry.clock().now(),
        }
    }

    /// The first byte of the response is received.
    pub fn response_begin(&self, request: &EndpointRequest) {
        self.ttfb.update(self.elapsed(request.start));
    }

    pub fn response_end(&self, request: EndpointRequest) {
        self.in_use.dec();
        self.usage.update(self.elapsed(request.start));
    }

    pub fn close(&self) -> usize {
        self.registry.remove(&self.base)
    }
}

impl Measured for EndpointMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}

pub struct HttpClientMetrics {
    tcp: TcpMetrics,
    requests: Arc<ThroughputTimer>,
    responses: [Arc<Meter>; 5],
    open_websockets: Arc<Counter>,
    uri_rules: MatchRuleSet,
    endpoint_rules: MatchRuleSet,
}

impl HttpClientMetrics {
    /// Metrics under `<root>.http.clients`, or `<root>.http.clients.<id>`
    /// if the id is not empty.
    pub fn new(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        id: Option<&str>,
        max_pool_size: usize,
        uri_rules: MatchRuleSet,
        endpoint_rules: MatchRuleSet,
    ) -> Result<Self, MeasureError> {
        let base = client_base(root, "http.clients", id)?;
        let requests = registry.throughput_timer(&base.join_path("requests")?)?;
        let responses = [
            registry.meter(&base.join_path(RESPONSE_CLASS_NAMES[0])?)?,
            registry.meter(&base.join_path(RESPONSE_CLASS_NAMES[1])?)?,
            registry.meter(&base.join_path(RESPONSE_CLASS_NAMES[2])?)?,
            registry.meter(&base.join_path(RESPONSE_CLASS_NAMES[3])?)?,
            registry.meter(&base.join_path(RESPONSE_CLASS_NAMES[4])?)?,
        ];
        let open_websockets = registry.counter(&base.join_path("open-websockets")?)?;
        let tcp = TcpMetrics::new(registry.clone(), base.clone())?;

        registry.register_gauge(&base.join_path("connections.max-pool-size")?, || {
            Gauge::with_value(max_pool_size)
        })?;
        let open_sockets = tcp.open_sockets_counter().clone();
        let max = max_pool_size as f64;
        registry.register_gauge(&base.join_path("connections.pool-ratio")?, move || {
            Gauge::ratio(move || open_sockets.count() as f64, move || max)
        })?;

        Ok(HttpClientMetrics {
            tcp,
            requests,
            responses,
            open_websockets,
            uri_rules,
            endpoint_rules,
        })
    }

    pub fn tcp(&self) -> &TcpMetrics {
        &self.tcp
    }

    /// Get the metrics of an endpoint, if it is monitored.
    pub fn endpoint(&self, host: &str, port: u16) -> Option<EndpointMetrics> {
        let node = monitored_node(&self.endpoint_rules, &format!("{host}:{port}"))?;
        let base = self
            .tcp
            .metric_base_name()
            .join_path("endpoint")
            .ok()?
            .child(node);
        match EndpointMetrics::new(self.tcp.registry().clone(), base) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("endpoint metrics for {host}:{port} skipped: {e}");
                None
            }
        }
    }

    pub fn request_begin(&self, method: &str, uri: &str) -> RequestMetric {
        let uri = monitored_node(&self.uri_rules, uri);
        RequestMetric::new(method, uri, self.tcp.registry().clock().now())
    }

    pub fn response_end(&self, request: RequestMetric, status: u16) {
        request.record(
            self.tcp.registry(),
            self.tcp.metric_base_name(),
            &self.requests,
        );
        if let Some(i) = response_class(status) {
            self.responses[i].mark();
        }
    }

    pub fn websocket_connected(&self) {
        self.open_websockets.inc();
    }

    pub fn websocket_disconnected(&self) {
        self.open_websockets.dec();
    }

    pub fn close(&self) -> usize {
        self.tcp.close()
    }
}

impl Measured for HttpClientMetrics {
    fn metric_base_name(&self) -> &MetricName {
        self.tcp.metric_base_name()
    }
}
