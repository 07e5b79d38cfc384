/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use g3_types::matcher::MatchRuleSet;
use g3_types::metrics::{MetricName, NodeName};

use super::{
    RESPONSE_CLASS_NAMES, TcpMetrics, dynamic_name, host_port_node, log_registry_error,
    method_requests_node, response_class,
};
use crate::metric::{Counter, ThroughputMeter, ThroughputTimer};
use crate::{MeasureError, Measured, MetricRegistry, monitored_node};

/// An in flight http request.
pub struct RequestMetric {
    method: Option<NodeName>,
    uri: Option<NodeName>,
    start: Duration,
}

impl RequestMetric {
    pub(super) fn new(method: &str, uri: Option<NodeName>, start: Duration) -> Self {
        RequestMetric {
            method: method_requests_node(method),
            uri,
            start,
        }
    }

    /// Update `requests`, `<method>-requests` and `<method>-requests.<uri>` if monitored.
    ///
    /// Requests with a non standard method are only counted in `requests`.
    pub(super) fn record(
        &self,
        registry: &MetricRegistry,
        base: &MetricName,
        requests: &ThroughputTimer,
    ) {
        let elapsed = registry.clock().now().saturating_sub(self.start);
        requests.update(elapsed);

        let Some(method) = &self.method else {
            return;
        };
        let method_name = base.child(method.clone());
        if let Some(t) = log_registry_error(registry.throughput_timer(&method_name)) {
            t.update(elapsed);
        }
        if let Some(uri) = &self.uri {
            let uri_name = method_name.child(uri.clone());
            if let Some(t) = log_registry_error(registry.throughput_timer(&uri_name)) {
                t.update(elapsed);
            }
        }
    }
}

/// An open web socket.
pub struct WebSocketMetric {
    remote: Option<Arc<Counter>>,
}

pub struct HttpServerMetrics {
    tcp: TcpMetrics,
    requests: Arc<ThroughputTimer>,
    responses: [Arc<ThroughputMeter>; 5],
    open_websockets: Arc<Counter>,
    uri_rules: MatchRuleSet,
}

impl HttpServerMetrics {
    /// Metrics under `<root>.http.servers.<host>:<port>`.
    pub fn new(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        host: &str,
        port: u16,
        uri_rules: MatchRuleSet,
    ) -> Result<Self, MeasureError> {
        let base = root
            .join_path("http.servers")?
            .child(host_port_node(host, port));
        let requests = registry.throughput_timer(&base.join_path("requests")?)?;
        let responses = [
            registry.throughput_meter(&base.join_path(RESPONSE_CLASS_NAMES[0])?)?,
            registry.throughput_meter(&base.join_path(RESPONSE_CLASS_NAMES[1])?)?,
            registry.throughput_meter(&base.join_path(RESPONSE_CLASS_NAMES[2])?)?,
            registry.throughput_meter(&base.join_path(RESPONSE_CLASS_NAMES[3])?)?,
            registry.throughput_meter(&base.join_path(RESPONSE_CLASS_NAMES[4])?)?,
        ];
        let open_websockets = registry.counter(&base.join_path("open-websockets")?)?;
        let tcp = TcpMetrics::new(registry, base)?;
        Ok(HttpServerMetrics {
            tcp,
            requests,
            responses,
            open_websockets,
            uri_rules,
        })
    }

    /// Connection level metrics.
    pub fn tcp(&self) -> &TcpMetrics {
        &self.tcp
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

    pub fn websocket_connected(&self, remote_host: &str) -> WebSocketMetric {
        self.open_websockets.inc();
        let remote = dynamic_name(self.tcp.metric_base_name(), "open-websockets", remote_host)
            .and_then(|name| log_registry_error(self.tcp.registry().counter(&name)));
        if let Some(c) = &remote {
            c.inc();
        }
        WebSocketMetric { remote }
    }

    pub fn websocket_disconnected(&self, ws: WebSocketMetric) {
        self.open_websockets.dec();
        if let Some(c) = ws.remote {
            c.dec();
        }
    }

    pub fn close(&self) -> usize {
        self.tcp.close()
    }
}

impl Measured for HttpServerMetrics {
    fn metric_base_name(&self) -> &MetricName {
        self.tcp.metric_base_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MetricSnapshot};
    use g3_types::matcher::MatchRule;
    use std::str::FromStr;

    fn setup(clock: Arc<ManualClock>) -> (Arc<MetricRegistry>, HttpServerMetrics) {
        let registry = Arc::new(MetricRegistry::with_clock(clock));
        let rules = MatchRuleSet::from(vec![
            MatchRule::exact("/some/uri").unwrap(),
            MatchRule::regex("/users/.*").unwrap().with_alias("users").unwrap(),
        ]);
        let root = MetricName::from_str("vertx").unwrap();
        let server =
            HttpServerMetrics::new(registry.clone(), &root, "0.0.0.0", 8080, rules).unwrap();
        (registry, server)
    }

    #[test]
    fn requests() {
        let clock = Arc::new(ManualClock::new(Duration::from_secs(100)));
        let (registry, server) = setup(clock.clone());
        assert_eq!(
            server.metric_base_name().to_string(),
            "vertx.http.servers.0%2E0%2E0%2E0:8080"
        );

        let r1 = server.request_begin("GET", "/some/uri");
        let r2 = server.request_begin("POST", "/users/42");
        let r3 = server.request_begin("GET", "/other");
        clock.advance(Duration::from_millis(20));
        server.response_end(r1, 200);
        server.response_end(r2, 201);
        server.response_end(r3, 404);

        clock.advance(Duration::from_secs(1));
        let snap = registry.snapshot(server.metric_base_name());
        let MetricSnapshot::ThroughputTimer(t, rate) = &snap["requests"] else {
            panic!("not a throughput timer");
        };
        assert_eq!(t.meter.count, 3);
        assert_eq!(*rate, 3);

        assert!(snap.contains_key("get-requests"));
        assert!(snap.contains_key("post-requests"));
        assert!(snap.contains_key("get-requests./some/uri"));
        assert!(snap.contains_key("post-requests.users"));
        assert!(!snap.keys().any(|k| k.contains("other")));

        let MetricSnapshot::ThroughputMeter(m, _) = &snap["responses-2xx"] else {
            panic!("not a throughput meter");
        };
        assert_eq!(m.count, 2);
        let MetricSnapshot::ThroughputMeter(m, _) = &snap["responses-4xx"] else {
            panic!("not a throughput meter");
        };
        assert_eq!(m.count, 1);
    }

    #[test]
    fn unknown_methods() {
        let clock = Arc::new(ManualClock::default());
        let (registry, server) = setup(clock);
        let before = registry.len();
        for i in 0..1000 {
            let r = server.request_begin(&format!("X{i}"), "/some/uri");
            server.response_end(r, 200);
        }
        assert_eq!(registry.len(), before);

        let snap = registry.snapshot(server.metric_base_name());
        let MetricSnapshot::ThroughputTimer(t, _) = &snap["requests"] else {
            panic!("not a throughput timer");
        };
        assert_eq!(t.meter.count, 1000);

        let r = server.request_begin("delete", "/some/uri");
        server.response_end(r, 204);
        assert_eq!(registry.len(), before + 2);
    }

    #[test]
    fn websockets() {
        let clock = Arc::new(ManualClock::default());
        let (registry, server) = setup(clock);
        let ws = server.websocket_connected("client-host");
        let snap = registry.snapshot(server.metric_base_name());
        assert_eq!(snap["open-websockets"], MetricSnapshot::Counter(1));
        assert_eq!(
            snap["open-websockets.client-host"],
            MetricSnapshot::Counter(1)
        );
        server.websocket_disconnected(ws);
        let snap = registry.snapshot(server.metric_base_name());
        assert_eq!(snap["open-websockets"], MetricSnapshot::Counter(0));

        server.close();
        assert!(registry.is_empty());
    }
}
