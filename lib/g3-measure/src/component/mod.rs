/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Recorders that turn the events of measured components into metric updates.
//!
//! Static metrics are created when the recorder is created. Metrics with a
//! dynamic name node are created on first use, and any failure is logged and
//! the measurement skipped, as metrics should never fail the measured action.

use std::sync::Arc;

use log::{debug, warn};

use g3_types::metrics::{MetricName, NodeName};

use crate::{RegistryError, compose_dynamic};

mod runtime;
pub use runtime::RuntimeMetrics;

mod eventbus;
pub use eventbus::{EventBusMetrics, HandlerMetric, MessageHandling};

mod tcp;
pub use tcp::{SocketMetric, TcpMetrics};

mod http_server;
pub use http_server::{HttpServerMetrics, RequestMetric, WebSocketMetric};

mod http_client;
pub use http_client::{EndpointMetrics, EndpointRequest, HttpClientMetrics, QueuedRequest};

mod datagram;
pub use datagram::DatagramMetrics;

mod pool;
pub use pool::{PoolMetrics, PoolTask, PoolUsage};

const RESPONSE_CLASS_NAMES: [&str; 5] = [
    "responses-1xx",
    "responses-2xx",
    "responses-3xx",
    "responses-4xx",
    "responses-5xx",
];

/// Index into [`RESPONSE_CLASS_NAMES`] for a status code.
fn response_class(status: u16) -> Option<usize> {
    match status / 100 {
        c @ 1..=5 => Some(c as usize - 1),
        _ => None,
    }
}

fn host_port_node(host: &str, port: u16) -> NodeName {
    NodeName::escape(&format!("{host}:{port}"))
}

const HTTP_METHODS: [&str; 9] = [
    "get", "head", "post", "put", "delete", "connect", "options", "trace", "patch",
];

/// `<method>-requests`, with the method in lower case.
///
/// Only the standard http methods get their own metric, so peers can not
/// create an unbounded number of names.
fn method_requests_node(method: &str) -> Option<NodeName> {
    HTTP_METHODS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(method))
        .map(|m| NodeName::escape(&format!("{m}-requests")))
}

fn log_registry_error<T>(r: Result<Arc<T>, RegistryError>) -> Option<Arc<T>> {
    match r {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("metric skipped: {e}");
            None
        }
    }
}

/// Get the full name for `<base>.<local>.<escaped value>`, logging the error if any.
fn dynamic_name(base: &MetricName, local: &str, value: &str) -> Option<MetricName> {
    match compose_dynamic(base, local, value) {
        Ok(name) => Some(name),
        Err(e) => {
            debug!("invalid metric name {base}.{local} for value {value}: {e}");
            None
        }
    }
}
