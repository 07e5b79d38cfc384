/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::component::{
    DatagramMetrics, EventBusMetrics, HttpClientMetrics, HttpServerMetrics, PoolMetrics,
    RuntimeMetrics, TcpMetrics,
};
use crate::{MeasureError, MetricRegistry, MetricsOptions, MetricsService, SharedRegistries};

/// Everything needed by the measured components of one runtime instance.
///
/// No context is created if metrics are not enabled in the options, so the
/// runtime should skip measuring entirely in that case.
pub struct MeasureContext {
    options: Arc<MetricsOptions>,
    registry: Arc<MetricRegistry>,
}

impl MeasureContext {
    /// Create a context with its own registry.
    pub fn new(options: MetricsOptions) -> Option<Self> {
        if !options.enabled() {
            debug!("metrics are not enabled");
            return None;
        }
        MeasureContext::with_registry(options, Arc::new(MetricRegistry::new()))
    }

    pub fn with_registry(
        options: MetricsOptions,
        registry: Arc<MetricRegistry>,
    ) -> Option<Self> {
        if !options.enabled() {
            debug!("metrics are not enabled");
            return None;
        }
        if options.jmx_enabled() {
            warn!("JMX export of metrics is not supported, the jmx settings will be ignored");
        }
        Some(MeasureContext {
            options: Arc::new(options),
            registry,
        })
    }

    /// Create a context that uses the registry with the configured name,
    /// or its own registry if no registry name is set.
    pub fn with_shared_registries(
        options: MetricsOptions,
        shared: &SharedRegistries,
    ) -> Option<Self> {
        if !options.enabled() {
            debug!("metrics are not enabled");
            return None;
        }
        let registry = match options.registry_name() {
            Some(name) => {
                debug!("using shared metric registry {name}");
                shared.get_or_create(name)
            }
            None => Arc::new(MetricRegistry::new()),
        };
        MeasureContext::with_registry(options, registry)
    }

    pub fn options(&self) -> &MetricsOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn service(&self) -> MetricsService {
        MetricsService::new(self.registry.clone())
    }

    pub fn runtime_metrics(
        &self,
        event_loop_size: usize,
        worker_pool_size: usize,
    ) -> Result<RuntimeMetrics, MeasureError> {
        RuntimeMetrics::new(
            self.registry.clone(),
            self.options.base_name().clone(),
            event_loop_size,
            worker_pool_size,
        )
    }

    pub fn event_bus_metrics(&self) -> Result<EventBusMetrics, MeasureError> {
        EventBusMetrics::new(
            self.registry.clone(),
            self.options.base_name(),
            self.options.monitored_event_bus_handlers().clone(),
        )
    }

    /// Metrics of a net server listening on `host:port`.
    pub fn net_server_metrics(&self, host: &str, port: u16) -> Result<TcpMetrics, MeasureError> {
        TcpMetrics::net_server(self.registry.clone(), self.options.base_name(), host, port)
    }

    /// Metrics of a net client, the id is set with a non-empty metrics name.
    pub fn net_client_metrics(&self, id: Option<&str>) -> Result<TcpMetrics, MeasureError> {
        TcpMetrics::net_client(self.registry.clone(), self.options.base_name(), id)
    }

    pub fn http_server_metrics(
        &self,
        host: &str,
        port: u16,
    ) -> Result<HttpServerMetrics, MeasureError> {
        HttpServerMetrics::new(
            self.registry.clone(),
            self.options.base_name(),
            host,
            port,
            self.options.monitored_http_server_uris().clone(),
        )
    }

    pub fn http_client_metrics(
        &self,
        id: Option<&str>,
        max_pool_size: usize,
    ) -> Result<HttpClientMetrics, MeasureError> {
        HttpClientMetrics::new(
            self.registry.clone(),
            self.options.base_name(),
            id,
            max_pool_size,
            self.options.monitored_http_client_uris().clone(),
            self.options.monitored_http_client_endpoints().clone(),
        )
    }

    pub fn datagram_metrics(&self) -> Result<DatagramMetrics, MeasureError> {
        DatagramMetrics::new(self.registry.clone(), self.options.base_name())
    }

    /// Metrics of a pool, the max size should be 0 if unknown.
    pub fn pool_metrics(
        &self,
        pool_type: &str,
        pool_name: &str,
        max_size: usize,
    ) -> Result<PoolMetrics, MeasureError> {
        PoolMetrics::new(
            self.registry.clone(),
            self.options.base_name(),
            pool_type,
            pool_name,
            max_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_options() -> MetricsOptions {
        let mut options = MetricsOptions::default();
        options.set_enabled(true);
        options
    }

    #[test]
    fn disabled() {
        assert!(MeasureContext::new(MetricsOptions::default()).is_none());

        let shared = SharedRegistries::default();
        let mut options = MetricsOptions::default();
        options.set_registry_name("disabled".to_string());
        assert!(MeasureContext::with_shared_registries(options, &shared).is_none());
        assert!(shared.get("disabled").is_none());

        let registry = Arc::new(MetricRegistry::new());
        assert!(MeasureContext::with_registry(MetricsOptions::default(), registry).is_none());
    }

    #[test]
    fn enabled() {
        let ctx = MeasureContext::new(enabled_options()).unwrap();
        assert!(ctx.options().enabled());
        assert!(ctx.registry().is_empty());
    }
}
