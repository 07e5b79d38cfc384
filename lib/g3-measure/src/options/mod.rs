/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;

use g3_types::matcher::MatchRuleSet;
use g3_types::metrics::MetricName;

mod yaml;

const DEFAULT_BASE_NAME: &str = "vertx";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsOptions {
    enabled: bool,
    registry_name: Option<String>,
    jmx_enabled: bool,
    jmx_domain: Option<String>,
    config_path: Option<PathBuf>,
    base_name: MetricName,
    monitored_event_bus_handlers: MatchRuleSet,
    monitored_http_server_uris: MatchRuleSet,
    monitored_http_client_uris: MatchRuleSet,
    monitored_http_client_endpoints: MatchRuleSet,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        MetricsOptions {
            enabled: false,
            registry_name: None,
            jmx_enabled: false,
            jmx_domain: None,
            config_path: None,
            base_name: MetricName::from_str(DEFAULT_BASE_NAME).unwrap_or_default(),
            monitored_event_bus_handlers: MatchRuleSet::default(),
            monitored_http_server_uris: MatchRuleSet::default(),
            monitored_http_client_uris: MatchRuleSet::default(),
            monitored_http_client_endpoints: MatchRuleSet::default(),
        }
    }
}

impl MetricsOptions {
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn registry_name(&self) -> Option<&str> {
        self.registry_name.as_deref()
    }

    pub fn set_registry_name(&mut self, name: String) {
        self.registry_name = Some(name);
    }

    #[inline]
    pub fn jmx_enabled(&self) -> bool {
        self.jmx_enabled
    }

    pub fn set_jmx_enabled(&mut self, enabled: bool) {
        self.jmx_enabled = enabled;
    }

    #[inline]
    pub fn jmx_domain(&self) -> Option<&str> {
        self.jmx_domain.as_deref()
    }

    pub fn set_jmx_domain(&mut self, domain: String) {
        self.jmx_domain = Some(domain);
    }

    #[inline]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn set_config_path(&mut self, path: PathBuf) {
        self.config_path = Some(path);
    }

    /// Base name of all runtime metrics, `vertx` by default.
    #[inline]
    pub fn base_name(&self) -> &MetricName {
        &self.base_name
    }

    pub fn set_base_name(&mut self, name: MetricName) {
        self.base_name = name;
    }

    #[inline]
    pub fn monitored_event_bus_handlers(&self) -> &MatchRuleSet {
        &self.monitored_event_bus_handlers
    }

    pub fn set_monitored_event_bus_handlers(&mut self, rules: MatchRuleSet) {
        self.monitored_event_bus_handlers = rules;
    }

    #[inline]
    pub fn monitored_http_server_uris(&self) -> &MatchRuleSet {
        &self.monitored_http_server_uris
    }

    pub fn set_monitored_http_server_uris(&mut self, rules: MatchRuleSet) {
        self.monitored_http_server_uris = rules;
    }

    #[inline]
    pub fn monitored_http_client_uris(&self) -> &MatchRuleSet {
        &self.monitored_http_client_uris
    }

    pub fn set_monitored_http_client_uris(&mut self, rules: MatchRuleSet) {
        self.monitored_http_client_uris = rules;
    }

    #[inline]
    pub fn monitored_http_client_endpoints(&self) -> &MatchRuleSet {
        &self.monitored_http_client_endpoints
    }

    pub fn set_monitored_http_client_endpoints(&mut self, rules: MatchRuleSet) {
        self.monitored_http_client_endpoints = rules;
    }
}
