/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

use super::MetricsOptions;

impl MetricsOptions {
    pub fn parse_yaml(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut options = MetricsOptions::default();
            g3_yaml::foreach_kv(map, |k, v| options.set_by_yaml_kv(k, v, lookup_dir))?;
            Ok(options)
        } else {
            Err(anyhow!(
                "yaml value type for 'metrics options' should be 'map'"
            ))
        }
    }

    /// Parse the options, then merge the settings in the config file if set.
    ///
    /// Settings in the config file override the inline ones.
    pub fn load(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut options = MetricsOptions::parse_yaml(v, lookup_dir)?;
        if let Some(path) = options.config_path.clone() {
            options.merge_file(&path)?;
        }
        Ok(options)
    }

    fn merge_file(&mut self, path: &Path) -> anyhow::Result<()> {
        match g3_yaml::load_doc(path)? {
            Yaml::Hash(map) => self
                .merge_yaml_map(&map, path.parent())
                .context(format!("invalid metrics config file {}", path.display())),
            Yaml::Null => Ok(()),
            _ => Err(anyhow!(
                "the metrics config file {} should contain a map",
                path.display()
            )),
        }
    }

    fn merge_yaml_map(
        &mut self,
        map: &yaml::Hash,
        lookup_dir: Option<&Path>,
    ) -> anyhow::Result<()> {
        g3_yaml::foreach_kv(map, |k, v| match g3_yaml::key::normalize(k).as_str() {
            "config_path" | "config_file" => Err(anyhow!(
                "nested config file is not allowed, found key {k}"
            )),
            _ => self.set_by_yaml_kv(k, v, lookup_dir),
        })
    }

    fn set_by_yaml_kv(
        &mut self,
        k: &str,
        v: &Yaml,
        lookup_dir: Option<&Path>,
    ) -> anyhow::Result<()> {
        match g3_yaml::key::normalize(k).as_str() {
            "enabled" | "enable" => {
                self.enabled = g3_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
            }
            "registry_name" | "registry" => {
                let name = g3_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                self.registry_name = Some(name);
            }
            "jmx_enabled" => {
                self.jmx_enabled = g3_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
            }
            "jmx_domain" => {
                let domain = g3_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                self.jmx_domain = Some(domain);
            }
            "config_path" | "config_file" => {
                let path = g3_yaml::value::as_file_path(v, lookup_dir)
                    .context(format!("invalid file path value for key {k}"))?;
                self.config_path = Some(path);
            }
            "base_name" => {
                self.base_name = g3_yaml::value::as_metric_name(v)
                    .context(format!("invalid metric name value for key {k}"))?;
            }
            "monitored_event_bus_handlers" | "monitored_handlers" => {
                self.monitored_event_bus_handlers = g3_yaml::value::as_match_rule_set(v)
                    .context(format!("invalid match rules value for key {k}"))?;
            }
            "monitored_http_server_uris" | "monitored_server_uris" => {
                self.monitored_http_server_uris = g3_yaml::value::as_match_rule_set(v)
                    .context(format!("invalid match rules value for key {k}"))?;
            }
            "monitored_http_client_uris" | "monitored_client_uris" => {
                self.monitored_http_client_uris = g3_yaml::value::as_match_rule_set(v)
                    .context(format!("invalid match rules value for key {k}"))?;
            }
            "monitored_http_client_endpoints" | "monitored_endpoints" => {
                self.monitored_http_client_endpoints = g3_yaml::value::as_match_rule_set(v)
                    .context(format!("invalid match rules value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}
