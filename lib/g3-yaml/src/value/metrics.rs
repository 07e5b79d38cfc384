/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

use g3_types::metrics::{MetricName, NodeName};

pub fn as_metric_node_name(v: &Yaml) -> anyhow::Result<NodeName> {
    if let Yaml::String(s) = v {
        NodeName::from_str(s).map_err(|e| anyhow!("invalid metric node name: {e}"))
    } else {
        Err(anyhow!(
            "yaml value type for 'metric node name' should be 'string'"
        ))
    }
}

pub fn as_metric_name(v: &Yaml) -> anyhow::Result<MetricName> {
    if let Yaml::String(s) = v {
        MetricName::from_str(s).map_err(|e| anyhow!("invalid metric name: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'metric name' should be 'string'"))
    }
}
