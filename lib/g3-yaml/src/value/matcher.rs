/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use g3_types::matcher::{MatchRule, MatchRuleSet, MatchType};
use g3_types::metrics::NodeName;

/// Parse a match rule.
///
/// The following forms are supported:
///
///  - a plain string, which is an exact match rule
///  - a map with key `exact` or `regex`, and an optional `alias`
///  - a map with key `value`, an optional `type` (`equals` or `regex`)
///    and an optional `alias`
pub fn as_match_rule(v: &Yaml) -> anyhow::Result<MatchRule> {
    match v {
        Yaml::String(s) => {
            MatchRule::exact(s).map_err(|e| anyhow!("invalid exact match rule: {e}"))
        }
        Yaml::Hash(map) => {
            let mut value: Option<String> = None;
            let mut match_type = MatchType::Equals;
            let mut alias: Option<NodeName> = None;

            crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
                "exact" | "equals" => {
                    value = Some(crate::value::as_string(v)?);
                    match_type = MatchType::Equals;
                    Ok(())
                }
                "regex" => {
                    value = Some(crate::value::as_string(v)?);
                    match_type = MatchType::Regex;
                    Ok(())
                }
                "value" => {
                    value = Some(crate::value::as_string(v)?);
                    Ok(())
                }
                "type" => {
                    let s = crate::value::as_string(v)?;
                    match_type =
                        MatchType::from_str(&s).map_err(|_| anyhow!("invalid match type {s}"))?;
                    Ok(())
                }
                "alias" => {
                    alias = Some(crate::value::as_metric_node_name(v)?);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;

            let Some(value) = value else {
                return Err(anyhow!("no match value set"));
            };
            let rule = MatchRule::new(&value, match_type)
                .map_err(|e| anyhow!("invalid match rule: {e}"))?;
            Ok(rule.set_alias(alias))
        }
        _ => Err(anyhow!(
            "yaml value type for 'match rule' should be 'string' or 'map'"
        )),
    }
}

pub fn as_match_rule_set(v: &Yaml) -> anyhow::Result<MatchRuleSet> {
    let rules = crate::value::as_list(v, as_match_rule).context("invalid match rule list")?;
    Ok(MatchRuleSet::from(rules))
}
