/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use g3_types::matcher::MatchRuleSet;
use g3_types::metrics::NodeName;

/// Check if metrics should be recorded for this dynamic value.
///
/// Nothing is monitored by an empty rule set.
#[inline]
pub fn should_monitor(rules: &MatchRuleSet, candidate: &str) -> bool {
    rules.matches(candidate)
}

/// Get the node to use in metric names for this dynamic value, if monitored.
#[inline]
pub fn monitored_node(rules: &MatchRuleSet, candidate: &str) -> Option<NodeName> {
    rules.check(candidate)
}
