/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::slice;

use super::MatchRule;
use crate::metrics::NodeName;

/// An ordered list of match rules. The empty set matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchRuleSet {
    rules: Vec<MatchRule>,
}

impl MatchRuleSet {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> slice::Iter<'_, MatchRule> {
        self.rules.iter()
    }

    /// Find the first rule that matches the candidate.
    pub fn find(&self, candidate: &str) -> Option<&MatchRule> {
        self.rules.iter().find(|r| r.matches(candidate))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.find(candidate).is_some()
    }

    /// Get the name node to use for a monitored candidate.
    ///
    /// This will be the alias of the first matching rule if set, or the
    /// escaped candidate.
    pub fn check(&self, candidate: &str) -> Option<NodeName> {
        let rule = self.find(candidate)?;
        match rule.alias() {
            Some(alias) => Some(alias.clone()),
            None => Some(NodeName::escape(candidate)),
        }
    }
}

impl From<Vec<MatchRule>> for MatchRuleSet {
    fn from(rules: Vec<MatchRule>) -> Self {
        MatchRuleSet { rules }
    }
}

impl FromIterator<MatchRule> for MatchRuleSet {
    fn from_iter<T: IntoIterator<Item = MatchRule>>(iter: T) -> Self {
        MatchRuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatchRuleSet {
    type Item = &'a MatchRule;
    type IntoIter = slice::Iter<'a, MatchRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
