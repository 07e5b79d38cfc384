/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use regex::Regex;

use super::{MatchRuleError, MatchType};
use crate::metrics::NodeName;

/// A rule telling whether a dynamic name value should be tracked.
#[derive(Clone, Debug)]
pub enum MatchRule {
    Exact {
        value: String,
        alias: Option<NodeName>,
    },
    Regex {
        pattern: String,
        regex: Regex,
        alias: Option<NodeName>,
    },
}

impl MatchRule {
    /// An empty value is valid, and only matches the empty candidate.
    pub fn exact(value: &str) -> Result<Self, MatchRuleError> {
        Ok(MatchRule::Exact {
            value: value.to_string(),
            alias: None,
        })
    }

    /// The pattern should match the whole candidate, so it is always anchored.
    pub fn regex(pattern: &str) -> Result<Self, MatchRuleError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(MatchRule::Regex {
            pattern: pattern.to_string(),
            regex,
            alias: None,
        })
    }

    pub fn new(value: &str, match_type: MatchType) -> Result<Self, MatchRuleError> {
        match match_type {
            MatchType::Equals => MatchRule::exact(value),
            MatchType::Regex => MatchRule::regex(value),
        }
    }

    pub fn with_alias(self, alias: &str) -> Result<Self, MatchRuleError> {
        let alias = NodeName::from_str(alias)?;
        Ok(self.set_alias(Some(alias)))
    }

    pub fn set_alias(self, alias: Option<NodeName>) -> Self {
        match self {
            MatchRule::Exact { value, .. } => MatchRule::Exact { value, alias },
            MatchRule::Regex { pattern, regex, .. } => MatchRule::Regex {
                pattern,
                regex,
                alias,
            },
        }
    }

    pub fn match_type(&self) -> MatchType {
        match self {
            MatchRule::Exact { .. } => MatchType::Equals,
            MatchRule::Regex { .. } => MatchType::Regex,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            MatchRule::Exact { value, .. } => value,
            MatchRule::Regex { pattern, .. } => pattern,
        }
    }

    pub fn alias(&self) -> Option<&NodeName> {
        match self {
            MatchRule::Exact { alias, .. } => alias.as_ref(),
            MatchRule::Regex { alias, .. } => alias.as_ref(),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            MatchRule::Exact { value, .. } => value.as_str() == candidate,
            MatchRule::Regex { regex, .. } => regex.is_match(candidate),
        }
    }
}

impl PartialEq for MatchRule {
    fn eq(&self, other: &Self) -> bool {
        self.match_type() == other.match_type()
            && self.value() == other.value()
            && self.alias() == other.alias()
    }
}

impl Eq for MatchRule {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact() {
        let rule = MatchRule::exact("/api/users").unwrap();
        assert!(rule.matches("/api/users"));
        assert!(!rule.matches("/api/users/"));
        assert!(!rule.matches("/API/users"));
        assert!(!rule.matches(""));
    }

    #[test]
    fn empty() {
        let rule = MatchRule::exact("").unwrap();
        assert!(rule.matches(""));
        assert!(!rule.matches(" "));
        assert!(!rule.matches("a"));

        let rule = MatchRule::regex("").unwrap();
        assert!(rule.matches(""));
        assert!(!rule.matches("a"));
    }

    #[test]
    fn regex_anchored() {
        let rule = MatchRule::regex("foo.*").unwrap();
        assert!(rule.matches("foo"));
        assert!(rule.matches("foobar"));
        assert!(!rule.matches("xfoobar"));

        let rule = MatchRule::regex("^foo.*$").unwrap();
        assert!(rule.matches("foobar"));
        assert!(!rule.matches("xfoobar"));

        let rule = MatchRule::regex("a|b").unwrap();
        assert!(rule.matches("a"));
        assert!(!rule.matches("ab"));
    }

    #[test]
    fn regex_invalid() {
        let r = MatchRule::regex("foo(");
        assert!(matches!(r, Err(MatchRuleError::InvalidRegex(_))));
    }

    #[test]
    fn alias() {
        let rule = MatchRule::regex("/users/.*")
            .unwrap()
            .with_alias("users")
            .unwrap();
        assert_eq!(rule.alias().map(|a| a.as_str()), Some("users"));
        assert!(MatchRule::exact("a").unwrap().with_alias("a.b").is_err());
    }

    #[test]
    fn eq() {
        let a = MatchRule::new("x+", MatchType::Regex).unwrap();
        let b = MatchRule::regex("x+").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, MatchRule::exact("x+").unwrap());
    }
}
