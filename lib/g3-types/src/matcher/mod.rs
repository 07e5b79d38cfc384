/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use thiserror::Error;

mod rule;
pub use rule::MatchRule;

mod set;
pub use set::MatchRuleSet;

#[derive(Debug, Error)]
pub enum MatchRuleError {
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
    #[error("invalid alias: {0}")]
    InvalidAlias(#[from] crate::metrics::ParseError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchType {
    Equals,
    Regex,
}

impl FromStr for MatchType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equals" | "equal" | "exact" => Ok(MatchType::Equals),
            "regex" => Ok(MatchType::Regex),
            _ => Err(()),
        }
    }
}
