/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod node;
pub use node::NodeName;

mod name;
pub use name::{MetricName, MetricNameDisplay};

/// The delimiter between two nodes of a metric name.
pub const NAME_SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty string")]
    EmptyString,
    #[error("empty node at position {0}")]
    EmptyNode(usize),
    #[error("separator char '.' is not allowed in a single node")]
    SeparatorInNode,
    #[error("invalid char {0:?}")]
    InvalidChar(char),
}

fn chars_allowed_in_node(s: &str) -> Result<(), ParseError> {
    if s.is_empty() {
        return Err(ParseError::EmptyString);
    }
    for c in s.chars() {
        if c == NAME_SEPARATOR {
            return Err(ParseError::SeparatorInNode);
        }
        if c.is_control() || c.is_whitespace() {
            return Err(ParseError::InvalidChar(c));
        }
    }
    Ok(())
}
