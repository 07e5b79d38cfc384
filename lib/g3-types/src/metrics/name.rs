/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt::{self, Write};
use std::str::FromStr;

use super::{NAME_SEPARATOR, NodeName, ParseError};

/// A hierarchical metric name, displayed as nodes joined by '.'.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricName {
    nodes: Vec<NodeName>,
}

impl MetricName {
    pub fn from_node(node: NodeName) -> Self {
        MetricName { nodes: vec![node] }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeName] {
        &self.nodes
    }

    #[inline]
    pub fn push(&mut self, node: NodeName) {
        self.nodes.push(node);
    }

    /// Append all nodes of a static dotted path, such as `messages.bytes-read`.
    ///
    /// Nothing is appended if any node in the path is invalid.
    pub fn push_path(&mut self, path: &str) -> Result<(), ParseError> {
        if path.is_empty() {
            return Err(ParseError::EmptyString);
        }
        let mut nodes = Vec::with_capacity(4);
        for (i, s) in path.split(NAME_SEPARATOR).enumerate() {
            if s.is_empty() {
                return Err(ParseError::EmptyNode(i));
            }
            nodes.push(NodeName::from_str(s)?);
        }
        self.nodes.extend(nodes);
        Ok(())
    }

    pub fn child(&self, node: NodeName) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        MetricName { nodes }
    }

    pub fn join_path(&self, path: &str) -> Result<Self, ParseError> {
        let mut name = self.clone();
        name.push_path(path)?;
        Ok(name)
    }

    pub fn join(&self, other: &MetricName) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + other.nodes.len());
        nodes.extend_from_slice(&self.nodes);
        nodes.extend_from_slice(&other.nodes);
        MetricName { nodes }
    }

    /// Check whether this name equals `prefix` or lives under it.
    pub fn starts_with(&self, prefix: &MetricName) -> bool {
        self.nodes.starts_with(&prefix.nodes)
    }

    /// Get the nodes after `prefix`, empty if this name equals `prefix`.
    pub fn strip_prefix(&self, prefix: &MetricName) -> Option<&[NodeName]> {
        self.nodes.strip_prefix(prefix.nodes.as_slice())
    }

    /// Get the dotted name relative to `prefix`, if this name lives strictly
    /// under it.
    pub fn relative_to(&self, prefix: &MetricName) -> Option<String> {
        match self.strip_prefix(prefix) {
            Some(nodes) if !nodes.is_empty() => Some(NodesDisplay(nodes).to_string()),
            _ => None,
        }
    }

    pub fn display(&self) -> MetricNameDisplay<'_> {
        MetricNameDisplay {
            nodes: NodesDisplay(&self.nodes),
        }
    }
}

impl From<NodeName> for MetricName {
    fn from(node: NodeName) -> Self {
        MetricName::from_node(node)
    }
}

impl FromStr for MetricName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut name = MetricName::default();
        name.push_path(s)?;
        Ok(name)
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        NodesDisplay(&self.nodes).fmt(f)
    }
}

struct NodesDisplay<'a>(&'a [NodeName]);

impl fmt::Display for NodesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        let Some(n) = iter.next() else {
            return Ok(());
        };
        f.write_str(n.as_str())?;
        for n in iter {
            f.write_char(NAME_SEPARATOR)?;
            f.write_str(n.as_str())?;
        }
        Ok(())
    }
}

pub struct MetricNameDisplay<'a> {
    nodes: NodesDisplay<'a>,
}

impl fmt::Display for MetricNameDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.nodes.fmt(f)
    }
}
