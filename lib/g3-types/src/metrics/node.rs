/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS};
use smol_str::SmolStr;

use super::{ParseError, chars_allowed_in_node};

/// Chars that will be percent encoded when a dynamic value is used as a node.
///
/// Non-ascii bytes are always encoded by `utf8_percent_encode`.
const DYNAMIC_NODE_PCT_ENCODING_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'.').add(b'%');

/// The node used for an empty dynamic value.
///
/// A single '%' can never be the output of the percent encoding of a non-empty
/// value, as '%' itself is always encoded.
const EMPTY_DYNAMIC_NODE: &str = "%";

/// A single node of a metric name, which never contains the name separator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeName(SmolStr);

impl NodeName {
    /// Build a node from a dynamic value, such as an URI, a remote host or
    /// an event bus address.
    ///
    /// The result is deterministic and reversible by [`NodeName::unescape`].
    pub fn escape(value: &str) -> Self {
        if value.is_empty() {
            return NodeName(SmolStr::new_static(EMPTY_DYNAMIC_NODE));
        }
        let encoded = percent_encoding::utf8_percent_encode(value, DYNAMIC_NODE_PCT_ENCODING_SET);
        NodeName(SmolStr::from(encoded.to_string()))
    }

    /// Get back the original dynamic value of an escaped node.
    pub fn unescape(&self) -> Cow<'_, str> {
        if self.0.as_str() == EMPTY_DYNAMIC_NODE {
            return Cow::Borrowed("");
        }
        percent_encoding::percent_decode_str(self.0.as_str()).decode_utf8_lossy()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for NodeName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        chars_allowed_in_node(s)?;
        Ok(NodeName(s.into()))
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
