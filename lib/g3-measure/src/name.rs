/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use g3_types::metrics::{MetricName, NodeName, ParseError};

/// Build the full name of a metric from the base name of its component.
///
/// `local` is a static dotted path, every node of it should be a valid node
/// name. Dynamic values should use [`compose_dynamic`].
pub fn compose(base: &MetricName, local: &str) -> Result<MetricName, ParseError> {
    base.join_path(local)
}

/// Build the full name of a metric that ends with a dynamic value, such as
/// `open-netsockets.<remote-host>`.
///
/// The value is escaped, so it is always a single node.
pub fn compose_dynamic(
    base: &MetricName,
    local: &str,
    value: &str,
) -> Result<MetricName, ParseError> {
    let mut name = base.join_path(local)?;
    name.push(NodeName::escape(value));
    Ok(name)
}
