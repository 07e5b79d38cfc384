/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use g3_types::metrics::{MetricName, ParseError};

/// Something whose metrics are recorded under a base name.
pub trait Measured {
    fn metric_base_name(&self) -> &MetricName;
}

/// Adapt any base name to [`Measured`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasuredRef {
    base_name: MetricName,
}

impl MeasuredRef {
    pub fn new(base_name: MetricName) -> Self {
        MeasuredRef { base_name }
    }
}

impl Measured for MeasuredRef {
    fn metric_base_name(&self) -> &MetricName {
        &self.base_name
    }
}

impl FromStr for MeasuredRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricName::from_str(s).map(MeasuredRef::new)
    }
}

impl<T: Measured + ?Sized> Measured for &T {
    fn metric_base_name(&self) -> &MetricName {
        (**self).metric_base_name()
    }
}
