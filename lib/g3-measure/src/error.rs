/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use g3_types::metrics::{MetricName, ParseError};

use crate::MetricKind;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("metric {name} is already registered as {registered}, not {requested}")]
    KindMismatch {
        name: MetricName,
        registered: MetricKind,
        requested: MetricKind,
    },
    #[error("gauge {0} can only be registered with a value supplier")]
    GaugeSupplierRequired(MetricName),
}

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("invalid metric name: {0}")]
    InvalidName(#[from] ParseError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
