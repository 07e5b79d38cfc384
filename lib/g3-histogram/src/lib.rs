/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod recorder;
pub use recorder::HistogramRecorder;

mod keeping;
pub use keeping::KeepingHistogram;

mod snapshot;
pub use snapshot::HistogramSnapshot;

mod quantile;
pub use quantile::{Quantile, QuantileParseError};
