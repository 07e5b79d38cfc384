/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use hdrhistogram::{Counter, Histogram};

use crate::Quantile;

/// A point in time copy of the statistics of a histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
    pub quantiles: Vec<(Quantile, u64)>,
}

impl HistogramSnapshot {
    pub const DEFAULT_QUANTILES: [Quantile; 6] = [
        Quantile::MEDIAN,
        Quantile::PCT75,
        Quantile::PCT95,
        Quantile::PCT98,
        Quantile::PCT99,
        Quantile::PCT999,
    ];

    pub fn new<T: Counter>(histogram: &Histogram<T>, quantiles: &[Quantile]) -> Self {
        if histogram.is_empty() {
            return HistogramSnapshot::empty(quantiles);
        }
        HistogramSnapshot {
            count: histogram.len(),
            min: histogram.min(),
            max: histogram.max(),
            mean: histogram.mean(),
            stddev: histogram.stdev(),
            quantiles: quantiles
                .iter()
                .map(|q| (*q, histogram.value_at_quantile(q.value())))
                .collect(),
        }
    }

    pub fn empty(quantiles: &[Quantile]) -> Self {
        HistogramSnapshot {
            count: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            stddev: 0.0,
            quantiles: quantiles.iter().map(|q| (*q, 0)).collect(),
        }
    }

    pub fn quantile(&self, quantile: Quantile) -> Option<u64> {
        self.quantiles
            .iter()
            .find(|(q, _)| *q == quantile)
            .map(|(_, v)| *v)
    }
}
