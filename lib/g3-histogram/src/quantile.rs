/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantileParseError {
    #[error("not a float value")]
    NotFloat,
    #[error("out of range (0, 1]")]
    OutOfRange,
    #[error("too many fraction digits, at most 3 is allowed")]
    TooPrecise,
}

/// A quantile with a precision of 0.001.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantile {
    per_mille: u16,
}

impl Quantile {
    pub const MEDIAN: Quantile = Quantile { per_mille: 500 };
    pub const PCT75: Quantile = Quantile { per_mille: 750 };
    pub const PCT95: Quantile = Quantile { per_mille: 950 };
    pub const PCT98: Quantile = Quantile { per_mille: 980 };
    pub const PCT99: Quantile = Quantile { per_mille: 990 };
    pub const PCT999: Quantile = Quantile { per_mille: 999 };

    pub const fn from_per_mille(per_mille: u16) -> Option<Self> {
        if per_mille == 0 || per_mille > 1000 {
            None
        } else {
            Some(Quantile { per_mille })
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.per_mille as f64 / 1000.0
    }

    #[inline]
    pub fn per_mille(&self) -> u16 {
        self.per_mille
    }
}

impl FromStr for Quantile {
    type Err = QuantileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, frac)) = s.split_once('.') {
            if frac.len() > 3 {
                return Err(QuantileParseError::TooPrecise);
            }
        }
        let f = f64::from_str(s).map_err(|_| QuantileParseError::NotFloat)?;
        if !(f > 0.0 && f <= 1.0) {
            return Err(QuantileParseError::OutOfRange);
        }
        let per_mille = (f * 1000.0).round() as u16;
        Quantile::from_per_mille(per_mille).ok_or(QuantileParseError::OutOfRange)
    }
}

/// Percent label, such as `75%` or `99.9%`.
impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.per_mille / 10;
        let frac = self.per_mille % 10;
        if frac == 0 {
            write!(f, "{int}%")
        } else {
            write!(f, "{int}.{frac}%")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Quantile::from_str("0.75").unwrap(), Quantile::PCT75);
        assert_eq!(Quantile::from_str("0.999").unwrap(), Quantile::PCT999);
        assert_eq!(Quantile::from_str("0.5").unwrap(), Quantile::MEDIAN);
        assert_eq!(Quantile::from_str("1").unwrap().per_mille(), 1000);

        assert_eq!(Quantile::from_str("0"), Err(QuantileParseError::OutOfRange));
        assert_eq!(Quantile::from_str("1.5"), Err(QuantileParseError::OutOfRange));
        assert_eq!(Quantile::from_str("a"), Err(QuantileParseError::NotFloat));
        assert_eq!(
            Quantile::from_str("0.9999"),
            Err(QuantileParseError::TooPrecise)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Quantile::MEDIAN.to_string(), "50%");
        assert_eq!(Quantile::PCT75.to_string(), "75%");
        assert_eq!(Quantile::PCT98.to_string(), "98%");
        assert_eq!(Quantile::PCT999.to_string(), "99.9%");
        assert!((Quantile::PCT999.value() - 0.999).abs() < f64::EPSILON);
    }
}
