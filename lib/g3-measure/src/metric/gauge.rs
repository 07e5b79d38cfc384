/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use serde_json::{Number, Value};

type ValueSupplier = Box<dyn Fn() -> Value + Send + Sync>;

/// A metric whose value is read from a supplier on every snapshot.
pub struct Gauge {
    supplier: ValueSupplier,
}

impl Gauge {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Gauge {
            supplier: Box::new(supplier),
        }
    }

    pub fn with_value<T: Into<Value>>(value: T) -> Self {
        let value = value.into();
        Gauge::new(move || value.clone())
    }

    /// A gauge of `numerator / denominator`.
    ///
    /// The value will be null if the ratio is not a finite number.
    pub fn ratio<N, D>(numerator: N, denominator: D) -> Self
    where
        N: Fn() -> f64 + Send + Sync + 'static,
        D: Fn() -> f64 + Send + Sync + 'static,
    {
        Gauge::new(move || {
            let r = numerator() / denominator();
            Number::from_f64(r).map(Value::Number).unwrap_or(Value::Null)
        })
    }

    pub fn value(&self) -> Value {
        (self.supplier)()
    }
}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn supplier() {
        let size = Arc::new(AtomicUsize::new(4));
        let size_c = size.clone();
        let g = Gauge::new(move || Value::from(size_c.load(Ordering::Relaxed)));
        assert_eq!(g.value(), Value::from(4));
        size.store(8, Ordering::Relaxed);
        assert_eq!(g.value(), Value::from(8));
    }

    #[test]
    fn fixed() {
        let g = Gauge::with_value("localhost");
        assert_eq!(g.value(), Value::String("localhost".to_string()));
    }

    #[test]
    fn ratio() {
        let g = Gauge::ratio(|| 1.0, || 4.0);
        assert_eq!(g.value(), serde_json::json!(0.25));

        let g = Gauge::ratio(|| 1.0, || 0.0);
        assert_eq!(g.value(), Value::Null);
    }
}
