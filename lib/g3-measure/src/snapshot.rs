/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use serde_json::{Map, Number, Value};

use g3_histogram::{HistogramSnapshot, Quantile};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct MeterSnapshot {
    pub count: u64,
    pub mean_rate: f64,
    pub one_minute_rate: f64,
    pub five_minute_rate: f64,
    pub fifteen_minute_rate: f64,
}

/// Durations in the histogram are in nanoseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerSnapshot {
    pub histogram: HistogramSnapshot,
    pub meter: MeterSnapshot,
}

/// Point in time value of a single metric.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricSnapshot {
    Gauge(Value),
    Counter(i64),
    Histogram(HistogramSnapshot),
    Meter(MeterSnapshot),
    ThroughputMeter(MeterSnapshot, u64),
    Timer(TimerSnapshot),
    ThroughputTimer(TimerSnapshot, u64),
}

fn f64_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn quantile_key(q: Quantile) -> String {
    if q == Quantile::MEDIAN {
        "median".to_string()
    } else {
        q.to_string()
    }
}

fn insert_type(map: &mut Map<String, Value>, t: &str) {
    map.insert("type".to_string(), Value::String(t.to_string()));
}

fn insert_histogram(map: &mut Map<String, Value>, s: &HistogramSnapshot) {
    map.insert("count".to_string(), Value::Number(s.count.into()));
    map.insert("min".to_string(), Value::Number(s.min.into()));
    map.insert("max".to_string(), Value::Number(s.max.into()));
    map.insert("mean".to_string(), f64_value(s.mean));
    map.insert("stddev".to_string(), f64_value(s.stddev));
    for (q, v) in &s.quantiles {
        map.insert(quantile_key(*q), f64_value(*v as f64));
    }
}

fn insert_durations(map: &mut Map<String, Value>, s: &HistogramSnapshot) {
    let ms = |v: u64| f64_value(v as f64 / NANOS_PER_MILLI);
    map.insert("min".to_string(), ms(s.min));
    map.insert("max".to_string(), ms(s.max));
    map.insert("mean".to_string(), f64_value(s.mean / NANOS_PER_MILLI));
    map.insert("stddev".to_string(), f64_value(s.stddev / NANOS_PER_MILLI));
    for (q, v) in &s.quantiles {
        map.insert(quantile_key(*q), ms(*v));
    }
}

fn insert_meter(map: &mut Map<String, Value>, s: &MeterSnapshot) {
    map.insert("count".to_string(), Value::Number(s.count.into()));
    map.insert("meanRate".to_string(), f64_value(s.mean_rate));
    map.insert("oneMinuteRate".to_string(), f64_value(s.one_minute_rate));
    map.insert("fiveMinuteRate".to_string(), f64_value(s.five_minute_rate));
    map.insert(
        "fifteenMinuteRate".to_string(),
        f64_value(s.fifteen_minute_rate),
    );
    map.insert(
        "rate".to_string(),
        Value::String("events/second".to_string()),
    );
}

fn insert_one_second_rate(map: &mut Map<String, Value>, rate: u64) {
    map.insert("oneSecondRate".to_string(), Value::Number(rate.into()));
}

impl MetricSnapshot {
    pub fn type_name(&self) -> &'static str {
        match self {
            MetricSnapshot::Gauge(_) => "gauge",
            MetricSnapshot::Counter(_) => "counter",
            MetricSnapshot::Histogram(_) => "histogram",
            MetricSnapshot::Meter(_) | MetricSnapshot::ThroughputMeter(..) => "meter",
            MetricSnapshot::Timer(_) | MetricSnapshot::ThroughputTimer(..) => "timer",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(20);
        insert_type(&mut map, self.type_name());
        match self {
            MetricSnapshot::Gauge(v) => {
                map.insert("value".to_string(), v.clone());
            }
            MetricSnapshot::Counter(c) => {
                map.insert("count".to_string(), Value::Number((*c).into()));
            }
            MetricSnapshot::Histogram(h) => insert_histogram(&mut map, h),
            MetricSnapshot::Meter(m) => insert_meter(&mut map, m),
            MetricSnapshot::ThroughputMeter(m, rate) => {
                insert_meter(&mut map, m);
                insert_one_second_rate(&mut map, *rate);
            }
            MetricSnapshot::Timer(t) => {
                insert_durations(&mut map, &t.histogram);
                insert_meter(&mut map, &t.meter);
            }
            MetricSnapshot::ThroughputTimer(t, rate) => {
                insert_durations(&mut map, &t.histogram);
                insert_meter(&mut map, &t.meter);
                insert_one_second_rate(&mut map, *rate);
            }
        }
        Value::Object(map)
    }
}
