/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use g3_types::matcher::MatchRuleSet;
use g3_types::metrics::MetricName;

use super::log_registry_error;
use crate::metric::{Counter, Meter, ThroughputMeter, Timer};
use crate::{MeasureError, Measured, MetricRegistry, monitored_node};

/// A throughput meter with its local and remote variants.
struct LocalRemoteMeters {
    all: Arc<ThroughputMeter>,
    local: Arc<ThroughputMeter>,
    remote: Arc<ThroughputMeter>,
}

impl LocalRemoteMeters {
    fn new(registry: &MetricRegistry, base: &MetricName, path: &str) -> Result<Self, MeasureError> {
        Ok(LocalRemoteMeters {
            all: registry.throughput_meter(&base.join_path(path)?)?,
            local: registry.throughput_meter(&base.join_path(&format!("{path}-local"))?)?,
            remote: registry.throughput_meter(&base.join_path(&format!("{path}-remote"))?)?,
        })
    }

    fn mark_n(&self, local: bool, n: u64) {
        self.all.mark_n(n);
        if local {
            self.local.mark_n(n);
        } else {
            self.remote.mark_n(n);
        }
    }
}

/// A registered event bus handler.
pub struct HandlerMetric {
    address: String,
    timer: Option<Arc<Timer>>,
}

impl HandlerMetric {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Check whether the handle time of this handler is measured.
    pub fn is_monitored(&self) -> bool {
        self.timer.is_some()
    }
}

/// The handling of one message by a handler.
pub struct MessageHandling {
    start: Duration,
}

pub struct EventBusMetrics {
    registry: Arc<MetricRegistry>,
    base: MetricName,
    handler_rules: MatchRuleSet,
    handlers: Arc<Counter>,
    bytes_read: Arc<Meter>,
    bytes_written: Arc<Meter>,
    pending: Arc<Counter>,
    pending_local: Arc<Counter>,
    pending_remote: Arc<Counter>,
    received: LocalRemoteMeters,
    delivered: LocalRemoteMeters,
    sent: LocalRemoteMeters,
    published: LocalRemoteMeters,
    reply_failures: Arc<Meter>,
}

impl EventBusMetrics {
    /// Metrics under `<root>.eventbus`.
    pub fn new(
        registry: Arc<MetricRegistry>,
        root: &MetricName,
        handler_rules: MatchRuleSet,
    ) -> Result<Self, MeasureError> {
        let base = root.join_path("eventbus")?;
        let r = registry.as_ref();
        Ok(EventBusMetrics {
            handlers: r.counter(&base.join_path("handlers")?)?,
            bytes_read: r.meter(&base.join_path("messages.bytes-read")?)?,
            bytes_written: r.meter(&base.join_path("messages.bytes-written")?)?,
            pending: r.counter(&base.join_path("messages.pending")?)?,
            pending_local: r.counter(&base.join_path("messages.pending-local")?)?,
            pending_remote: r.counter(&base.join_path("messages.pending-remote")?)?,
            received: LocalRemoteMeters::new(r, &base, "messages.received")?,
            delivered: LocalRemoteMeters::new(r, &base, "messages.delivered")?,
            sent: LocalRemoteMeters::new(r, &base, "messages.sent")?,
            published: LocalRemoteMeters::new(r, &base, "messages.published")?,
            reply_failures: r.meter(&base.join_path("messages.reply-failures")?)?,
            registry,
            base,
            handler_rules,
        })
    }

    pub fn handler_registered(&self, address: &str) -> HandlerMetric {
        self.handlers.inc();
        let timer = monitored_node(&self.handler_rules, address).and_then(|node| {
            let name = self.base.join_path("handlers").ok()?.child(node);
            log_registry_error(self.registry.timer(&name))
        });
        if timer.is_none() {
            debug!("event bus handler {address} is not monitored");
        }
        HandlerMetric {
            address: address.to_string(),
            timer,
        }
    }

    pub fn handler_unregistered(&self, _handler: HandlerMetric) {
        self.handlers.dec();
    }

    pub fn message_sent(&self, publish: bool, local: bool) {
        if publish {
            self.published.mark_n(local, 1);
        } else {
            self.sent.mark_n(local, 1);
        }
    }

    /// A message is received and will be delivered to `handlers` handlers.
    pub fn message_received(&self, local: bool, handlers: usize) {
        let n = handlers as u64;
        self.pending.inc_by(handlers as i64);
        if local {
            self.pending_local.inc_by(handlers as i64);
        } else {
            self.pending_remote.inc_by(handlers as i64);
        }
        self.received.mark_n(local, 1);
        if handlers > 0 {
            self.delivered.mark_n(local, n);
        }
    }

    pub fn begin_handle_message(&self, _handler: &HandlerMetric, local: bool) -> MessageHandling {
        self.pending.dec();
        if local {
            self.pending_local.dec();
        } else {
            self.pending_remote.dec();
        }
        MessageHandling {
            start: self.registry.clock().now(),
        }
    }

    pub fn end_handle_message(&self, handler: &HandlerMetric, handling: MessageHandling) {
        if let Some(timer) = &handler.timer {
            let elapsed = self.registry.clock().now().saturating_sub(handling.start);
            timer.update(elapsed);
        }
    }

    pub fn message_read(&self, bytes: u64) {
        self.bytes_read.mark_n(bytes);
    }

    pub fn message_written(&self, bytes: u64) {
        self.bytes_written.mark_n(bytes);
    }

    pub fn reply_failure(&self) {
        self.reply_failures.mark();
    }

    pub fn close(&self) -> usize {
        self.registry.remove(&self.base)
    }
}

impl Measured for EventBusMetrics {
    fn metric_base_name(&self) -> &MetricName {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MetricSnapshot};
    use g3_types::matcher::MatchRule;
    use std::str::FromStr;

    fn setup(clock: Arc<ManualClock>) -> (Arc<MetricRegistry>, EventBusMetrics) {
        let registry = Arc::new(MetricRegistry::with_clock(clock));
        let rules = MatchRuleSet::from(vec![
            MatchRule::exact("orders.new").unwrap(),
            MatchRule::regex("users\\..*")
                .unwrap()
                .with_alias("users")
                .unwrap(),
        ]);
        let root = MetricName::from_str("vertx").unwrap();
        let eb = EventBusMetrics::new(registry.clone(), &root, rules).unwrap();
        (registry, eb)
    }

    #[test]
    fn handlers() {
        let clock = Arc::new(ManualClock::default());
        let (registry, eb) = setup(clock.clone());

        let h1 = eb.handler_registered("orders.new");
        let h2 = eb.handler_registered("users.create");
        let h3 = eb.handler_registered("other");
        assert!(h1.is_monitored());
        assert!(h2.is_monitored());
        assert!(!h3.is_monitored());
        assert_eq!(h3.address(), "other");

        eb.message_received(true, 1);
        let handling = eb.begin_handle_message(&h1, true);
        clock.advance(Duration::from_millis(5));
        eb.end_handle_message(&h1, handling);

        let snap = registry.snapshot(eb.metric_base_name());
        assert_eq!(snap["handlers"], MetricSnapshot::Counter(3));
        assert!(snap.contains_key("handlers.orders%2Enew"));
        assert!(snap.contains_key("handlers.users"));
        assert!(!snap.keys().any(|k| k.contains("other")));
        let MetricSnapshot::Timer(t) = &snap["handlers.orders%2Enew"] else {
            panic!("not a timer");
        };
        assert_eq!(t.meter.count, 1);
        assert_eq!(snap["messages.pending"], MetricSnapshot::Counter(0));

        eb.handler_unregistered(h1);
        eb.handler_unregistered(h2);
        eb.handler_unregistered(h3);
        let snap = registry.snapshot(eb.metric_base_name());
        assert_eq!(snap["handlers"], MetricSnapshot::Counter(0));
    }

    #[test]
    fn messages() {
        let clock = Arc::new(ManualClock::new(Duration::from_secs(10)));
        let (registry, eb) = setup(clock.clone());

        eb.message_sent(false, true);
        eb.message_sent(false, false);
        eb.message_sent(true, true);
        eb.message_received(false, 2);
        eb.message_received(true, 0);
        eb.message_read(128);
        eb.message_written(64);
        eb.reply_failure();

        let snap = registry.snapshot(eb.metric_base_name());
        let count = |key: &str| match &snap[key] {
            MetricSnapshot::ThroughputMeter(m, _) | MetricSnapshot::Meter(m) => m.count,
            other => panic!("unexpected {other:?} for {key}"),
        };
        assert_eq!(count("messages.sent"), 2);
        assert_eq!(count("messages.sent-local"), 1);
        assert_eq!(count("messages.sent-remote"), 1);
        assert_eq!(count("messages.published"), 1);
        assert_eq!(count("messages.published-local"), 1);
        assert_eq!(count("messages.published-remote"), 0);
        assert_eq!(count("messages.received"), 2);
        assert_eq!(count("messages.received-local"), 1);
        assert_eq!(count("messages.delivered"), 2);
        assert_eq!(count("messages.delivered-remote"), 2);
        assert_eq!(count("messages.delivered-local"), 0);
        assert_eq!(count("messages.bytes-read"), 128);
        assert_eq!(count("messages.bytes-written"), 64);
        assert_eq!(count("messages.reply-failures"), 1);
        assert_eq!(snap["messages.pending"], MetricSnapshot::Counter(2));
        assert_eq!(snap["messages.pending-remote"], MetricSnapshot::Counter(2));
        assert_eq!(snap["messages.pending-local"], MetricSnapshot::Counter(0));

        // 1 counter + 4 * 3 throughput meters + 3 meters + 3 pending counters
        assert_eq!(eb.close(), 19);
        assert!(registry.is_empty());
    }
}
