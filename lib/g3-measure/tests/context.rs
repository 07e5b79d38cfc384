/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use serde_json::json;

use g3_measure::{MeasureContext, Measured, MetricsOptions, SharedRegistries};
use g3_yaml::yaml_doc;

fn options() -> MetricsOptions {
    let yaml = yaml_doc!(
        r#"
            enabled: true
            registry_name: shared
            base_name: app
            monitored_event_bus_handlers:
              - orders
            monitored_http_server_uris:
              - regex: "/users/.*"
                alias: users
        "#
    );
    MetricsOptions::load(&yaml, None).unwrap()
}

#[test]
fn component_flow() {
    let shared = SharedRegistries::default();
    let ctx = MeasureContext::with_shared_registries(options(), &shared).unwrap();
    assert!(Arc::ptr_eq(ctx.registry(), &shared.get("shared").unwrap()));

    let eb = ctx.event_bus_metrics().unwrap();
    let h = eb.handler_registered("orders");
    let handling = eb.begin_handle_message(&h, true);
    eb.end_handle_message(&h, handling);

    let server = ctx.http_server_metrics("localhost", 8080).unwrap();
    let socket = server.tcp().connected("127.0.0.1");
    let req = server.request_begin("GET", "/users/1");
    server.response_end(req, 200);
    server.tcp().disconnected(socket);

    let service = ctx.service();
    let eb_snap = service.snapshot(&eb);
    assert!(eb_snap.contains_key("handlers.orders"));
    assert_eq!(
        service.snapshot_json(&eb)["handlers"],
        json!({"type": "counter", "count": 1})
    );

    let server_snap = service.snapshot_prefix("app.http.servers.localhost:8080");
    assert!(server_snap.contains_key("get-requests.users"));
    assert!(server_snap.contains_key("open-netsockets.127%2E0%2E0%2E1"));

    let names = service.all_metric_names();
    assert!(names.iter().all(|n| n.starts_with("app.")));
    assert!(names.contains("app.eventbus.handlers"));

    let server_names = service.metric_names(&server).len();
    assert_eq!(server.close(), server_names);
    assert!(service.metric_names(&server).is_empty());
    assert!(!service.snapshot(&eb).is_empty());
}

#[test]
fn second_context_shares_registry() {
    let shared = SharedRegistries::default();
    let c1 = MeasureContext::with_shared_registries(options(), &shared).unwrap();
    let c2 = MeasureContext::with_shared_registries(options(), &shared).unwrap();

    let p1 = c1.pool_metrics("worker", "w", 4).unwrap();
    let p2 = c2.pool_metrics("worker", "w", 4).unwrap();
    let task = p1.submitted();
    let usage = p2.begin(task);
    p2.end(usage);

    let snap = c1.service().snapshot(&p1);
    assert_eq!(
        c1.service().snapshot_json(&p1)["queue-size"],
        json!({"type": "counter", "count": 0})
    );
    assert_eq!(snap.len(), 6);
    assert_eq!(p1.metric_base_name(), p2.metric_base_name());
}

#[test]
fn private_registry() {
    let mut opts = options();
    opts.set_base_name("solo".parse().unwrap());
    let ctx = MeasureContext::new(opts).unwrap();
    let rt = ctx.runtime_metrics(4, 20).unwrap();
    rt.verticle_deployed("main");
    let snap = ctx.service().snapshot_all_json();
    assert_eq!(snap["solo.verticles"], json!({"type": "counter", "count": 1}));
    assert_eq!(snap["solo.event-loop-size"], json!({"type": "gauge", "value": 4}));
}

#[test]
fn disabled_creates_nothing() {
    let mut opts = options();
    opts.set_enabled(false);
    let shared = SharedRegistries::default();
    assert!(MeasureContext::with_shared_registries(opts, &shared).is_none());
    assert!(shared.get("shared").is_none());
}
