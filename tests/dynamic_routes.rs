//! End-to-end route table behavior against a SQLite route store.

use std::sync::Arc;
use std::time::Duration;

use route_locator::config::StoreConfig;
use route_locator::lifecycle::{Gateway, Shutdown};
use route_locator::refresh::{RefreshEvent, RefreshOutcome, RefreshSource, SignalDisposition};
use route_locator::routing::RouteTarget;
use route_locator::store::SqlRouteStore;

mod common;

async fn sql_gateway(prefix: &str) -> (Gateway, route_locator::refresh::RefreshWorker, sqlx::AnyPool) {
    let pool = common::memory_pool().await;
    let store = SqlRouteStore::from_pool(pool.clone(), &StoreConfig::default());
    let (gateway, worker) =
        Gateway::assemble(&common::config_with_legacy(prefix), Arc::new(store)).await;
    (gateway, worker, pool)
}

#[tokio::test]
async fn test_new_row_resolves_after_refresh() {
    let (gateway, _worker, pool) = sql_gateway("").await;
    assert!(gateway.resolver.resolve("/orders/42").is_none());

    common::insert_route(&pool, 1, "orders", "orders/**", "orders-svc", "").await;

    // Not visible until a refresh runs.
    assert!(gateway.resolver.resolve("/orders/42").is_none());

    let outcome = gateway.controller.trigger().await;
    assert_eq!(
        outcome,
        RefreshOutcome::Published {
            generation: 2,
            routes: 2,
            degraded: false
        }
    );

    let route = gateway.resolver.resolve("/orders/42").unwrap();
    assert_eq!(route.id, "orders");
    assert_eq!(route.key, "/orders/**");
    assert_eq!(route.path, "/42");
    assert_eq!(route.target, RouteTarget::Service("orders-svc".into()));
    assert_eq!(route.generation, 2);
}

#[tokio::test]
async fn test_persisted_route_overrides_static_until_disabled() {
    let (gateway, _worker, pool) = sql_gateway("").await;

    let before = gateway.resolver.resolve("/legacy/x").unwrap();
    assert_eq!(before.target, RouteTarget::Url("http://legacy.internal".into()));

    common::insert_route(&pool, 7, "legacy-new", "/legacy/**", "", "http://new-host").await;
    gateway.controller.trigger().await;

    let table = gateway.controller.current_table();
    assert_eq!(table.len(), 1);
    let overridden = gateway.resolver.resolve("/legacy/x").unwrap();
    assert_eq!(overridden.target, RouteTarget::Url("http://new-host".into()));
    assert_eq!(overridden.id, "legacy-new");

    common::set_status(&pool, 7, 0).await;
    gateway.controller.trigger().await;

    let restored = gateway.resolver.resolve("/legacy/x").unwrap();
    assert_eq!(restored.target, RouteTarget::Url("http://legacy.internal".into()));
}

#[tokio::test]
async fn test_global_prefix_applied_to_dynamic_routes() {
    let (gateway, _worker, pool) = sql_gateway("/api").await;
    common::insert_route(&pool, 1, "orders", "/orders/**", "orders-svc", "").await;
    gateway.controller.trigger().await;

    let keys: Vec<String> = gateway
        .controller
        .current_table()
        .keys()
        .map(str::to_string)
        .collect();
    assert_eq!(keys, vec!["/api/legacy/**", "/api/orders/**"]);

    let route = gateway.resolver.resolve("/api/orders/7/items").unwrap();
    assert_eq!(route.prefix, "/api/orders");
    assert_eq!(route.path, "/7/items");
    assert!(gateway.resolver.resolve("/orders/7").is_none());
}

#[tokio::test]
async fn test_store_outage_degrades_to_static_routes() {
    let (gateway, _worker, pool) = sql_gateway("").await;
    common::insert_route(&pool, 1, "orders", "/orders/**", "orders-svc", "").await;
    gateway.controller.trigger().await;
    assert_eq!(gateway.controller.current_table().len(), 2);

    sqlx::query("DROP TABLE gateway_route").execute(&pool).await.unwrap();

    let outcome = gateway.controller.trigger().await;
    assert!(matches!(outcome, RefreshOutcome::Published { degraded: true, .. }));

    let table = gateway.controller.current_table();
    assert!(table.is_degraded());
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["/legacy/**"]);
    assert!(table.records().is_empty());
    assert!(gateway.resolver.resolve("/legacy/a").is_some());
    assert!(gateway.resolver.resolve("/orders/1").is_none());
}

#[tokio::test]
async fn test_refresh_signal_through_worker() {
    let (gateway, worker, pool) = sql_gateway("").await;
    let shutdown = Shutdown::new();
    let task = tokio::spawn(worker.run(shutdown.subscribe()));

    common::insert_route(&pool, 1, "orders", "/orders/**", "orders-svc", "").await;
    let disposition = gateway
        .refresh
        .on_remote_refresh_signal(RefreshEvent::remote("instance-b"));
    assert_eq!(disposition, SignalDisposition::Queued);

    let resolver = gateway.resolver.clone();
    assert!(
        common::eventually(Duration::from_secs(5), || resolver.resolve("/orders/1").is_some())
            .await
    );

    shutdown.trigger();
    task.await.unwrap();

    assert_eq!(
        gateway.refresh.request(RefreshEvent::new(RefreshSource::Admin)),
        SignalDisposition::Closed
    );
}
