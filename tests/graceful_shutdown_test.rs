//! Integration tests for graceful shutdown of the HTTP service
//!
//! These tests verify that:
//! - A shutdown signal stops the listener
//! - The cache is drained once the listener has stopped

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use vehicle_lookup::config::{ServerConfig, ServiceConfig};
use vehicle_lookup::core::cache::ResultCache;
use vehicle_lookup::core::lookup::LookupService;
use vehicle_lookup::domain::{LookupSnapshot, MergeMode, SourceKind, SourceRecord, Vrm};
use vehicle_lookup::server::{self, AppState, ServiceInfo};

fn snapshot(vrm: &str) -> LookupSnapshot {
    let mut record = SourceRecord::new();
    record.insert("Make", "FORD");
    LookupSnapshot {
        vrm: Vrm::new(vrm).unwrap(),
        records: [(SourceKind::Widget, record)].into_iter().collect(),
        sources: vec![SourceKind::Widget],
        elapsed: Duration::from_millis(10),
        created_at: chrono::Utc::now(),
    }
}

fn ephemeral_server() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_enabled: true,
        shutdown_grace_seconds: 1,
    }
}

#[tokio::test]
async fn test_shutdown_signal_stops_server_and_drains_cache() {
    let cache = Arc::new(ResultCache::new(Duration::from_secs(3600), 10));
    cache.put(snapshot("AB12CDE"));
    let service = LookupService::new(
        Vec::new(),
        cache.clone(),
        Duration::from_secs(1),
        MergeMode::Itemized,
    );
    let state = Arc::new(AppState::new(
        Arc::new(service),
        ServiceInfo::from_config(&ServiceConfig::default()),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let config = ephemeral_server();
    let handle = tokio::spawn(async move { server::serve(&config, state, shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cache.len(), 1);

    shutdown_tx.send(true).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();

    assert!(result.is_ok());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_signal_sent_before_start_stops_immediately() {
    let state = Arc::new(AppState::from_config(&ServiceConfig::default()).unwrap());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let config = ephemeral_server();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        server::serve(&config, state, shutdown_rx),
    )
    .await
    .expect("server did not stop");
    assert!(result.is_ok());
}
