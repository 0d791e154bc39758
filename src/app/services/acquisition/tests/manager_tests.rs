//! Tests for cache resolution, retry and cancellation

use super::{MockTransport, Response, STATION, archive_for, gzip};
use crate::Error;
use crate::app::services::acquisition::cache::archive_path;
use crate::app::services::acquisition::{AcquisitionManager, CacheSource};
use crate::config::Config;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn test_config() -> Config {
    Config::default()
        .without_working_dir_lookup()
        .with_retries(2, Duration::from_millis(1))
        .with_request_timeout(Duration::from_secs(30))
        .with_max_concurrent_fetches(4)
}

fn manager(transport: MockTransport, cache: &TempDir) -> AcquisitionManager<MockTransport> {
    AcquisitionManager::new(transport, test_config().with_cache_dir(cache.path()))
}

#[tokio::test]
async fn test_second_resolve_is_served_from_cache() {
    let cache = TempDir::new().unwrap();
    let transport =
        MockTransport::new().with_archive(STATION, 2020, Response::Payload(archive_for(2020)));
    let manager = manager(transport, &cache);

    let first = manager.resolve(STATION, 2020, None).await.unwrap().unwrap();
    assert_eq!(first.entry.source, CacheSource::Fetched);
    assert_eq!(
        first.entry.path.as_deref(),
        Some(archive_path(cache.path(), STATION, 2020).as_path())
    );
    assert!(archive_path(cache.path(), STATION, 2020).exists());

    let second = manager.resolve(STATION, 2020, None).await.unwrap().unwrap();
    assert_eq!(second.entry.source, CacheSource::CacheDir);
    assert_eq!(second.text, first.text);
    assert_eq!(manager.transport().calls(), 1);
}

#[tokio::test]
async fn test_empty_cache_file_is_replaced() {
    let cache = TempDir::new().unwrap();
    let path = archive_path(cache.path(), STATION, 2020);
    std::fs::write(&path, b"").unwrap();

    let transport =
        MockTransport::new().with_archive(STATION, 2020, Response::Payload(archive_for(2020)));
    let manager = manager(transport, &cache);

    let resolved = manager.resolve(STATION, 2020, None).await.unwrap().unwrap();
    assert_eq!(resolved.entry.source, CacheSource::Fetched);
    assert_eq!(resolved.text, "record line for 2020\n");
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    assert_eq!(manager.transport().calls(), 1);
}

#[tokio::test]
async fn test_corrupt_payload_is_not_persisted() {
    let cache = TempDir::new().unwrap();
    let transport = MockTransport::new().with_archive(
        STATION,
        2020,
        Response::Payload(b"<html>maintenance</html>".to_vec()),
    );
    let manager = manager(transport, &cache);

    let result = manager.resolve(STATION, 2020, None).await;
    assert!(matches!(result, Err(Error::CacheCorruption { .. })));
    assert!(!archive_path(cache.path(), STATION, 2020).exists());
}

#[tokio::test]
async fn test_blank_archive_counts_as_corrupt() {
    let cache = TempDir::new().unwrap();
    let transport =
        MockTransport::new().with_archive(STATION, 2020, Response::Payload(gzip("\n  \n")));
    let manager = manager(transport, &cache);

    assert!(matches!(
        manager.resolve(STATION, 2020, None).await,
        Err(Error::CacheCorruption { .. })
    ));
}

#[tokio::test]
async fn test_unpublished_year_resolves_to_none() {
    let cache = TempDir::new().unwrap();
    let manager = manager(MockTransport::new(), &cache);

    let resolved = manager.resolve(STATION, 1950, None).await.unwrap();
    assert!(resolved.is_none());
    assert_eq!(manager.transport().calls(), 1);
    assert!(!archive_path(cache.path(), STATION, 1950).exists());
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let cache = TempDir::new().unwrap();
    let transport = MockTransport::new()
        .with_archive(STATION, 2020, Response::Payload(archive_for(2020)))
        .with_script(vec![Response::Failure("connection reset".to_string())]);
    let manager = manager(transport, &cache);

    let resolved = manager.resolve(STATION, 2020, None).await.unwrap();
    assert!(resolved.is_some());
    assert_eq!(manager.transport().calls(), 2);
}

#[tokio::test]
async fn test_retry_budget_exhausted_is_network_error() {
    let cache = TempDir::new().unwrap();
    let transport = MockTransport::new().with_archive(
        STATION,
        2020,
        Response::Failure("503 Service Unavailable".to_string()),
    );
    let manager = manager(transport, &cache);

    let result = manager.resolve(STATION, 2020, None).await;
    match result {
        Err(Error::Network { message }) => assert!(message.contains("3 attempts")),
        other => panic!("expected network error, got {:?}", other),
    }
    assert_eq!(manager.transport().calls(), 3);
}

#[tokio::test]
async fn test_hung_transport_times_out() {
    let transport = MockTransport::new().with_archive(STATION, 2020, Response::Hang);
    let config = Config::default()
        .without_working_dir_lookup()
        .with_retries(0, Duration::from_millis(1))
        .with_request_timeout(Duration::from_secs(1));
    let manager = AcquisitionManager::new(transport, config);

    match manager.resolve(STATION, 2020, None).await {
        Err(Error::Network { message }) => assert!(message.contains("timed out")),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_token_stops_before_fetching() {
    let cache = TempDir::new().unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let transport =
        MockTransport::new().with_archive(STATION, 2020, Response::Payload(archive_for(2020)));
    let manager = manager(transport, &cache).with_cancellation(token);

    assert!(matches!(
        manager.resolve(STATION, 2020, None).await,
        Err(Error::Cancelled { .. })
    ));
    assert_eq!(manager.transport().calls(), 0);
}

#[tokio::test]
async fn test_cancellation_interrupts_inflight_fetch() {
    let cache = TempDir::new().unwrap();
    let token = CancellationToken::new();
    let transport = MockTransport::new().with_archive(STATION, 2020, Response::Hang);
    let manager = manager(transport, &cache).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let result = manager.resolve(STATION, 2020, None).await;
    canceller.await.unwrap();
    assert!(matches!(result, Err(Error::Cancelled { .. })));
}

#[tokio::test]
async fn test_cache_read_honours_cancellation() {
    let cache = TempDir::new().unwrap();
    let path = archive_path(cache.path(), STATION, 2020);
    std::fs::write(&path, archive_for(2020)).unwrap();

    let token = CancellationToken::new();
    let manager = manager(MockTransport::new(), &cache).with_cancellation(token.clone());
    assert_eq!(
        manager.read_bounded(&path).await.unwrap().as_deref(),
        Some("record line for 2020\n")
    );

    token.cancel();
    assert!(matches!(
        manager.read_bounded(&path).await,
        Err(Error::Cancelled { .. })
    ));
    // A cancelled read leaves the cached file alone
    assert!(path.exists());
    assert_eq!(manager.transport().calls(), 0);
}

#[tokio::test]
async fn test_resolve_years_keeps_request_order() {
    let cache = TempDir::new().unwrap();
    let transport = MockTransport::new()
        .with_archive(STATION, 2019, Response::Payload(archive_for(2019)))
        .with_archive(STATION, 2021, Response::Payload(archive_for(2021)));
    let manager = manager(transport, &cache);

    let resolved = manager
        .resolve_years(STATION, &[2021, 2020, 2019], None)
        .await
        .unwrap();

    let years: Vec<i32> = resolved.iter().map(|(year, _)| *year).collect();
    assert_eq!(years, vec![2021, 2020, 2019]);
    assert_eq!(resolved[0].1.as_ref().unwrap().text, "record line for 2021\n");
    assert!(resolved[1].1.is_none());
    assert_eq!(resolved[2].1.as_ref().unwrap().text, "record line for 2019\n");
}

#[tokio::test]
async fn test_resolve_years_keeps_request_order_when_fetches_finish_out_of_order() {
    let transport = MockTransport::new()
        .with_archive(
            STATION,
            2021,
            Response::Delayed(Duration::from_millis(200), archive_for(2021)),
        )
        .with_archive(STATION, 2020, Response::Payload(archive_for(2020)))
        .with_archive(STATION, 2019, Response::Payload(archive_for(2019)));
    let manager = AcquisitionManager::new(transport, test_config());

    let resolved = manager
        .resolve_years(STATION, &[2021, 2020, 2019], None)
        .await
        .unwrap();

    // The first year requested was the last to arrive
    let finished = manager.transport().finished();
    assert_eq!(finished.len(), 3);
    assert_eq!(finished.last(), Some(&2021));

    let texts: Vec<&str> = resolved
        .iter()
        .map(|(_, year)| year.as_ref().unwrap().text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "record line for 2021\n",
            "record line for 2020\n",
            "record line for 2019\n"
        ]
    );
}

#[tokio::test]
async fn test_per_request_cache_dir_overrides_config() {
    let configured = TempDir::new().unwrap();
    let override_dir = TempDir::new().unwrap();
    std::fs::write(
        archive_path(override_dir.path(), STATION, 2020),
        archive_for(2020),
    )
    .unwrap();

    let manager = manager(MockTransport::new(), &configured);
    let resolved = manager
        .resolve(STATION, 2020, Some(override_dir.path()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(resolved.entry.source, CacheSource::CacheDir);
    assert_eq!(manager.transport().calls(), 0);
    assert!(!archive_path(configured.path(), STATION, 2020).exists());
}

#[tokio::test]
async fn test_fetch_without_cache_dir_keeps_nothing_on_disk() {
    let transport =
        MockTransport::new().with_archive(STATION, 2020, Response::Payload(archive_for(2020)));
    let manager = AcquisitionManager::new(transport, test_config());

    let resolved = manager.resolve(STATION, 2020, None).await.unwrap().unwrap();
    assert_eq!(resolved.entry.source, CacheSource::Fetched);
    assert!(resolved.entry.path.is_none());
}

#[tokio::test]
async fn test_fetch_resource() {
    let transport = MockTransport::new().with_resource(
        "isd-history.csv",
        Response::Payload(b"USAF,WBAN\n".to_vec()),
    );
    let manager = AcquisitionManager::new(transport, test_config());

    let bytes = manager.fetch_resource("isd-history.csv").await.unwrap();
    assert_eq!(bytes, b"USAF,WBAN\n");
    assert!(matches!(
        manager.fetch_resource("missing.csv").await,
        Err(Error::Network { .. })
    ));
}
