//! Tests for the paginated directory fetch loop.

use crate::common::{FakeTransport, page, test_config};
use flight_compensation::{AirportConfig, AirportError, PagedDirectoryFetcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const P1: &str = "https://directory.test/airports";
const P2: &str = "https://directory.test/airports?page=2";
const P3: &str = "https://directory.test/airports?page=3";

fn fetcher(transport: &Arc<FakeTransport>, config: &AirportConfig) -> PagedDirectoryFetcher<Arc<FakeTransport>> {
    PagedDirectoryFetcher::new(Arc::clone(transport), config)
}

#[tokio::test(start_paused = true)]
async fn test_two_pages_assemble_in_order() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get(P1, page(&["GKA", "MAG"], P1, Some(P2), P2))
            .on_get(P2, page(&["HGU"], P2, None, P2)),
    );

    let directory = fetcher(&transport, &test_config()).fetch().await.unwrap();

    let codes: Vec<_> = directory.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["GKA", "MAG", "HGU"]);
    assert_eq!(transport.requested(), vec![P1.to_string(), P2.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_self_equal_to_last_stops_despite_next() {
    let transport = Arc::new(FakeTransport::new().on_get(P1, page(&["GKA"], P1, Some(P2), P1)));

    let directory = fetcher(&transport, &test_config()).fetch().await.unwrap();

    assert_eq!(directory.len(), 1);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_links_ends_listing() {
    let transport = Arc::new(FakeTransport::new().on_get_raw(
        P1,
        r#"{"data":[{"attributes":{"iata":"LAE","name":"Nadzab Airport","city":"Lae","country":"Papua New Guinea"}}]}"#,
    ));

    let directory = fetcher(&transport, &test_config()).fetch().await.unwrap();

    assert_eq!(directory.find("LAE").map(|a| a.city.as_str()), Some("Lae"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_next_only_links_keep_paging() {
    let p1 = format!(
        r#"{{"data":[{{"attributes":{{"iata":"GKA","name":"Goroka Airport","city":"Goroka","country":"Papua New Guinea"}}}}],"links":{{"next":"{P2}"}}}}"#
    );
    let transport = Arc::new(
        FakeTransport::new()
            .on_get_raw(P1, &p1)
            .on_get(P2, page(&["MAG"], P2, None, P2)),
    );

    let directory = fetcher(&transport, &test_config()).fetch().await.unwrap();

    assert_eq!(directory.len(), 2);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_pages() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get(P1, page(&["GKA"], P1, Some(P2), P3))
            .on_get(P2, page(&["MAG"], P2, Some(P3), P3))
            .on_get(P3, page(&["HGU"], P3, None, P3)),
    );
    let config = AirportConfig {
        page_delay: Duration::from_secs(2),
        ..test_config()
    };

    let started = Instant::now();
    let directory = fetcher(&transport, &config).fetch().await.unwrap();

    assert_eq!(directory.len(), 3);
    assert!(started.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_page_failure_is_upstream_unavailable() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get(P1, page(&["GKA"], P1, Some(P2), P2))
            .on_get_err(P2, AirportError::Timeout {
                operation: "GET page 2".to_string(),
                duration: Duration::from_secs(10),
            }),
    );

    let err = fetcher(&transport, &test_config()).fetch().await.unwrap_err();
    assert!(matches!(err, AirportError::UpstreamUnavailable(_)), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_page_is_parse_error() {
    let transport = Arc::new(FakeTransport::new().on_get_raw(P1, "<html>maintenance</html>"));

    let err = fetcher(&transport, &test_config()).fetch().await.unwrap_err();
    assert!(matches!(err, AirportError::Parse(_)), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn test_revisited_page_is_rejected() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get(P1, page(&["GKA"], P1, Some(P2), P3))
            .on_get(P2, page(&["MAG"], P2, Some(P1), P3)),
    );

    let err = fetcher(&transport, &test_config()).fetch().await.unwrap_err();
    assert!(matches!(err, AirportError::UpstreamUnavailable(_)));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_page_ceiling() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get(P1, page(&["GKA"], P1, Some(P2), "https://directory.test/airports?page=9"))
            .on_get(P2, page(&["MAG"], P2, Some(P3), "https://directory.test/airports?page=9"))
            .on_get(P3, page(&["HGU"], P3, None, P3)),
    );
    let config = AirportConfig {
        max_pages: 2,
        ..test_config()
    };

    let err = fetcher(&transport, &config).fetch().await.unwrap_err();
    assert!(matches!(err, AirportError::UpstreamUnavailable(_)));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_page_is_retried() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_get_err(P1, AirportError::RateLimited {
                retry_after: Some(Duration::from_secs(3)),
            })
            .on_get(P1, page(&["GKA", "MAG"], P1, None, P1)),
    );

    let directory = fetcher(&transport, &test_config()).fetch().await.unwrap();

    assert_eq!(directory.len(), 2);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_rate_limit_gives_up() {
    let transport = Arc::new(FakeTransport::new().on_get_err(P1, AirportError::RateLimited {
        retry_after: None,
    }));
    let config = AirportConfig {
        max_rate_limit_retries: 2,
        ..test_config()
    };

    let err = fetcher(&transport, &config).fetch().await.unwrap_err();
    assert!(matches!(err, AirportError::UpstreamUnavailable(_)));
    assert_eq!(transport.calls(), 3);
}
