//! Integration tests for [`geocoder::HttpGeocoder`] against a mockito server.
//!
//! Covers: short queries rejected without a request, success parsing, empty results, missing
//! `data`, non-success statuses and unparsable bodies.

use std::time::Duration;

use geocoder::{GeocodeError, Geocoder, HttpGeocoder, LocationCandidate, DEFAULT_QUERY_PARAM};
use mockito::Matcher;

const PATH: &str = "/api/v1/geo-encoder/location-autocomplete/";

fn geocoder_for(server: &mockito::ServerGuard) -> HttpGeocoder {
    HttpGeocoder::new(
        format!("{}{}", server.url(), PATH),
        DEFAULT_QUERY_PARAM,
        Duration::from_secs(5),
    )
    .expect("client must build")
}

fn record(city_id: i64, city: &str, region_id: i64, region: &str) -> serde_json::Value {
    serde_json::json!({
        "city": { "id": city_id, "name": city },
        "region": { "id": region_id, "name": region },
        "district": null
    })
}

/// **Test: Queries shorter than 3 characters fail with InvalidQuery and issue no request.**
#[tokio::test]
async fn test_short_query_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    for query in ["", "a", "Ки", "  ab  "] {
        let err = geocoder.lookup(query).await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidQuery { .. }), "query {:?}", query);
    }

    mock.assert_async().await;
}

/// **Test: Successful lookup sends the query parameter and returns candidates in response order.**
#[tokio::test]
async fn test_lookup_success_parses_candidates() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "data": [
            record(268, "Київ", 25, "Київська область"),
            record(268, "Київ", 26, "Київ"),
            record(1201, "Київець", 5, "Львівська область"),
        ]
    });
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::UrlEncoded("query".into(), "Київ".into()))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    let candidates = geocoder.lookup("  Київ ").await.unwrap();

    mock.assert_async().await;
    // The gateway does not deduplicate; that is the caller's step.
    assert_eq!(
        candidates,
        vec![
            LocationCandidate::new(268, "Київ", 25, "Київська область"),
            LocationCandidate::new(268, "Київ", 26, "Київ"),
            LocationCandidate::new(1201, "Київець", 5, "Львівська область"),
        ]
    );
}

/// **Test: Empty `data` and missing `data` are both an empty success.**
#[tokio::test]
async fn test_lookup_empty_result_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _empty = server
        .mock("GET", PATH)
        .match_query(Matcher::UrlEncoded("query".into(), "Nowhere".into()))
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", PATH)
        .match_query(Matcher::UrlEncoded("query".into(), "Atlantis".into()))
        .with_status(200)
        .with_body(r#"{"metadata": {}}"#)
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    assert!(geocoder.lookup("Nowhere").await.unwrap().is_empty());
    assert!(geocoder.lookup("Atlantis").await.unwrap().is_empty());
}

/// **Test: Records without city or region are skipped.**
#[tokio::test]
async fn test_lookup_skips_incomplete_records() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "data": [
            { "region": { "id": 25, "name": "Київська область" } },
            record(300, "Біла Церква", 25, "Київська область"),
        ]
    });
    let _mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    let candidates = geocoder.lookup("Біла").await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].place_id, 300);
}

/// **Test: Non-success status surfaces as UpstreamUnavailable after exactly one request.**
#[tokio::test]
async fn test_lookup_server_error_is_upstream_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .expect(1)
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    let err = geocoder.lookup("Odesa").await.unwrap_err();

    mock.assert_async().await;
    match err {
        GeocodeError::UpstreamUnavailable(msg) => assert!(msg.contains("503"), "{}", msg),
        other => panic!("expected UpstreamUnavailable, got {:?}", other),
    }
}

/// **Test: Unparsable body surfaces as UpstreamUnavailable.**
#[tokio::test]
async fn test_lookup_bad_body_is_upstream_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>captcha</html>")
        .create_async()
        .await;

    let geocoder = geocoder_for(&server);
    let err = geocoder.lookup("Lviv").await.unwrap_err();
    assert!(matches!(err, GeocodeError::UpstreamUnavailable(_)));
}

/// **Test: Unreachable endpoint surfaces as UpstreamUnavailable.**
#[tokio::test]
async fn test_lookup_connection_refused_is_upstream_unavailable() {
    let geocoder = HttpGeocoder::new(
        "http://127.0.0.1:1/geo",
        DEFAULT_QUERY_PARAM,
        Duration::from_secs(2),
    )
    .unwrap();
    let err = geocoder.lookup("Kharkiv").await.unwrap_err();
    assert!(matches!(err, GeocodeError::UpstreamUnavailable(_)));
}
