//! Integration tests for the ecosyste.ms adapter using wiremock

use core::time::Duration;
use npm_revdeps::providers::ecosystems::Provider;
use npm_revdeps::providers::{CancelToken, Dependency, FetchError, FetchErrorKind, ProviderKind};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPRESS_PATH: &str = "/api/v1/registries/npmjs.org/packages/express/dependent_packages";

fn provider(server: &MockServer) -> Provider {
    Provider::new(Client::new(), &server.uri())
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_normalizes_bare_array() {
    let mock_server = MockServer::start().await;
    mount_json(
        &mock_server,
        EXPRESS_PATH,
        json!([{
            "name": "test-package",
            "latest_release_number": "1.0.0",
            "downloads": 1000,
            "repository_url": "https://github.com/test/test",
            "homepage": "https://test.com"
        }]),
    )
    .await;

    let deps = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap();

    assert_eq!(
        deps,
        vec![Dependency {
            name: "test-package".to_string(),
            version: "1.0.0".to_string(),
            downloads: Some(1000),
            repository: Some("https://github.com/test/test".to_string()),
            homepage: Some("https://test.com".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_fetch_accepts_wrapped_body() {
    let mock_server = MockServer::start().await;
    mount_json(
        &mock_server,
        EXPRESS_PATH,
        json!({
            "dependent_packages": [
                { "name": "first", "latest_version": "2.0.0", "homepage_url": "https://first.dev" },
                { "name": "second", "latest_release_number": null }
            ]
        }),
    )
    .await;

    let deps = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap();

    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0].name, "first");
    assert_eq!(deps[0].version, "2.0.0");
    assert_eq!(deps[0].homepage.as_deref(), Some("https://first.dev"));
    assert_eq!(deps[1].name, "second");
    assert_eq!(deps[1].version, "unknown");
    assert!(deps[1].downloads.is_none());
}

#[tokio::test]
async fn test_fetch_empty_array() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, EXPRESS_PATH, json!([])).await;

    let deps = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap();
    assert!(deps.is_empty());
}

#[tokio::test]
async fn test_fetch_sends_accept_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXPRESS_PATH))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let _ = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap();
}

#[tokio::test]
async fn test_fetch_scoped_package_is_one_segment() {
    let mock_server = MockServer::start().await;
    mount_json(
        &mock_server,
        "/api/v1/registries/npmjs.org/packages/%40scope%2Fpackage/dependent_packages",
        json!([{ "name": "user-of-scope" }]),
    )
    .await;

    let deps = provider(&mock_server).fetch("@scope/package", &CancelToken::new()).await.unwrap();
    assert_eq!(deps[0].name, "user-of-scope");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.path().contains("%40scope%2Fpackage"));
}

#[tokio::test]
async fn test_fetch_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/registries/npmjs.org/packages/nonexistent-pkg/dependent_packages"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .fetch("nonexistent-pkg", &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::NotFound {
            provider: ProviderKind::Ecosystems,
            package: "nonexistent-pkg".to_string(),
        }
    );
    assert!(err.to_string().contains("nonexistent-pkg"));
}

#[tokio::test]
async fn test_fetch_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXPRESS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Upstream {
            provider: ProviderKind::Ecosystems,
            status: 500,
            status_text: "Internal Server Error".to_string(),
        }
    );
    assert!(err.to_string().contains("500 Internal Server Error"));
}

#[tokio::test]
async fn test_fetch_plain_object_is_schema_error() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, EXPRESS_PATH, json!({ "error": "something else" })).await;

    let err = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Schema);
    assert!(err.to_string().contains("unexpected ecosyste.ms API response format"));
}

#[tokio::test]
async fn test_fetch_invalid_json_is_schema_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXPRESS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("express", &CancelToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Schema);
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // nothing listens on port 1
    let provider = Provider::new(Client::new(), "http://127.0.0.1:1");

    let err = provider.fetch("express", &CancelToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Transport);
    assert_eq!(err.provider(), ProviderKind::Ecosystems);
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXPRESS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = Client::builder().timeout(Duration::from_millis(200)).build().unwrap();
    let provider = Provider::new(client, &mock_server.uri());

    let err = provider.fetch("express", &CancelToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Transport);
}

#[tokio::test]
async fn test_fetch_cancelled_in_flight() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXPRESS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let cancel = CancelToken::new();
    let canceller = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        }
    });

    let err = provider(&mock_server).fetch("express", &cancel).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Cancelled {
            provider: ProviderKind::Ecosystems
        }
    );
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_fetch_empty_name_makes_no_request() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/api/v1/registries/npmjs.org/packages//dependent_packages", json!([{ "name": "x" }])).await;

    let err = provider(&mock_server).fetch("", &CancelToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::InvalidPackage);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
