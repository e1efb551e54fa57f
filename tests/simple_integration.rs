//! Integration tests for the one-shot convenience functions.
//!
//! Each facade function builds a throwaway connection per call, so these
//! tests assert the per-call contract: full URL in, Content-Type attached
//! for body verbs, normalized response out.

use restclient::{Error, FormData, Response};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs a closure with the blocking client off the runtime thread.
async fn run_blocking<T, F>(task: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let _ = restclient::init();
        task()
    })
    .await
    .expect("blocking task panicked")
}

#[tokio::test]
async fn test_one_shot_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alive"))
        .mount(&server)
        .await;

    let url = format!("{}/health", server.uri());
    let res = run_blocking(move || restclient::get(&url))
        .await
        .expect("request should not be fatal");

    assert_eq!(res.code, 200);
    assert_eq!(res.body_str(), "alive");
}

#[tokio::test]
async fn test_one_shot_post_sends_content_type() {
    let server = MockServer::start().await;
    let payload = json!({"name": "widget", "count": 3}).to_string();
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(payload.clone()))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let url = format!("{}/items", server.uri());
    let res = run_blocking(move || restclient::post(&url, "application/json", payload))
        .await
        .expect("request should not be fatal");
    assert_eq!(res.code, 201);
}

#[tokio::test]
async fn test_one_shot_put_sends_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/items/1"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("replacement"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/items/1", server.uri());
    let res = run_blocking(move || restclient::put(&url, "text/plain", "replacement"))
        .await
        .expect("request should not be fatal");
    assert_eq!(res.code, 200);
}

#[tokio::test]
async fn test_one_shot_patch_sends_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/items/1"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("delta"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/items/1", server.uri());
    let res = run_blocking(move || restclient::patch(&url, "text/plain", "delta"))
        .await
        .expect("request should not be fatal");
    assert_eq!(res.code, 200);
}

#[tokio::test]
async fn test_one_shot_delete_head_options() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("OPTIONS"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(200).insert_header("Allow", "GET, DELETE"))
        .mount(&server)
        .await;

    let url = format!("{}/items/1", server.uri());
    let (deleted, headed, optioned) =
        run_blocking(move || -> Result<(Response, Response, Response), Error> {
            Ok((
                restclient::del(&url)?,
                restclient::head(&url)?,
                restclient::options(&url)?,
            ))
        })
        .await
        .expect("requests should not be fatal");

    assert_eq!(deleted.code, 204);
    assert_eq!(headed.code, 200);
    assert!(headed.body.is_empty());
    assert_eq!(optioned.code, 200);
    assert_eq!(optioned.headers.get("allow"), Some("GET, DELETE"));
}

#[tokio::test]
async fn test_one_shot_form_post_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/submit", server.uri());
    let res = run_blocking(move || {
        let mut form = FormData::new();
        form.add_content("submitter", "integration-test")?;
        form.add_content("notes", "two fields, no files")?;
        restclient::post_form(&url, form)
    })
    .await
    .expect("request should not be fatal");
    assert_eq!(res.code, 200);

    let requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("multipart/form-data"),
        "got content type: {content_type}"
    );
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("integration-test"));
    assert!(body.contains("two fields, no files"));
}

#[tokio::test]
async fn test_one_shot_failure_is_a_normal_response() {
    // Nothing listens on this port once the probe listener is dropped.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);

    let res = run_blocking(move || restclient::get(&format!("http://127.0.0.1:{port}/gone")))
        .await
        .expect("a refused connection is not fatal");

    assert!(res.is_engine_error());
    assert!(!res.body.is_empty(), "body carries the engine message");
}
