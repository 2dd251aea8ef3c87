use apifetch::{
    ExecutorConfig, FetchError, FetchOptions, RequestExecutor, TransportError, TransportErrorKind,
    build_bearer_get_options, build_bearer_options, build_json_options,
};
use mockito::{Matcher, Server};
use reqwest::Method;
use serde_json::{Value, json};

fn executor() -> RequestExecutor {
    RequestExecutor::new(&ExecutorConfig::default()).unwrap()
}

/// URL of a local port nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_fetch_json_with_bearer_token() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("GET", "/me")
        .match_header("authorization", "Bearer secret-token")
        .match_header("user-agent", Matcher::Regex("^apifetch/".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 7, "name": "test"}"#)
        .expect(1)
        .create_async()
        .await;

    let options = build_bearer_get_options("secret-token").unwrap();
    let me: Value = executor()
        .fetch_json_with_retry(&format!("{}/me", url), &options)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(me, json!({"id": 7, "name": "test"}));
}

#[tokio::test]
async fn test_fetch_text_posts_json_body() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("POST", "/notes")
        .match_header("content-type", "application/json")
        .match_header("authorization", "Bearer secret-token")
        .match_body(Matcher::Json(json!({"text": "hello"})))
        .with_status(201)
        .with_body("created")
        .create_async()
        .await;

    let options =
        build_bearer_options(Method::POST, "secret-token", &json!({"text": "hello"})).unwrap();
    let text = executor()
        .fetch_text(&format!("{}/notes", url), &options)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "created");
}

#[tokio::test]
async fn test_empty_json_body_is_sent_as_object() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("PUT", "/ping")
        .match_body("{}")
        .with_status(200)
        .with_body("pong")
        .create_async()
        .await;

    let options = build_json_options::<Value>(Method::PUT, None).unwrap();
    let text = executor()
        .fetch_text(&format!("{}/ping", url), &options)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "pong");
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("GET", "/me")
        .with_status(401)
        .with_body(r#"{"code":"expired"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = executor()
        .fetch_json_with_retry::<Value>(&format!("{}/me", url), &FetchOptions::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, FetchError::Unauthorized));
}

#[tokio::test]
async fn test_structured_error_body() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("POST", "/items")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":"bad_input"}"#)
        .expect(1)
        .create_async()
        .await;

    let options = build_json_options(Method::POST, Some(&json!({"name": ""}))).unwrap();
    let err = executor()
        .fetch_json_with_retry::<Value>(&format!("{}/items", url), &options)
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        FetchError::Structured(body) => {
            assert_eq!(Value::Object(body), json!({"code": "bad_input"}))
        }
        other => panic!("Expected structured error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let mock = server
        .mock("GET", "/report")
        .with_status(500)
        .with_body("plain text failure")
        .expect(1)
        .create_async()
        .await;

    let err = executor()
        .fetch_text_with_retry(&format!("{}/report", url), &FetchOptions::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, FetchError::Message(ref m) if m == "plain text failure"));
    assert_eq!(err.to_string(), "plain text failure");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let err = executor()
        .fetch_text(&closed_port_url(), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.attempts(), Some(1));
    assert_eq!(err.to_string(), apifetch::NETWORK_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    let err = executor()
        .fetch_json_with_retry::<Value>(&closed_port_url(), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { attempts: 3, .. }));
}

#[tokio::test]
async fn test_malformed_url_surfaces_transport_error_after_retries() {
    let err = executor()
        .fetch_text_with_retry("not a url", &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport(TransportError {
            kind: TransportErrorKind::InvalidRequest,
            ..
        })
    ));
}

#[test]
fn test_missing_token_fails_before_any_request() {
    assert!(matches!(
        build_bearer_get_options(""),
        Err(FetchError::MissingAccessToken)
    ));
    assert!(matches!(
        build_bearer_options(Method::POST, "", &json!({})),
        Err(FetchError::MissingAccessToken)
    ));
}
