//! Backend round trips against a mock REST service

use agora_http::{
    general_request, get_request, BackendRequest, HttpClient, HttpClientConfig, HttpError,
    HttpManager, HttpMethod, URL_LOG_TARGET,
};
use serde_json::{json, Value as JsonValue};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager() -> HttpManager {
    HttpManager::with_config(HttpClientConfig {
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_post_sends_json_body_and_returns_parsed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/threads/"))
        .and(body_json(json!({ "title": "Rust" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "t1", "title": "Rust" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/v1/threads/", mock_server.uri());
    let result = general_request(
        &manager(),
        &url,
        HttpMethod::Post,
        Some(json!({ "title": "Rust" })),
        false,
    )
    .await
    .unwrap();

    assert_eq!(result, json!({ "_id": "t1", "title": "Rust" }));
}

#[tokio::test]
async fn test_non_success_status_is_an_error_not_a_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/threads/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "THREAD_NOT_FOUND",
            "code": 404,
            "description": "thread does not exist"
        })))
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/v1/threads/missing", mock_server.uri());
    let err = general_request(&manager(), &url, HttpMethod::Get, None, false)
        .await
        .unwrap_err();

    match err {
        HttpError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body["id"], "THREAD_NOT_FOUND");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_full_response_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "2")
                .set_body_json(json!([1, 2])),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/tickets", mock_server.uri());
    let result = general_request(&manager(), &url, HttpMethod::Get, None, true)
        .await
        .unwrap();

    assert_eq!(result["statusCode"], 200);
    assert_eq!(result["headers"]["x-total-count"], "2");
    assert_eq!(result["body"], json!([1, 2]));
}

#[tokio::test]
async fn test_get_request_attaches_truthy_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entrys"))
        .and(query_param("threadId", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let thread_id = json!("t1");
    let empty = json!("");
    let result = get_request(
        &manager(),
        &mock_server.uri(),
        "entrys",
        [("threadId", &thread_id), ("userId", &empty)],
    )
    .await
    .unwrap();

    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_url_is_percent_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/threads/level/first%20level/true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/threads/level/first level/true", mock_server.uri());
    general_request(&manager(), &url, HttpMethod::Get, None, false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bearer_token_is_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/threads/t1/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = BackendRequest::new(format!("{}/threads/t1/", mock_server.uri()), HttpMethod::Delete)
        .bearer_token(Some("abc123".to_string()));
    let result = manager().call(request).await.unwrap();

    assert_eq!(result, JsonValue::String("deleted".to_string()));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Nothing listens on the discard port
    let err = general_request(&manager(), "http://127.0.0.1:9/threads", HttpMethod::Get, None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::NetworkError(_)));
    assert_eq!(err.body(), None);
}

#[tokio::test]
async fn test_request_id_is_sent_as_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/threads"))
        .and(header("x-request-id", "req-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = BackendRequest::new(format!("{}/threads", mock_server.uri()), HttpMethod::Get)
        .request_id(Some("req-42".to_string()));
    let result = manager().call(request).await.unwrap();

    assert_eq!(result, json!([]));
}

/// Log sink shared with the subscriber under test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_show_urls_logs_each_url_under_a_quiet_level() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("warn,{}=info", URL_LOG_TARGET)))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut manager = HttpManager::with_config(HttpClientConfig {
        show_urls: true,
        ..Default::default()
    })
    .unwrap();
    manager.set_offline();
    manager.add_mock(HttpMethod::Get, "http://forum/api/v1/threads", json!([]));

    manager
        .call(BackendRequest::new("http://forum/api/v1/threads", HttpMethod::Get))
        .await
        .unwrap();

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("http://forum/api/v1/threads"), "{output}");
    assert!(!output.contains("DEBUG"), "{output}");
}
