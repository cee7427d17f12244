//! Delivery clients against a local HTTP server

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use hr_assistant_config::{MailRelayConfig, ObjectStoreConfig, TelegramConfig};
use hr_assistant_core::{DeliveryError, DeliveryGateway, DocumentRef, RelayDestination};
use hr_assistant_delivery::{ChatDeliveryGateway, MailRelay, ObjectStoreUploader, TelegramClient};

const TOKEN: &str = "42-secret";
const PDF: &[u8] = b"%PDF-1.4 resume";

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    fn push(&self, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
        let text = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.0.lock().unwrap().push(Seen {
            path: uri.path().to_string(),
            authorization: text(header::AUTHORIZATION),
            content_type: text(header::CONTENT_TYPE),
            body: body.to_vec(),
        });
    }

    fn seen(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }
}

async fn send_message(
    State(recorder): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    recorder.push(&uri, &headers, &body);
    Json(json!({"ok": true, "result": {"message_id": 1}}))
}

async fn get_file(Json(request): Json<Value>) -> Json<Value> {
    match request["file_id"].as_str() {
        Some("F1") => Json(json!({
            "ok": true,
            "result": {"file_id": "F1", "file_size": PDF.len(), "file_path": "documents/cv.pdf"}
        })),
        Some(other) => Json(json!({"ok": true, "result": {"file_id": other}})),
        None => Json(json!({"ok": false, "description": "Bad Request: file_id is empty"})),
    }
}

async fn record(
    State(recorder): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    recorder.push(&uri, &headers, &body);
    StatusCode::OK
}

async fn start() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route(&format!("/bot{}/sendMessage", TOKEN), post(send_message))
        .route(&format!("/bot{}/getFile", TOKEN), post(get_file))
        .route(
            &format!("/file/bot{}/documents/cv.pdf", TOKEN),
            get(|| async { PDF }),
        )
        .route(
            "/botrevoked/sendMessage",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    r#"{"ok":false,"description":"Unauthorized"}"#,
                )
                    .into_response()
            }),
        )
        .route("/mail/send", post(record))
        .route(
            "/mail/broken",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "relay down") }),
        )
        .route("/store/hr-resumes/*key", put(record))
        .route(
            "/locked/hr-resumes/*key",
            put(|| async { (StatusCode::FORBIDDEN, "access denied") }),
        )
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), recorder)
}

fn telegram(base: &str, token: &str) -> TelegramClient {
    TelegramClient::new(
        reqwest::Client::new(),
        &TelegramConfig {
            enabled: true,
            bot_token: token.to_string(),
            api_base: format!("{}/", base),
        },
    )
}

fn mail(base: &str, path: &str) -> MailRelay {
    MailRelay::new(
        reqwest::Client::new(),
        &MailRelayConfig {
            endpoint: format!("{}{}", base, path),
            api_key: "k".to_string(),
            sender: "bot@example.com".to_string(),
        },
    )
}

fn store(base: &str, prefix: &str) -> ObjectStoreUploader {
    ObjectStoreUploader::new(
        reqwest::Client::new(),
        &ObjectStoreConfig {
            base_url: format!("{}{}", base, prefix),
            bucket: "hr-resumes".to_string(),
            auth_token: Some("s3cr3t".to_string()),
        },
    )
}

fn resume() -> DocumentRef {
    DocumentRef {
        file_id: "F1".to_string(),
        file_name: "cv.pdf".to_string(),
        user_id: "77".to_string(),
    }
}

#[tokio::test]
async fn test_send_message_posts_json() {
    let (base, recorder) = start().await;

    telegram(&base, TOKEN).send_message("42", "hello").await.unwrap();

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, format!("/bot{}/sendMessage", TOKEN));
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(body, json!({"chat_id": "42", "text": "hello"}));
}

#[tokio::test]
async fn test_bot_api_error_status_is_rejected() {
    let (base, _) = start().await;

    match telegram(&base, "revoked").send_message("42", "hello").await {
        Err(DeliveryError::Rejected {
            service,
            status,
            body,
        }) => {
            assert_eq!(service, "telegram");
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_download_resolves_file_path_first() {
    let (base, _) = start().await;
    let client = telegram(&base, TOKEN);

    let file = client.get_file("F1").await.unwrap();
    assert_eq!(file.file_path.as_deref(), Some("documents/cv.pdf"));
    assert_eq!(file.file_size, Some(PDF.len() as u64));

    assert_eq!(client.download("F1").await.unwrap(), PDF);
}

#[tokio::test]
async fn test_download_without_file_path_is_rejected() {
    let (base, _) = start().await;

    match telegram(&base, TOKEN).download("EXPIRED").await {
        Err(DeliveryError::Rejected { status, body, .. }) => {
            assert_eq!(status, 404);
            assert!(body.contains("EXPIRED"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_mail_relay_sends_bearer_and_attachment() {
    let (base, recorder) = start().await;

    mail(&base, "/mail/send")
        .send(&resume(), PDF, "hr@example.com", "Resume for job 101")
        .await
        .unwrap();

    let seen = recorder.seen();
    assert_eq!(seen[0].path, "/mail/send");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer k"));
    let body: Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(body["from"], "bot@example.com");
    assert_eq!(body["to"], json!(["hr@example.com"]));
    assert_eq!(body["subject"], "Resume for job 101");
    assert_eq!(body["attachments"][0]["filename"], "cv.pdf");
    assert_eq!(body["attachments"][0]["content_type"], "application/pdf");
    assert_eq!(body["attachments"][0]["content"], "JVBERi0xLjQgcmVzdW1l");
}

#[tokio::test]
async fn test_mail_relay_failure_keeps_status_and_body() {
    let (base, _) = start().await;

    let err = mail(&base, "/mail/broken")
        .send(&resume(), PDF, "hr@example.com", "Resume")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeliveryError::Rejected { service: "mail", status: 500, ref body } if body == "relay down"
    ));
}

#[tokio::test]
async fn test_object_store_put() {
    let (base, recorder) = start().await;

    store(&base, "/store")
        .put("resumes/101/77-cv.pdf", PDF.to_vec())
        .await
        .unwrap();

    let seen = recorder.seen();
    assert_eq!(seen[0].path, "/store/hr-resumes/resumes/101/77-cv.pdf");
    assert_eq!(seen[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer s3cr3t"));
    assert_eq!(seen[0].body, PDF);
}

#[tokio::test]
async fn test_object_store_refusal_is_rejected() {
    let (base, _) = start().await;

    let err = store(&base, "/locked")
        .put("resumes/101/77-cv.pdf", PDF.to_vec())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeliveryError::Rejected { service: "object_store", status: 403, .. }
    ));
}

#[tokio::test]
async fn test_gateway_relays_downloaded_resume_to_store() {
    let (base, recorder) = start().await;
    let gateway =
        ChatDeliveryGateway::new(telegram(&base, TOKEN)).with_object_store(store(&base, "/store"));

    gateway
        .relay_document(
            &resume(),
            &RelayDestination::ObjectStore {
                key: "resumes/101/77-cv.pdf".to_string(),
            },
        )
        .await
        .unwrap();

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].body, PDF);
}

#[tokio::test]
async fn test_gateway_without_mail_relay_skips_download() {
    let (base, recorder) = start().await;
    let gateway = ChatDeliveryGateway::new(telegram(&base, TOKEN));

    let err = gateway
        .relay_document(
            &resume(),
            &RelayDestination::Email {
                to: "hr@example.com".to_string(),
                subject: "Resume".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeliveryError::NotConfigured(_)));
    assert!(recorder.seen().is_empty());
}
