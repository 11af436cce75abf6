//! Common test utilities
//!
//! - `TestApp`, the full router over an in-memory store
//! - request builders for the JSON and multipart endpoints
//! - response body helpers

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use roomlog::backend::routes::create_router;
use roomlog::backend::server::{assemble_state, AppState, ServerConfig};
use roomlog::backend::store::MemoryStore;

pub const BOUNDARY: &str = "roomlog-test-boundary";

/// Application under test
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    _uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_buffer(64).await
    }

    pub async fn with_buffer(subscriber_buffer: usize) -> Self {
        let uploads = tempfile::tempdir().expect("tempdir");
        let config = ServerConfig::builder()
            .upload_dir(uploads.path())
            .bcrypt_cost(4)
            .subscriber_buffer(subscriber_buffer)
            .build()
            .expect("valid test config");

        let store = Arc::new(MemoryStore::new());
        let state = assemble_state(config, store.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            _uploads: uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Register `login` and return its `Authorization` value
    pub async fn register(&self, login: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/account/register",
                None,
                json!({ "login": login, "password": password }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["credential"]
            .as_str()
            .expect("credential string")
            .to_string()
    }

    pub async fn post_text(&self, credential: &str, text: &str) -> Response<Body> {
        self.send(json_request(
            Method::POST,
            "/message/text",
            Some(credential),
            json!({ "text": text }),
        ))
        .await
    }

    pub async fn get(&self, uri: &str, credential: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(credential) = credential {
            builder = builder.header(header::AUTHORIZATION, credential);
        }
        self.send(builder.body(Body::empty()).expect("request"))
            .await
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    credential: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(credential) = credential {
        builder = builder.header(header::AUTHORIZATION, credential);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// `multipart/form-data` request with a single part
pub fn multipart_request(
    credential: &str,
    field_name: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/message/file")
        .header(header::AUTHORIZATION, credential)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
