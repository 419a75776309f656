#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use card_service::services::providers::{
    MockEmailProvider, MockImageProvider, MockImageStore, MockTextProvider,
};
use card_service::services::{ArtFinalizer, CardService, EmailDispatcher, MessageFinalizer};
use card_service::startup::build_router;
use card_service::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const PLACEHOLDER_URL: &str = "https://alphajot.com/images/example.png";

/// Router wired to mock collaborators, with handles for inspecting calls.
pub struct TestApp {
    pub router: Router,
    pub text: Arc<MockTextProvider>,
    pub images: Arc<MockImageProvider>,
    pub store: Arc<MockImageStore>,
    pub mailer: Arc<MockEmailProvider>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_providers(
            MockTextProvider::new(true),
            MockImageProvider::new(true),
            MockImageStore::new(true),
        )
    }

    pub fn with_providers(
        text: MockTextProvider,
        images: MockImageProvider,
        store: MockImageStore,
    ) -> Self {
        Self::build(text, images, store, MockEmailProvider::new(true))
    }

    /// Default generators and store with a custom mail transport.
    pub fn with_mailer(mailer: MockEmailProvider) -> Self {
        Self::build(
            MockTextProvider::new(true),
            MockImageProvider::new(true),
            MockImageStore::new(true),
            mailer,
        )
    }

    fn build(
        text: MockTextProvider,
        images: MockImageProvider,
        store: MockImageStore,
        mailer: MockEmailProvider,
    ) -> Self {
        let text = Arc::new(text);
        let images = Arc::new(images);
        let store = Arc::new(store);
        let mailer = Arc::new(mailer);

        let cards = CardService::new(
            ArtFinalizer::new(text.clone(), images.clone(), PLACEHOLDER_URL),
            MessageFinalizer::new(text.clone()),
            store.clone(),
            Arc::new(EmailDispatcher::new(text.clone(), mailer.clone())),
        );

        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
        let router = build_router(AppState::new(Arc::new(cards), static_dir));

        TestApp {
            router,
            text,
            images,
            store,
            mailer,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Post url-encoded form fields.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("Failed to encode form");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Wait for detached email tasks to reach the transport.
    pub async fn wait_for_mail(&self, expected: u64) {
        for _ in 0..50 {
            if self.mailer.attempt_count() >= expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }
}
