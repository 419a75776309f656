use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Security headers for server-rendered pages.
///
/// Scripts, styles and fonts must come from our own origin. Images may be
/// loaded from any HTTPS origin because generated artwork is hosted by the
/// image provider or the image CDN.
pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' https: data:; \
             form-action 'self'; \
             frame-ancestors 'none'",
        ),
    );

    response
}
