//! Cache-Control middleware for immutable responses
#![allow(dead_code)] // Used as middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

pub async fn http_cache(
    State(max_age_sec): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await.into_response();
    if response.status().is_success() {
        if let Ok(value) = format!("max-age={}", max_age_sec).parse() {
            response.headers_mut().insert("Cache-Control", value);
        }
    }
    response
}
