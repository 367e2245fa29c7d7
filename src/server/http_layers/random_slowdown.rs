//! Adds a random delay to every request, to simulate a slow network locally.
#![allow(dead_code)] // Feature-gated middleware

use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use rand_distr::{Distribution, Normal};
use std::time::Duration;

pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let normal = Normal::new(1000.0, 2000.0).unwrap();
    let sleep_time_ms = normal.sample(&mut rand::rng()).max(0.0) as u64;
    tokio::time::sleep(Duration::from_millis(sleep_time_ms)).await;
    next.run(request).await
}
