mod basic;
mod client;
pub mod auth;
#[cfg(test)]
pub(crate) mod testing;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use serde::Serialize;

/// POSTs `body` as JSON to `url` and returns the raw response, whatever its status.
pub async fn post_json<C: HttpClient + ?Sized, B: Serialize + ?Sized>(
    client: &C,
    url: &str,
    body: &B,
) -> Result<reqwest::Response> {
    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut().insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json; charset=utf-8"),
    );
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    client
        .execute(req)
        .await
        .with_context(|| format!("POST {url} failed"))
}
