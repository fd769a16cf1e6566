//! In-memory [`HttpClient`] used by unit tests.

use super::client::HttpClient;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: reqwest::Method,
    pub url: String,
    pub headers: reqwest::header::HeaderMap,
    pub body: Vec<u8>,
}

/// Records every request and answers each with the same canned response.
pub struct RecordingClient {
    status: u16,
    body: String,
    seen: Mutex<Vec<SeenRequest>>,
}

impl RecordingClient {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn execute(&self, req: reqwest::Request) -> anyhow::Result<reqwest::Response> {
        let body = req
            .body()
            .and_then(|b| b.as_bytes())
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        self.seen.lock().unwrap().push(SeenRequest {
            method: req.method().clone(),
            url: req.url().to_string(),
            headers: req.headers().clone(),
            body,
        });

        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body.clone())?;
        Ok(reqwest::Response::from(resp))
    }
}
