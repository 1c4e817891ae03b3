// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod assets;

pub use assets::{resolve_asset_url, rewrite_markdown_images};

use analyticbot_app::{
    ChatReply, ChatRequest, DataPreview, Message, SessionRole, UploadReceipt, UserAccount,
};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Blocking client for the analytics backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("backend.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("backend.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "backend.base_url must use http or https, got {:?}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    /// Normalized base URL, also the origin asset paths resolve against.
    pub fn origin(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_history(&self, role: SessionRole) -> Result<Vec<Message>> {
        let request = self.http.get(self.endpoint(&format!("history/{}", role.as_str())));
        self.send_json(request, "decode chat history")
    }

    pub fn clear_history(&self, role: SessionRole) -> Result<()> {
        let request = self
            .http
            .delete(self.endpoint(&format!("history/{}", role.as_str())));
        self.send(request)?;
        Ok(())
    }

    pub fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let request = self.http.post(self.endpoint("chat")).json(request);
        self.send_json(request, "decode chat reply")
    }

    pub fn list_files(&self) -> Result<Vec<String>> {
        let request = self.http.get(self.endpoint("files"));
        self.send_json(request, "decode file list")
    }

    /// `None` when the backend has nothing loaded for `filename`.
    pub fn preview_file(&self, filename: &str) -> Result<Option<DataPreview>> {
        let mut url = Url::parse(&self.endpoint("data/preview")).context("build preview URL")?;
        url.query_pairs_mut().append_pair("filename", filename);

        let parsed: PreviewResponse =
            self.send_json(self.http.get(url), "decode data preview")?;
        Ok(match parsed {
            PreviewResponse::Preview(preview) => Some(preview),
            PreviewResponse::Message { message } => {
                debug!(filename, message = %message, "no preview available");
                None
            }
        })
    }

    pub fn upload_file(&self, path: &Path) -> Result<UploadReceipt> {
        let form = Form::new()
            .file("file", path)
            .with_context(|| format!("read upload file {}", path.display()))?;
        let request = self.http.post(self.endpoint("upload")).multipart(form);
        self.send_json(request, "decode upload receipt")
    }

    pub fn list_users(&self) -> Result<Vec<UserAccount>> {
        let request = self.http.get(self.endpoint("users"));
        self.send_json(request, "decode user list")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.send(request)?;
        response.json().with_context(|| what.to_owned())
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- is the analytics backend running? ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<DetailEnvelope>(body)
        && let Some(detail) = parsed.detail
    {
        let detail = match detail {
            Value::String(text) => text,
            other => other.to_string(),
        };
        if !detail.is_empty() {
            return anyhow!("server error ({}): {}", status.as_u16(), detail);
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PreviewResponse {
    Preview(DataPreview),
    Message { message: String },
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    detail: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn new_trims_trailing_slashes() {
        let client = Client::new("http://localhost:8000//", Duration::from_secs(1))
            .expect("client should initialize");
        assert_eq!(client.origin(), "http://localhost:8000");
        assert_eq!(client.endpoint("files"), "http://localhost:8000/files");
    }

    #[test]
    fn new_rejects_non_http_schemes() {
        let error = Client::new("ftp://example.com", Duration::from_secs(1))
            .expect_err("ftp should be rejected");
        assert!(error.to_string().contains("http or https"));
        assert!(Client::new("  ", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn fastapi_detail_is_surfaced() {
        let error = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"NVIDIA API not configured"}"#,
        );
        assert_eq!(
            error.to_string(),
            "server error (500): NVIDIA API not configured"
        );
    }

    #[test]
    fn short_plain_body_is_surfaced_and_json_noise_is_not() {
        let plain = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(plain.to_string(), "server error (502): upstream down");

        let noisy = clean_error_response(StatusCode::NOT_FOUND, r#"{"unexpected":true}"#);
        assert_eq!(noisy.to_string(), "server returned 404");
    }
}
