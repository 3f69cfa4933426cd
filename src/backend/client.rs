//! HTTP client bound to one base URL and one bearer credential.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::error::BackendError;
use crate::config::BackendConfig;

/// Client for the TESS REST API.
///
/// Every request carries `Authorization: Bearer <token>` and
/// `Content-Type: application/json`; multipart uploads replace the content
/// type with the form's own boundary header. No retries or timeouts are
/// layered on top of reqwest's defaults.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, BackendError> {
        let mut parsed = Url::parse(base_url)?;
        parsed
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty();

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(&config.base_url, &config.api_key)
    }

    /// Base URL every path is appended to (no trailing slash).
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Absolute URL for a path given as segments, e.g. `["agents", "42"]`.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// an identifier never change the target. Empty, `.` and `..` segments
    /// are rejected.
    pub fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(BackendError::InvalidSegment((*bad).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET path?query`.
    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, BackendError> {
        let url = self.url(segments)?;
        tracing::debug!(name: "backend.request", method = "GET", url = %url);
        let response = self.http.get(url).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, BackendError> {
        let url = self.url(segments)?;
        tracing::debug!(name: "backend.request", method = "POST", url = %url);
        let response = self.http.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// `DELETE path`.
    pub async fn delete(&self, segments: &[&str]) -> Result<Value, BackendError> {
        let url = self.url(segments)?;
        tracing::debug!(name: "backend.request", method = "DELETE", url = %url);
        let response = self.http.delete(url).send().await?;
        Self::handle_response(response).await
    }

    /// `POST path` as `multipart/form-data` with one `file` part plus text fields.
    pub async fn post_multipart(
        &self,
        segments: &[&str],
        file_bytes: Vec<u8>,
        file_name: &str,
        fields: &[(&str, String)],
    ) -> Result<Value, BackendError> {
        let mime_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();

        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(&mime_type)?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text((*name).to_string(), value.clone());
        }

        let url = self.url(segments)?;
        tracing::debug!(name: "backend.request", method = "POST", url = %url, file = %file_name, "multipart upload");
        let response = self.http.post(url).multipart(form).send().await?;
        Self::handle_response(response).await
    }

    /// Decode a response body verbatim.
    ///
    /// Object keys keep the order the API sent them in. Bodies that are not
    /// JSON (including empty ones) come back as a JSON string so callers can
    /// always re-serialize the result.
    async fn handle_response(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
