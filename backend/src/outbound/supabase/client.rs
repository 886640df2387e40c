//! Shared HTTP client for one Supabase project.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::ErrorReplyDto;
use crate::outbound::http_support::{build_client, status_message};

/// Project coordinates for a Supabase instance.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: Url,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum SupabaseClientError {
    #[error("supabase URL must be an absolute http(s) URL: {0}")]
    InvalidUrl(String),
    #[error("failed to build supabase HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Raw reply from Supabase: status plus body bytes.
pub(super) struct Reply {
    pub(super) status: StatusCode,
    pub(super) body: Vec<u8>,
}

impl Reply {
    /// Best human-readable message for a failed reply.
    pub(super) fn error_message(&self) -> String {
        serde_json::from_slice::<ErrorReplyDto>(&self.body)
            .ok()
            .and_then(ErrorReplyDto::into_message)
            .unwrap_or_else(|| status_message(self.status, &self.body))
    }
}

pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: Zeroizing<String>,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Fails when the URL cannot carry paths or the client cannot be built.
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseClientError> {
        if config.url.cannot_be_a_base() || !matches!(config.url.scheme(), "http" | "https") {
            return Err(SupabaseClientError::InvalidUrl(config.url.to_string()));
        }
        Ok(Self {
            http: build_client(config.timeout)?,
            base_url: config.url,
            anon_key: Zeroizing::new(config.anon_key),
        })
    }

    pub(super) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Request with `apikey` set and `Authorization` carrying `bearer`, or the
    /// anon key when no user token applies.
    pub(super) fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(self.anon_key.as_str());
        self.http
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Reply, reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Reply { status, body })
    }
}
