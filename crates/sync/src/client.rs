//! Client interface to the remote network-policy service.
//!
//! The remote service exposes "fetch current policy + its entity tag" and
//! "replace policy, conditioned on that tag". Optimistic-concurrency
//! enforcement is the service's job; the orchestrator only supplies the tag
//! it last observed.

use async_trait::async_trait;

/// Errors from the remote policy service boundary.
#[derive(Debug, thiserror::Error)]
pub enum PolicyClientError {
    /// The request never completed (connect failure, timeout, bad URL).
    #[error("Request to policy service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Policy service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Conditional fetch/replace against the remote policy service.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    /// Fetch the current remote policy body and its entity tag, if the
    /// service reports one.
    async fn get_policy(&self) -> Result<(String, Option<String>), PolicyClientError>;

    /// Replace the remote policy. When `expected_tag` is present the
    /// replace is conditional on it; when absent the push is unconditional.
    /// Returns the new entity tag.
    async fn set_policy(
        &self,
        body: &str,
        expected_tag: Option<&str>,
    ) -> Result<String, PolicyClientError>;
}

/// [`PolicyClient`] over HTTP with `ETag` / `If-Match` conditional replace
/// and bearer authentication.
pub struct HttpPolicyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPolicyClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn policy_url(&self) -> String {
        format!("{}/api/v1/policy", self.base_url)
    }
}

/// Extract the entity tag from a response, reduced to its opaque value.
fn etag_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(parse_etag)
}

/// Reduce an `ETag` header value to the opaque tag: the RFC 7232 `W/` weak
/// indicator and the surrounding quotes are both stripped, so the tag can be
/// re-quoted into an `If-Match` header as-is.
fn parse_etag(value: &str) -> String {
    value
        .strip_prefix("W/")
        .unwrap_or(value)
        .trim_matches('"')
        .to_string()
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn get_policy(&self) -> Result<(String, Option<String>), PolicyClientError> {
        let response = self
            .http
            .get(self.policy_url())
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let tag = etag_of(&response);
        let body = response.text().await?;
        Ok((body, tag))
    }

    async fn set_policy(
        &self,
        body: &str,
        expected_tag: Option<&str>,
    ) -> Result<String, PolicyClientError> {
        let mut request = self
            .http
            .put(self.policy_url())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());

        if let Some(tag) = expected_tag {
            request = request.header(reqwest::header::IF_MATCH, format!("\"{tag}\""));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Some deployments omit the ETag on write; an empty tag then means
        // the next push is unconditional.
        Ok(etag_of(&response).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_parsing_strips_quotes() {
        assert_eq!(parse_etag("\"abc123\""), "abc123");
    }

    /// A weak validator must not leak its `W/` prefix into the stored tag,
    /// or the next `If-Match` would be built around a malformed value.
    #[test]
    fn etag_parsing_strips_weak_indicator() {
        assert_eq!(parse_etag("W/\"abc123\""), "abc123");
    }

    #[test]
    fn etag_parsing_passes_unquoted_values_through() {
        assert_eq!(parse_etag("abc123"), "abc123");
    }
}
