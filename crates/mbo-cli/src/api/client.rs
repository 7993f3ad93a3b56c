//! HTTP client for the MISP API
//!
//! Authentication is a bare API key in the `Authorization` header. MISP
//! reports most failures inside a JSON `errors` payload rather than with an
//! HTTP error status, so every call checks the body shape.

use crate::api::{endpoints, types::*};
use crate::error::{CliError, Result};
use crate::object::MispObject;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Default timeout for MISP requests in seconds.
/// Can be overridden via the MBO_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// MISP API client
pub struct MispClient {
    client: Client,
    base_url: String,
}

impl MispClient {
    /// Create a new client for `base_url`, authenticating with `api_key`.
    ///
    /// `validate_cert = false` disables TLS certificate verification, which
    /// self-hosted MISP instances with self-signed certificates need.
    pub fn new(base_url: String, api_key: &str, validate_cert: bool) -> Result<Self> {
        let timeout_secs = std::env::var("MBO_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(api_key)
            .map_err(|_| CliError::config("MISP API key contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .danger_accept_invalid_certs(!validate_cert)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// List every object template the server knows.
    ///
    /// A body without the `response` key (authentication failures look like
    /// this) is a fatal [`CliError::TemplateFetch`].
    pub async fn object_templates(&self) -> Result<Vec<ObjectTemplateEntry>> {
        let url = endpoints::object_templates_url(&self.base_url);

        let response = self.client.get(&url).send().await?;
        let listing: TemplateListResponse = response
            .json()
            .await
            .map_err(|e| CliError::template_fetch(e.to_string()))?;

        listing
            .response
            .ok_or_else(|| CliError::template_fetch("response has no template listing".to_string()))
    }

    /// Create a new event and return its uuid.
    pub async fn add_event(&self, info: &str, distribution: Option<u8>) -> Result<String> {
        let url = endpoints::add_event_url(&self.base_url);

        let request = AddEventRequest {
            event: NewEvent {
                info: info.to_string(),
                distribution,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let created: AddEventResponse = response
            .json()
            .await
            .map_err(|e| CliError::container_creation(e.to_string()))?;

        if let Some(errors) = created.errors {
            return Err(CliError::container_creation(errors.to_string()));
        }

        created
            .event
            .map(|e| e.uuid)
            .ok_or_else(|| CliError::container_creation("response has no Event payload".to_string()))
    }

    /// Attach a built object to an event.
    pub async fn add_object(
        &self,
        event_id: &str,
        template_id: &str,
        object: &MispObject,
    ) -> Result<()> {
        let url = endpoints::add_object_url(&self.base_url, event_id, template_id);

        let response = self.client.post(&url).json(object).send().await?;
        let outcome: AddObjectResponse = response
            .json()
            .await
            .map_err(|e| CliError::submission(e.to_string()))?;

        if let Some(errors) = outcome.errors {
            return Err(CliError::submission(errors.to_string()));
        }

        Ok(())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            MispClient::new("https://misp.local".to_string(), "test-key", true).unwrap();
        assert_eq!(client.base_url(), "https://misp.local");
    }

    #[test]
    fn test_client_rejects_bad_api_key() {
        let result = MispClient::new("https://misp.local".to_string(), "bad\nkey", true);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
