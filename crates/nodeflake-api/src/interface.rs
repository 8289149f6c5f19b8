use crate::error::{ApiError, Result};
use crate::transport::{JsonObject, JsonTransport};
use tracing::{debug, warn};

pub const TEST_GET_PATH: &str = "/v1/test/get";

/// Issues requests against paths below a fixed base URL.
pub struct ApiInterface<T: JsonTransport> {
    base_url: String,
    transport: T,
}

impl<T: JsonTransport> ApiInterface<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        Ok(Self {
            base_url: trimmed.to_owned(),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `path` to the base URL.
    ///
    /// A path starts after exactly one slash, whatever number of leading
    /// slashes it came with. A query (`?...`) or fragment (`#...`) suffix is
    /// appended as is. Slashes inside the path are left alone.
    pub fn formatted_url(&self, path: &str) -> String {
        if path.starts_with(['?', '#']) {
            return format!("{}{}", self.base_url, path);
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get(&self, path: &str) -> Option<JsonObject> {
        let url = self.formatted_url(path);
        let response = self.transport.get(&url).await;
        log_outcome("GET", &url, &response);
        response
    }

    pub async fn post(&self, path: &str, body: &JsonObject) -> Option<JsonObject> {
        let url = self.formatted_url(path);
        let response = self.transport.post(&url, body).await;
        log_outcome("POST", &url, &response);
        response
    }

    /// Liveness probe against the API's test endpoint.
    pub async fn test_get(&self) -> Option<JsonObject> {
        self.get(TEST_GET_PATH).await
    }
}

fn log_outcome(method: &str, url: &str, response: &Option<JsonObject>) {
    match response {
        Some(object) => debug!(method, url, keys = object.len(), "api request succeeded"),
        None => warn!(method, url, "api request failed"),
    }
}
