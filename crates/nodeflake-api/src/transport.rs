use async_trait::async_trait;

/// A decoded JSON object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Performs HTTP requests and decodes JSON object responses.
///
/// Any failure (connection, status, body that is not a JSON object) is
/// reported as `None`.
#[async_trait]
pub trait JsonTransport: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Option<JsonObject>;

    async fn post(&self, url: &str, body: &JsonObject) -> Option<JsonObject>;
}
