use thiserror::Error;

/// Errors returned by the extract service client.
///
/// Server-reported failures are not errors at this level; they come back as
/// [`crate::Resposta::Falha`], since the request/response exchange itself
/// completed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}
