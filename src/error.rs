/// Error type returned by this crate.
///
/// HTTP error statuses (4xx/5xx) are not represented here: they complete a
/// round trip and are reported through [`RequestBuilder::status_code`].
///
/// [`RequestBuilder::status_code`]: crate::RequestBuilder::status_code
#[derive(Debug, thiserror::Error)]
pub enum HubSpotError {
    /// Every scheduled attempt failed before a response was obtained.
    #[error("transport error after {attempts} attempt(s): {source}")]
    Transport {
        /// Number of attempts made, initial try included.
        attempts: usize,
        /// Error from the last attempt.
        #[source]
        source: reqwest::Error,
    },
    /// JSON body could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Response body could not be read after a successful exchange.
    #[error("body read error: {0}")]
    Body(#[source] reqwest::Error),
    /// Configured method is not a valid HTTP token.
    #[error("invalid http method '{0}'")]
    InvalidMethod(String),
    /// Composed request target is not a valid URL.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Missing or unusable configuration value.
    #[error("config error: {0}")]
    Config(String),
}
