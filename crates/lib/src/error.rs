//! Connector and transport errors.

/// Failure of a single exchange with the NLU service (login or detect-intent).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("ondewo request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ondewo api error: {status} {body}")]
    Api { status: u16, body: String },
    #[error("ondewo rpc failed: {0}")]
    Rpc(#[from] tonic::Status),
    #[error("ondewo connection failed: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("invalid request metadata: {0}")]
    InvalidMetadata(String),
    #[error("ondewo response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("ondewo response has no query result")]
    MissingQueryResult,
}

/// Errors surfaced to the host across the connector lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A required capability is missing or blank. Raised before any network activity.
    #[error("{0} capability required")]
    MissingCapability(&'static str),
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Login exchange rejected or unreachable. Fatal to startup.
    #[error("ondewo login failed: {0}")]
    Auth(#[source] TransportError),
    /// Detect-intent call failed; the turn is lost, nothing is retried.
    #[error("ondewo detect intent failed: {0}")]
    Transport(#[source] TransportError),
    #[error("bot message sink closed")]
    SinkClosed,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
