//! Transports to the NLU service.
//!
//! A transport performs the login exchange and the per-turn detect-intent call; everything
//! before (request building) and after (normalization) is shared.

mod grpc;
mod proto;
mod rest;

pub use grpc::GrpcTransport;
pub use rest::RestTransport;

use crate::auth::{mint_session_id, Credentials, Session};
use crate::config::{ConnectorConfig, TransportKind};
use crate::error::TransportError;
use crate::query_result::QueryResult;
use crate::request::DetectIntentRequest;
use async_trait::async_trait;

/// Wire access to the NLU service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// One login exchange. Returns the session token, if the transport uses one.
    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, TransportError>;

    /// Session identifier for a fresh session. Default: 5 random letters/digits.
    fn new_session_id(&self) -> anyhow::Result<String> {
        mint_session_id()
    }

    /// Send one detect-intent request on an authenticated session.
    async fn detect_intent(
        &self,
        session: &Session,
        request: &DetectIntentRequest,
    ) -> Result<QueryResult, TransportError>;
}

/// Transport selected by `ONDEWO_TRANSPORT`.
pub enum AnyTransport {
    Grpc(GrpcTransport),
    Rest(RestTransport),
}

impl AnyTransport {
    pub fn from_config(config: &ConnectorConfig) -> Self {
        match config.transport {
            TransportKind::Grpc => AnyTransport::Grpc(GrpcTransport::new(
                config.base_url(),
                config.auth_token.clone().unwrap_or_default(),
            )),
            TransportKind::Rest => AnyTransport::Rest(RestTransport::from_config(config)),
        }
    }
}

#[async_trait]
impl Transport for AnyTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, TransportError> {
        match self {
            AnyTransport::Grpc(t) => t.login(credentials).await,
            AnyTransport::Rest(t) => t.login(credentials).await,
        }
    }

    fn new_session_id(&self) -> anyhow::Result<String> {
        match self {
            AnyTransport::Grpc(t) => t.new_session_id(),
            AnyTransport::Rest(t) => t.new_session_id(),
        }
    }

    async fn detect_intent(
        &self,
        session: &Session,
        request: &DetectIntentRequest,
    ) -> Result<QueryResult, TransportError> {
        match self {
            AnyTransport::Grpc(t) => t.detect_intent(session, request).await,
            AnyTransport::Rest(t) => t.detect_intent(session, request).await,
        }
    }
}
