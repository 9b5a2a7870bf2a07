//! Host-facing connector lifecycle.
//!
//! `OndewoConnector` is the validated but unauthenticated connector; `start` performs the
//! login and returns a `StartedConnector`, the only state that can send turns. The session
//! is fixed at start and only read afterwards, so turns may run concurrently on `&self`.

use crate::auth::{Credentials, Login, Session};
use crate::config::{default_config_path, load_config, ConnectorConfig};
use crate::error::ConnectorError;
use crate::message::{BotMessage, OutboundTurn};
use crate::normalize::normalize;
use crate::request::build_request;
use crate::transport::{AnyTransport, Transport};
use tokio::sync::mpsc;

/// Validated connector, not logged in.
pub struct OndewoConnector<T: Transport = AnyTransport> {
    config: ConnectorConfig,
    transport: T,
}

impl OndewoConnector<AnyTransport> {
    /// Validate capabilities and build the transport they select.
    pub fn from_config(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        let config = config.with_defaults();
        let transport = AnyTransport::from_config(&config);
        Self::new(config, transport)
    }

    /// Load capabilities from [`default_config_path`] plus environment overrides.
    pub fn from_default_config() -> Result<Self, ConnectorError> {
        let config = load_config(&default_config_path())?;
        Self::from_config(config)
    }
}

impl<T: Transport> OndewoConnector<T> {
    /// Fill defaults and validate capabilities. No network activity.
    pub fn new(config: ConnectorConfig, transport: T) -> Result<Self, ConnectorError> {
        log::debug!("ondewo connector: validate");
        let config = config.with_defaults();
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Log in once and open a session. Replies produced by `user_says` go to `sink`.
    pub async fn start(
        self,
        sink: mpsc::Sender<BotMessage>,
    ) -> Result<StartedConnector<T>, ConnectorError> {
        log::debug!("ondewo connector: start");
        let credentials = Credentials::from_config(&self.config);
        let auth_token = self
            .transport
            .login(&credentials)
            .await
            .map_err(ConnectorError::Auth)?;
        let session_id = self.transport.new_session_id()?;
        let session = Session::new(
            &self.config,
            Login {
                auth_token,
                session_id,
            },
        );
        log::info!(
            "ondewo connector: logged in, session {}",
            session.session_path()
        );
        Ok(StartedConnector {
            config: self.config,
            transport: self.transport,
            session,
            sink,
        })
    }
}

/// Logged-in connector holding an immutable session.
pub struct StartedConnector<T: Transport = AnyTransport> {
    config: ConnectorConfig,
    transport: T,
    session: Session,
    sink: mpsc::Sender<BotMessage>,
}

impl<T: Transport> StartedConnector<T> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send one turn and return the normalized reply.
    pub async fn detect_intent(&self, turn: &OutboundTurn) -> Result<BotMessage, ConnectorError> {
        let request = build_request(turn, &self.session);
        let result = self
            .transport
            .detect_intent(&self.session, &request)
            .await
            .map_err(|e| {
                log::warn!("ondewo connector: detect intent failed: {}", e);
                ConnectorError::Transport(e)
            })?;
        Ok(normalize(&result))
    }

    /// Send one turn and deliver exactly one reply to the sink.
    pub async fn user_says(&self, turn: &OutboundTurn) -> Result<(), ConnectorError> {
        log::debug!("ondewo connector: user says");
        let msg = self.detect_intent(turn).await?;
        self.sink
            .send(msg)
            .await
            .map_err(|_| ConnectorError::SinkClosed)
    }

    /// End the session. The returned connector can be started again.
    pub fn stop(self) -> OndewoConnector<T> {
        log::debug!("ondewo connector: stop");
        OndewoConnector {
            config: self.config,
            transport: self.transport,
        }
    }
}

/// Capability descriptor shown by the host.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityDesc {
    pub name: &'static str,
    pub label: &'static str,
    /// `string` or `secret`.
    pub kind: &'static str,
    pub required: bool,
    pub description: Option<&'static str>,
}

/// Plugin descriptor.
#[derive(Debug, Clone, Copy)]
pub struct PluginDesc {
    pub name: &'static str,
    pub provider: &'static str,
    pub intent_resolution: bool,
    pub intent_confidence_score: bool,
    pub capabilities: &'static [CapabilityDesc],
}

pub const PLUGIN_VERSION: u32 = 1;

pub const PLUGIN_DESC: PluginDesc = PluginDesc {
    name: "Ondewo",
    provider: "Ondewo",
    intent_resolution: true,
    intent_confidence_score: true,
    capabilities: &[
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_EMAIL,
            label: "Email",
            kind: "string",
            required: true,
            description: None,
        },
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_PASSWORD,
            label: "Password",
            kind: "secret",
            required: true,
            description: None,
        },
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_BASEURL,
            label: "Base url",
            kind: "string",
            required: false,
            description: Some("By default 'grpc-nlu.ondewo.com:443' url will be used."),
        },
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_AUTH_TOKEN,
            label: "Basic auth token",
            kind: "secret",
            required: true,
            description: None,
        },
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_PROJECT_ID,
            label: "Project ID",
            kind: "string",
            required: true,
            description: None,
        },
        CapabilityDesc {
            name: crate::config::caps::ONDEWO_LANGUAGE_CODE,
            label: "Language code",
            kind: "string",
            required: false,
            description: Some("By default 'en' language code will be used."),
        },
    ],
};
