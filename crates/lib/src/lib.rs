//! ONDEWO NLU connector — sends user turns to the ONDEWO detect-intent API (gRPC or REST
//! gateway) and normalizes the replies into a flat bot message for a chatbot test host.

pub mod auth;
pub mod config;
pub mod connector;
pub mod error;
pub mod intent;
pub mod message;
pub mod normalize;
pub mod payload;
pub mod query_result;
pub mod request;
pub mod transport;

pub use connector::{OndewoConnector, StartedConnector, PLUGIN_DESC, PLUGIN_VERSION};
pub use error::{ConnectorError, TransportError};
pub use message::{BotMessage, OutboundTurn};
