//! Native gRPC transport: `Users/Login` for the session token, `Sessions/DetectIntent` per turn.
//!
//! Every call carries the pre-shared `authorization` metadata; detect-intent additionally
//! carries the login token as `cai-token`. The channel is opened on first use and reused.

use super::proto;
use super::proto::sessions_client::SessionsClient;
use super::proto::users_client::UsersClient;
use super::Transport;
use crate::auth::{Credentials, Session};
use crate::error::TransportError;
use crate::query_result::QueryResult;
use crate::request::DetectIntentRequest;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

const AUTHORIZATION_KEY: &str = "authorization";
const SESSION_TOKEN_KEY: &str = "cai-token";

/// gRPC client for the ONDEWO NLU service.
pub struct GrpcTransport {
    uri: String,
    auth_token: String,
    channel: OnceCell<Channel>,
}

impl GrpcTransport {
    /// `base_url` is `host:port` (TLS) or a full `http://` / `https://` URI.
    pub fn new(base_url: &str, auth_token: impl Into<String>) -> Self {
        Self {
            uri: endpoint_uri(base_url),
            auth_token: auth_token.into(),
            channel: OnceCell::new(),
        }
    }

    async fn channel(&self) -> Result<Channel, TransportError> {
        let channel = self
            .channel
            .get_or_try_init(|| async {
                let mut endpoint = Endpoint::from_shared(self.uri.clone())?;
                if self.uri.starts_with("https://") {
                    endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
                }
                log::debug!("ondewo grpc: connecting to {}", self.uri);
                endpoint.connect().await.map_err(TransportError::Connect)
            })
            .await?;
        Ok(channel.clone())
    }

    /// Wrap a message with the pre-shared `authorization` metadata.
    fn authorized<T>(&self, message: T) -> Result<tonic::Request<T>, TransportError> {
        let mut request = tonic::Request::new(message);
        request
            .metadata_mut()
            .insert(AUTHORIZATION_KEY, metadata_value(AUTHORIZATION_KEY, &self.auth_token)?);
        Ok(request)
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, TransportError> {
        let request = self.authorized(proto::LoginRequest {
            user_email: credentials.email.clone(),
            password: credentials.password.clone(),
        })?;
        let mut client = UsersClient::new(self.channel().await?);
        let response = client.login(request).await?.into_inner();
        Ok(Some(response.auth_token))
    }

    async fn detect_intent(
        &self,
        session: &Session,
        request: &DetectIntentRequest,
    ) -> Result<QueryResult, TransportError> {
        let mut call = self.authorized(to_proto_request(request))?;
        if let Some(token) = &session.auth_token {
            call.metadata_mut()
                .insert(SESSION_TOKEN_KEY, metadata_value(SESSION_TOKEN_KEY, token)?);
        }
        let mut client = SessionsClient::new(self.channel().await?);
        let response = client.detect_intent(call).await?.into_inner();
        from_proto_result(response)
    }
}

fn endpoint_uri(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("https://{}", base)
    }
}

fn metadata_value(key: &str, value: &str) -> Result<MetadataValue<Ascii>, TransportError> {
    value
        .parse()
        .map_err(|_| TransportError::InvalidMetadata(format!("{} is not valid ascii", key)))
}

fn to_proto_request(request: &DetectIntentRequest) -> proto::DetectIntentRequest {
    proto::DetectIntentRequest {
        session: request.session_path.clone(),
        query_input: Some(proto::QueryInput {
            input: Some(proto::query_input::Input::Text(proto::TextInput {
                text: request.text.clone().unwrap_or_default(),
                language_code: request.language_code.clone(),
            })),
        }),
    }
}

/// Render the proto query result as JSON and read it back through the shared tolerant parser.
fn from_proto_result(
    response: proto::DetectIntentResponse,
) -> Result<QueryResult, TransportError> {
    let result = response
        .query_result
        .ok_or(TransportError::MissingQueryResult)?;
    let source = serde_json::to_value(&result)?;
    Ok(QueryResult::from_json(source))
}
