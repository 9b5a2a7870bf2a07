//! REST gateway transport: one JSON POST per turn to
//! `{base}/v2/projects/{project}/agent/sessions/{conversation}:detectIntent`.
//!
//! There is no login call; the optional basic-auth header is computed once at start and
//! carried as the session token. Request keys follow the configured [`FieldNaming`].

use super::Transport;
use crate::auth::{basic_auth_header, Credentials, Session};
use crate::config::{ConnectorConfig, FieldNaming};
use crate::error::TransportError;
use crate::query_result::QueryResult;
use crate::request::DetectIntentRequest;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// `payload.source` sent with every request.
const PAYLOAD_SOURCE: &str = "botium";

/// Client for the ONDEWO HTTP/JSON gateway.
#[derive(Clone)]
pub struct RestTransport {
    timezone: String,
    naming: FieldNaming,
    client: reqwest::Client,
}

impl RestTransport {
    pub fn new(timezone: impl Into<String>, naming: FieldNaming) -> Self {
        Self {
            timezone: timezone.into(),
            naming,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self::new(config.timezone(), config.field_naming)
    }

    /// Detect-intent URL for a session path.
    pub fn detect_intent_url(base_url: &str, session_path: &str) -> String {
        format!(
            "{}/v2/{}:detectIntent",
            base_url.trim().trim_end_matches('/'),
            session_path
        )
    }

    /// JSON body for one turn. `timestamp` is RFC 3339 UTC.
    pub fn request_body(&self, request: &DetectIntentRequest, timestamp: &str) -> Value {
        let k = |snake: &str| self.naming.key(snake);
        let mut text = Map::new();
        text.insert(
            k("text"),
            Value::String(request.text.clone().unwrap_or_default()),
        );
        text.insert(
            k("language_code"),
            Value::String(request.language_code.clone()),
        );
        let mut query_input = Map::new();
        query_input.insert(k("text"), Value::Object(text));

        let mut payload = Map::new();
        payload.insert(k("source"), Value::String(PAYLOAD_SOURCE.to_string()));
        payload.insert(k("timestamp"), Value::String(timestamp.to_string()));
        let mut query_params = Map::new();
        query_params.insert(k("time_zone"), Value::String(self.timezone.clone()));
        query_params.insert(k("contexts"), Value::Array(Vec::new()));
        query_params.insert(k("reset_contexts"), Value::Bool(false));
        query_params.insert(k("payload"), Value::Object(payload));

        let mut body = Map::new();
        body.insert(k("query_input"), Value::Object(query_input));
        body.insert(k("query_params"), Value::Object(query_params));
        Value::Object(body)
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, TransportError> {
        Ok(credentials
            .username
            .as_deref()
            .map(|user| basic_auth_header(user, &credentials.password)))
    }

    fn new_session_id(&self) -> anyhow::Result<String> {
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn detect_intent(
        &self,
        session: &Session,
        request: &DetectIntentRequest,
    ) -> Result<QueryResult, TransportError> {
        let url = Self::detect_intent_url(&session.base_url, &request.session_path);
        let timestamp = chrono::Utc::now().to_rfc3339();
        let body = self.request_body(request, &timestamp);
        let mut req = self.client.post(&url).json(&body);
        if let Some(auth) = &session.auth_token {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let data: Value = res.json().await?;
        let result = data
            .get(self.naming.key("query_result"))
            .or_else(|| data.get("query_result"))
            .or_else(|| data.get("queryResult"))
            .filter(|v| v.is_object())
            .cloned()
            .ok_or(TransportError::MissingQueryResult)?;
        Ok(QueryResult::from_json(result))
    }
}
