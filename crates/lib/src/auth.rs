//! Login credentials, the authenticated session and session identifier minting.

use crate::config::ConnectorConfig;
use anyhow::Result;
use base64::Engine;

/// Session identifier alphabet: ASCII letters and digits.
const SESSION_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a locally minted gRPC session identifier.
pub const SESSION_ID_LEN: usize = 5;

/// What a transport needs to log in.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// REST only: basic-auth user name.
    pub username: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("username", &self.username)
            .finish()
    }
}

impl Credentials {
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            email: config.email.clone().unwrap_or_default(),
            password: config.password.clone().unwrap_or_default(),
            username: config
                .username
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Outcome of a login exchange, before the session identifier is attached.
#[derive(Debug, Clone)]
pub struct Login {
    /// Per-session token (gRPC `cai-token`) or the basic-auth header value (REST). None when unauthenticated REST.
    pub auth_token: Option<String>,
    pub session_id: String,
}

/// Authenticated session. Immutable after login; shared read-only by all turns.
#[derive(Clone)]
pub struct Session {
    pub base_url: String,
    pub project_id: String,
    pub language_code: String,
    pub auth_token: Option<String>,
    pub session_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("language_code", &self.language_code)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl Session {
    pub fn new(config: &ConnectorConfig, login: Login) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            project_id: config.project_id().to_string(),
            language_code: config.language_code().to_string(),
            auth_token: login.auth_token,
            session_id: login.session_id,
        }
    }

    /// `projects/{project}/agent/sessions/{session}`.
    pub fn session_path(&self) -> String {
        format!(
            "projects/{}/agent/sessions/{}",
            self.project_id, self.session_id
        )
    }
}

/// Mint a random alphanumeric session identifier of [`SESSION_ID_LEN`] characters.
pub fn mint_session_id() -> Result<String> {
    // 248 = 4 * 62: bytes above it are rejected so every symbol is equally likely.
    const LIMIT: u8 = 248;
    let mut id = String::with_capacity(SESSION_ID_LEN);
    let mut bytes = [0u8; 16];
    while id.len() < SESSION_ID_LEN {
        getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {}", e))?;
        for b in bytes.iter().copied().filter(|b| *b < LIMIT) {
            if id.len() == SESSION_ID_LEN {
                break;
            }
            id.push(SESSION_ID_ALPHABET[(b as usize) % SESSION_ID_ALPHABET.len()] as char);
        }
    }
    Ok(id)
}

/// `Basic base64(username:password)`.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}
