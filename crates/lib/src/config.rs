//! Connector configuration (capabilities), defaults, validation and loading.
//!
//! Capabilities are supplied by the host as a flat JSON object keyed by capability name
//! (e.g. `ONDEWO_EMAIL`). Each capability can be overridden by an environment variable of the same name.

use crate::error::ConnectorError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Capability names recognized by the connector.
pub mod caps {
    pub const ONDEWO_TRANSPORT: &str = "ONDEWO_TRANSPORT";
    pub const ONDEWO_BASEURL: &str = "ONDEWO_BASEURL";
    pub const ONDEWO_EMAIL: &str = "ONDEWO_EMAIL";
    pub const ONDEWO_PASSWORD: &str = "ONDEWO_PASSWORD";
    pub const ONDEWO_AUTH_TOKEN: &str = "ONDEWO_AUTH_TOKEN";
    pub const ONDEWO_PROJECT_ID: &str = "ONDEWO_PROJECT_ID";
    pub const ONDEWO_LANGUAGE_CODE: &str = "ONDEWO_LANGUAGE_CODE";
    pub const ONDEWO_USERNAME: &str = "ONDEWO_USERNAME";
    pub const ONDEWO_TIMEZONE: &str = "ONDEWO_TIMEZONE";
    pub const ONDEWO_FIELD_NAMING: &str = "ONDEWO_FIELD_NAMING";
}

pub const DEFAULT_GRPC_BASE_URL: &str = "grpc-nlu.ondewo.com:443";
pub const DEFAULT_LANGUAGE_CODE: &str = "en";
pub const DEFAULT_REST_PROJECT_ID: &str = "botium";
pub const DEFAULT_TIMEZONE: &str = "Europe/Vienna";

/// Which wire interface the connector talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Native gRPC interface (login + session token).
    #[default]
    Grpc,
    /// HTTP/JSON gateway (optional basic auth, no login call).
    Rest,
}

/// JSON field naming used by the REST gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldNaming {
    /// `query_input`, `language_code`, ...
    #[default]
    Snake,
    /// `queryInput`, `languageCode`, ...
    Camel,
}

impl FieldNaming {
    /// Render a snake_case field name in this naming.
    pub fn key(self, snake: &str) -> String {
        match self {
            FieldNaming::Snake => snake.to_string(),
            FieldNaming::Camel => snake_to_camel(snake),
        }
    }
}

fn snake_to_camel(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Connector capabilities as supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(rename = "ONDEWO_TRANSPORT", default)]
    pub transport: TransportKind,

    /// gRPC `host:port`, or the REST gateway root URL.
    #[serde(rename = "ONDEWO_BASEURL", default)]
    pub base_url: Option<String>,

    #[serde(rename = "ONDEWO_EMAIL", default)]
    pub email: Option<String>,

    #[serde(rename = "ONDEWO_PASSWORD", default)]
    pub password: Option<String>,

    /// Pre-shared value sent as `Authorization` metadata on every gRPC call.
    #[serde(rename = "ONDEWO_AUTH_TOKEN", default)]
    pub auth_token: Option<String>,

    #[serde(rename = "ONDEWO_PROJECT_ID", default)]
    pub project_id: Option<String>,

    #[serde(rename = "ONDEWO_LANGUAGE_CODE", default)]
    pub language_code: Option<String>,

    /// REST only: when set, requests carry `Authorization: Basic base64(username:password)`.
    #[serde(rename = "ONDEWO_USERNAME", default)]
    pub username: Option<String>,

    /// REST only: `query_params.time_zone`.
    #[serde(rename = "ONDEWO_TIMEZONE", default)]
    pub timezone: Option<String>,

    #[serde(rename = "ONDEWO_FIELD_NAMING", default)]
    pub field_naming: FieldNaming,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ConnectorConfig {
    /// Fill in defaults for unset capabilities.
    pub fn with_defaults(mut self) -> Self {
        if non_blank(&self.language_code).is_none() {
            self.language_code = Some(DEFAULT_LANGUAGE_CODE.to_string());
        }
        match self.transport {
            TransportKind::Grpc => {
                if non_blank(&self.base_url).is_none() {
                    self.base_url = Some(DEFAULT_GRPC_BASE_URL.to_string());
                }
            }
            TransportKind::Rest => {
                if non_blank(&self.project_id).is_none() {
                    self.project_id = Some(DEFAULT_REST_PROJECT_ID.to_string());
                }
                if non_blank(&self.timezone).is_none() {
                    self.timezone = Some(DEFAULT_TIMEZONE.to_string());
                }
            }
        }
        self
    }

    /// Check required capabilities for the configured transport. Returns the first missing one.
    pub fn validate(&self) -> Result<(), ConnectorError> {
        let require = |value: &Option<String>, name: &'static str| {
            non_blank(value)
                .map(|_| ())
                .ok_or(ConnectorError::MissingCapability(name))
        };
        require(&self.base_url, caps::ONDEWO_BASEURL)?;
        match self.transport {
            TransportKind::Grpc => {
                require(&self.email, caps::ONDEWO_EMAIL)?;
                require(&self.password, caps::ONDEWO_PASSWORD)?;
                require(&self.auth_token, caps::ONDEWO_AUTH_TOKEN)?;
                require(&self.project_id, caps::ONDEWO_PROJECT_ID)?;
            }
            TransportKind::Rest => {
                let base = self.base_url().trim();
                if !(base.starts_with("http://") || base.starts_with("https://")) {
                    return Err(ConnectorError::Config(format!(
                        "{} must be an http(s) url for the rest transport",
                        caps::ONDEWO_BASEURL
                    )));
                }
                if non_blank(&self.username).is_some() && self.password.is_none() {
                    return Err(ConnectorError::MissingCapability(caps::ONDEWO_PASSWORD));
                }
            }
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        non_blank(&self.base_url).unwrap_or(DEFAULT_GRPC_BASE_URL)
    }

    pub fn project_id(&self) -> &str {
        non_blank(&self.project_id).unwrap_or(DEFAULT_REST_PROJECT_ID)
    }

    pub fn language_code(&self) -> &str {
        non_blank(&self.language_code).unwrap_or(DEFAULT_LANGUAGE_CODE)
    }

    pub fn timezone(&self) -> &str {
        non_blank(&self.timezone).unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Apply environment overrides: each capability env var, when set and non-empty, replaces the file value.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let overrides: [(&str, &mut Option<String>); 8] = [
            (caps::ONDEWO_BASEURL, &mut self.base_url),
            (caps::ONDEWO_EMAIL, &mut self.email),
            (caps::ONDEWO_PASSWORD, &mut self.password),
            (caps::ONDEWO_AUTH_TOKEN, &mut self.auth_token),
            (caps::ONDEWO_PROJECT_ID, &mut self.project_id),
            (caps::ONDEWO_LANGUAGE_CODE, &mut self.language_code),
            (caps::ONDEWO_USERNAME, &mut self.username),
            (caps::ONDEWO_TIMEZONE, &mut self.timezone),
        ];
        for (name, slot) in overrides {
            if let Some(v) = value(name) {
                *slot = Some(v);
            }
        }
        if let Some(v) = value(caps::ONDEWO_TRANSPORT) {
            self.transport = serde_json::from_value(serde_json::Value::String(v.to_lowercase()))
                .with_context(|| format!("parsing {} from environment", caps::ONDEWO_TRANSPORT))?;
        }
        if let Some(v) = value(caps::ONDEWO_FIELD_NAMING) {
            self.field_naming = serde_json::from_value(serde_json::Value::String(v.to_lowercase()))
                .with_context(|| format!("parsing {} from environment", caps::ONDEWO_FIELD_NAMING))?;
        }
        Ok(self)
    }
}

/// Load capabilities from a JSON file, then apply environment overrides. Missing file => empty capability set.
pub fn load_config(path: &Path) -> Result<ConnectorConfig> {
    read_config_file(path)?.apply_env()
}

fn read_config_file(path: &Path) -> Result<ConnectorConfig> {
    if !path.exists() {
        log::debug!("capability file not found, using environment only: {}", path.display());
        return Ok(ConnectorConfig::default());
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading capabilities from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing capabilities from {}", path.display()))
}

/// Default capability file: `ONDEWO_CONFIG_PATH` or `./ondewo.json`.
pub fn default_config_path() -> PathBuf {
    config_path_or_default(std::env::var("ONDEWO_CONFIG_PATH").ok())
}

fn config_path_or_default(configured: Option<String>) -> PathBuf {
    configured
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ondewo.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn grpc_config() -> ConnectorConfig {
        ConnectorConfig {
            email: Some("bot@example.com".into()),
            password: Some("secret".into()),
            auth_token: Some("Basic abc".into()),
            project_id: Some("proj-1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_base_url_and_language() {
        let config = grpc_config().with_defaults();
        assert_eq!(config.base_url(), "grpc-nlu.ondewo.com:443");
        assert_eq!(config.language_code(), "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_email_is_reported_by_name() {
        let mut config = grpc_config();
        config.email = Some("   ".into());
        let err = config.with_defaults().validate().unwrap_err();
        assert!(matches!(err, ConnectorError::MissingCapability("ONDEWO_EMAIL")));
    }

    #[test]
    fn missing_capabilities_are_checked_in_order() {
        let err = ConnectorConfig::default()
            .with_defaults()
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConnectorError::MissingCapability("ONDEWO_EMAIL")));

        let mut config = grpc_config();
        config.auth_token = None;
        config.project_id = None;
        let err = config.with_defaults().validate().unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::MissingCapability("ONDEWO_AUTH_TOKEN")
        ));
    }

    #[test]
    fn rest_requires_http_base_url() {
        let config = ConnectorConfig {
            transport: TransportKind::Rest,
            ..Default::default()
        }
        .with_defaults();
        assert!(matches!(
            config.validate(),
            Err(ConnectorError::MissingCapability("ONDEWO_BASEURL"))
        ));

        let config = ConnectorConfig {
            transport: TransportKind::Rest,
            base_url: Some("nlu.example.com:443".into()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConnectorError::Config(_))));
    }

    #[test]
    fn rest_defaults_project_and_timezone() {
        let config = ConnectorConfig {
            transport: TransportKind::Rest,
            base_url: Some("https://nlu.example.com".into()),
            ..Default::default()
        }
        .with_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.project_id(), "botium");
        assert_eq!(config.timezone(), "Europe/Vienna");
    }

    #[test]
    fn parses_capability_json() {
        let config: ConnectorConfig = serde_json::from_str(
            r#"{
                "ONDEWO_TRANSPORT": "rest",
                "ONDEWO_BASEURL": "https://nlu.example.com",
                "ONDEWO_USERNAME": "tester",
                "ONDEWO_PASSWORD": "pw",
                "ONDEWO_FIELD_NAMING": "camel"
            }"#,
        )
        .unwrap();
        assert_eq!(config.transport, TransportKind::Rest);
        assert_eq!(config.field_naming, FieldNaming::Camel);
        assert_eq!(config.username.as_deref(), Some("tester"));
    }

    fn temp_config(contents: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("ondewo-config-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("ondewo.json");
        std::fs::write(&path, contents).expect("write ondewo.json");
        (dir, path)
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| pairs.get(name).cloned()
    }

    #[test]
    fn missing_file_is_an_empty_capability_set() {
        let path = std::env::temp_dir()
            .join(format!("ondewo-config-test-{}", uuid::Uuid::new_v4()))
            .join("ondewo.json");
        let config = read_config_file(&path).unwrap();
        assert!(config.email.is_none());
        assert!(config.base_url.is_none());
        assert_eq!(config.transport, TransportKind::Grpc);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let (dir, path) = temp_config("{ not json");
        let err = load_config(&path).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("parsing capabilities from"), "{msg}");
        assert!(msg.contains(&path.display().to_string()), "{msg}");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn environment_overrides_file_values() {
        let (dir, path) = temp_config(
            r#"{ "ONDEWO_EMAIL": "file@example.com", "ONDEWO_PROJECT_ID": "from-file" }"#,
        );
        let config = read_config_file(&path)
            .unwrap()
            .apply_overrides(env_of(&[
                ("ONDEWO_EMAIL", " env@example.com "),
                ("ONDEWO_TRANSPORT", "REST"),
                ("ONDEWO_FIELD_NAMING", "camel"),
            ]))
            .unwrap();
        assert_eq!(config.email.as_deref(), Some("env@example.com"));
        assert_eq!(config.project_id.as_deref(), Some("from-file"));
        assert_eq!(config.transport, TransportKind::Rest);
        assert_eq!(config.field_naming, FieldNaming::Camel);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let config = ConnectorConfig {
            email: Some("file@example.com".into()),
            ..Default::default()
        }
        .apply_overrides(env_of(&[("ONDEWO_EMAIL", "   "), ("ONDEWO_TRANSPORT", "")]))
        .unwrap();
        assert_eq!(config.email.as_deref(), Some("file@example.com"));
        assert_eq!(config.transport, TransportKind::Grpc);
    }

    #[test]
    fn unknown_transport_in_environment_is_an_error() {
        let err = ConnectorConfig::default()
            .apply_overrides(env_of(&[("ONDEWO_TRANSPORT", "soap")]))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("parsing ONDEWO_TRANSPORT from environment"));
    }

    #[test]
    fn config_path_falls_back_to_working_directory() {
        assert_eq!(config_path_or_default(None), PathBuf::from("ondewo.json"));
        assert_eq!(config_path_or_default(Some(" ".into())), PathBuf::from("ondewo.json"));
        assert_eq!(
            config_path_or_default(Some("/etc/ondewo/caps.json".into())),
            PathBuf::from("/etc/ondewo/caps.json")
        );
    }

    #[test]
    fn camel_naming_converts_snake_keys() {
        assert_eq!(FieldNaming::Camel.key("reset_contexts"), "resetContexts");
        assert_eq!(FieldNaming::Camel.key("text"), "text");
        assert_eq!(FieldNaming::Snake.key("query_input"), "query_input");
    }
}
