//! Configuration types for gated-content

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Site-wide metadata used when rendering pages
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteConfig {
    /// Public host name, used for canonical URLs in structured data
    #[serde(default = "default_host")]
    pub host: String,

    /// Author name placed in structured data
    #[serde(default = "default_author")]
    pub author: String,

    /// How long a rendered article may be served before it is regenerated (default: 300s)
    #[serde(default = "default_revalidate", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub revalidate: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            author: default_author(),
            revalidate: default_revalidate(),
        }
    }
}

/// Which access tokens the unlock endpoint accepts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "tokens", rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Any non-blank token unlocks the article
    #[default]
    AnyNonEmpty,
    /// Only one of the listed tokens (compared case-sensitively) unlocks the article
    Tokens(Vec<String>),
}

/// Gating behaviour (unlock endpoint, crawler detection, access policy)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GateConfig {
    /// Unlock endpoint the client posts to (default: "http://127.0.0.1:3000/api/gated-content")
    #[serde(default = "default_unlock_endpoint")]
    pub unlock_endpoint: String,

    /// Per-request timeout for the unlock fetch (None = transport default)
    #[serde(default, with = "optional_duration_serde")]
    #[schema(value_type = Option<u64>)]
    pub request_timeout: Option<Duration>,

    /// Identity substrings that mark an indexing agent (default: ["googlebot"])
    #[serde(default = "default_indexing_agents")]
    pub indexing_agents: Vec<String>,

    /// Tokens accepted by the unlock endpoint
    #[serde(default)]
    #[schema(value_type = Object)]
    pub access_policy: AccessPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            unlock_endpoint: default_unlock_endpoint(),
            request_timeout: None,
            indexing_agents: default_indexing_agents(),
            access_policy: AccessPolicy::default(),
        }
    }
}

/// Where article content comes from
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ContentConfig {
    /// JSON file holding an array of content items (None = start empty)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub content_path: Option<PathBuf>,

    /// Allow `?preview=true` to expose drafts (default: false)
    #[serde(default)]
    pub preview_enabled: bool,
}

/// API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Main configuration
///
/// Every section has defaults, so `Config::default()` serves a local site with
/// the permissive access policy and `googlebot` as the only indexing agent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Site metadata
    #[serde(default)]
    pub site: SiteConfig,

    /// Gating behaviour
    #[serde(default)]
    pub gate: GateConfig,

    /// Content source
    #[serde(default)]
    pub content: ContentConfig,

    /// API server
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Check settings that serde cannot validate on its own
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.gate.unlock_endpoint).map_err(|e| Error::Config {
            message: format!("invalid unlock endpoint '{}': {}", self.gate.unlock_endpoint, e),
            key: Some("gate.unlock_endpoint".to_string()),
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("unlock endpoint must be http(s), got '{}'", endpoint.scheme()),
                key: Some("gate.unlock_endpoint".to_string()),
            });
        }

        if self
            .gate
            .indexing_agents
            .iter()
            .any(|agent| agent.trim().is_empty())
        {
            return Err(Error::Config {
                message: "indexing agent tokens must not be blank".to_string(),
                key: Some("gate.indexing_agents".to_string()),
            });
        }

        if let AccessPolicy::Tokens(tokens) = &self.gate.access_policy
            && tokens.is_empty()
        {
            return Err(Error::Config {
                message: "token access policy needs at least one token".to_string(),
                key: Some("gate.access_policy".to_string()),
            });
        }

        Ok(())
    }
}

fn default_host() -> String {
    "localhost:3000".into()
}

fn default_author() -> String {
    "Site Author".into()
}

fn default_revalidate() -> Duration {
    Duration::from_secs(300)
}

fn default_unlock_endpoint() -> String {
    "http://127.0.0.1:3000/api/gated-content".into()
}

fn default_indexing_agents() -> Vec<String> {
    vec!["googlebot".into()]
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.site.revalidate, Duration::from_secs(300));
        assert_eq!(config.gate.indexing_agents, vec!["googlebot".to_string()]);
        assert_eq!(config.gate.access_policy, AccessPolicy::AnyNonEmpty);
        assert!(config.gate.request_timeout.is_none());
        assert!(!config.content.preview_enabled);
        assert!(config.server.api.swagger_ui);
        config.validate().unwrap();
    }

    #[test]
    fn durations_are_plain_seconds() {
        let json = r#"{
            "site": { "revalidate": 60 },
            "gate": { "request_timeout": 5 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.site.revalidate, Duration::from_secs(60));
        assert_eq!(config.gate.request_timeout, Some(Duration::from_secs(5)));

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["site"]["revalidate"], 60);
        assert_eq!(value["gate"]["request_timeout"], 5);
    }

    #[test]
    fn token_policy_parses_from_tagged_json() {
        let json = r#"{ "gate": { "access_policy": { "mode": "tokens", "tokens": ["Pineapple"] } } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.gate.access_policy,
            AccessPolicy::Tokens(vec!["Pineapple".into()])
        );
    }

    #[test]
    fn validate_rejects_unparseable_endpoint() {
        let mut config = Config::default();
        config.gate.unlock_endpoint = "not a url".into();

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("gate.unlock_endpoint")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.gate.unlock_endpoint = "ftp://example.com/unlock".into();

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_agent_and_empty_token_list() {
        let mut config = Config::default();
        config.gate.indexing_agents = vec!["  ".into()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gate.access_policy = AccessPolicy::Tokens(vec![]);
        assert!(config.validate().is_err());
    }
}
