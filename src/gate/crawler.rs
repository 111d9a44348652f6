//! Indexing-agent detection
//!
//! A case-insensitive substring match of known agent tokens against the
//! client identity string. This only decides whether to reveal content for
//! search ranking; anyone can claim to be a crawler, so never use it to
//! protect anything sensitive.

use crate::config::GateConfig;

/// Detects indexing agents from a client identity string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlerDetector {
    /// Lowercased agent tokens
    tokens: Vec<String>,
}

impl CrawlerDetector {
    /// Create a detector for the given agent tokens
    ///
    /// Blank tokens are dropped; an empty token would match every client.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    /// Create a detector from the gate configuration
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(&config.indexing_agents)
    }

    /// Whether `client_identity` looks like an indexing agent
    pub fn is_indexing_agent(&self, client_identity: &str) -> bool {
        if client_identity.is_empty() {
            return false;
        }

        let identity = client_identity.to_lowercase();
        self.tokens.iter().any(|token| identity.contains(token))
    }

    /// The configured tokens, lowercased
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Default for CrawlerDetector {
    fn default() -> Self {
        Self::new(["googlebot"])
    }
}
