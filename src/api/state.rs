//! Application state for the API server

use crate::access::AccessService;
use crate::content::{ArticleSource, InMemoryArticleSource};
use crate::gate::CrawlerDetector;
use crate::{Config, Result};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,

    /// Where articles come from
    pub source: Arc<dyn ArticleSource>,

    /// Server side of the unlock endpoint
    pub access: Arc<AccessService>,

    /// Indexing-agent heuristic for server-rendered pages
    pub crawler: CrawlerDetector,
}

impl AppState {
    /// Create state over an existing article source
    pub fn new(config: Arc<Config>, source: Arc<dyn ArticleSource>) -> Self {
        let crawler = CrawlerDetector::from_config(&config.gate);
        let access = Arc::new(AccessService::new(
            source.clone(),
            config.gate.access_policy.clone(),
            crawler.clone(),
        ));

        Self {
            config,
            source,
            access,
            crawler,
        }
    }

    /// Create state from configuration, loading the content file if one is set
    pub async fn from_config(config: Arc<Config>) -> Result<Self> {
        config.validate()?;

        let source = match &config.content.content_path {
            Some(path) => InMemoryArticleSource::from_json_file(path).await?,
            None => {
                tracing::warn!("no content path configured, serving an empty site");
                InMemoryArticleSource::default()
            }
        };

        Ok(Self::new(config, Arc::new(source)))
    }
}
