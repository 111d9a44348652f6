//! # gated-content
//!
//! Progressive disclosure of gated blog articles.
//!
//! Every article carries a short lead excerpt. Gated articles reveal their
//! full body only after the reader submits an access token, or when the page
//! is requested by a search-engine indexing agent. Free articles show their
//! body straight away.
//!
//! The crate has three layers:
//! - **[`gate`]** - the per-page state machine ([`GatedContentResolver`]), the
//!   indexing-agent heuristic and the unlock client
//! - **[`content`] / [`access`]** - article loading and the server side of the
//!   unlock endpoint
//! - **[`api`]** - an axum server exposing the unlock endpoint, article
//!   lookups and server-rendered pages
//!
//! ## Quick Start
//!
//! ```no_run
//! use gated_content::{CrawlerDetector, GatedContentResolver, HttpUnlockClient, ViewKind};
//! use std::sync::Arc;
//!
//! # async fn example(article: gated_content::Article) -> gated_content::Result<()> {
//! let client = Arc::new(HttpUnlockClient::new(
//!     "https://blog.example.com/api/gated-content",
//!     None,
//! )?);
//! let resolver = GatedContentResolver::with_article(article, client, CrawlerDetector::default());
//!
//! // Subscribe to view changes
//! let mut events = resolver.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//! });
//!
//! resolver.mount("Mozilla/5.0 (X11; Linux x86_64)").await;
//! resolver.submit("Pineapple").await;
//! assert_eq!(resolver.kind(), ViewKind::Unlocked);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Server side of the unlock endpoint
pub mod access;
/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Article sources and preparation
pub mod content;
/// Error types
pub mod error;
/// Gate state machine, crawler heuristic and unlock client
pub mod gate;
/// Html regions and structured data
pub mod render;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use access::AccessService;
pub use config::{AccessPolicy, Config, GateConfig, SiteConfig};
pub use content::{ArticleSource, InMemoryArticleSource, load_article, prepare_article};
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus, UnlockError};
pub use gate::{
    CrawlerDetector, GateView, GatedContentResolver, HttpUnlockClient, SubmitOutcome,
    UnlockClient, ViewKind,
};
pub use render::Region;
pub use types::{
    Article, ArticleId, ContentItem, GateEvent, RichTextViewModel, Seo, UnlockRequest,
    UnlockResponse,
};

/// Serve the site from `config` until a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use gated_content::{Config, serve_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     serve_with_shutdown(Config::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn serve_with_shutdown(config: Config) -> Result<()> {
    let state = api::AppState::from_config(std::sync::Arc::new(config)).await?;
    api::serve(state, wait_for_signal()).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
