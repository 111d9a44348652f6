//! Serve a one-article site on 127.0.0.1:3000
//!
//! ```text
//! cargo run --example serve_site
//! curl http://127.0.0.1:3000/articles/hello-world
//! curl -A Googlebot http://127.0.0.1:3000/articles/hello-world
//! curl -X POST http://127.0.0.1:3000/api/gated-content \
//!      -H 'content-type: application/json' \
//!      -d '{"slug":"hello-world","accessControl":"Pineapple"}'
//! ```

use gated_content::api::{self, AppState};
use gated_content::{ArticleId, Config, ContentItem, InMemoryArticleSource, RichTextViewModel, Seo};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gated_content=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let article = ContentItem {
        id: ArticleId::new("1"),
        slug: "hello-world".to_string(),
        title: "Hello, world".to_string(),
        date: Some("2024-03-01T09:00:00Z".parse()?),
        image: None,
        seo: Seo {
            title: "Hello, world".to_string(),
            description: "The first post on this site".to_string(),
            canonical_url: "/articles/hello-world".to_string(),
            ..Default::default()
        },
        is_gated: true,
        lead_content: Some(RichTextViewModel::from_html(
            "<p>Every story starts somewhere.</p>",
        )),
        body: Some(RichTextViewModel::from_html(
            "<p>Every story starts somewhere. This one starts behind a gate.</p>",
        )),
        draft: false,
    };

    let config = Arc::new(Config::default());
    let state = AppState::new(config, Arc::new(InMemoryArticleSource::new([article])));

    api::serve(state, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    Ok(())
}
