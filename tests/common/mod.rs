//! Shared helpers for integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use gated_content::api::{AppState, serve_on};
use gated_content::{ArticleId, Config, ContentItem, InMemoryArticleSource, RichTextViewModel, Seo};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub const GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// A site served on an ephemeral port
pub struct TestSite {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<gated_content::Result<()>>,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn unlock_endpoint(&self) -> String {
        self.url("/api/gated-content")
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

pub fn gated_item(slug: &str) -> ContentItem {
    ContentItem {
        id: ArticleId::new(format!("id-{slug}")),
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        date: Some("2024-03-01T09:00:00Z".parse().unwrap()),
        image: None,
        seo: Seo::default(),
        is_gated: true,
        lead_content: Some(RichTextViewModel::from_html("<p>Teaser text</p>")),
        body: Some(RichTextViewModel::from_html("<p>The whole story</p>")),
        draft: false,
    }
}

/// Serve `items` with `config` on 127.0.0.1:0
pub async fn spawn_site(config: Config, items: Vec<ContentItem>) -> TestSite {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = AppState::new(
        Arc::new(config),
        Arc::new(InMemoryArticleSource::new(items)),
    );

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve_on(listener, state, async move {
        let _ = rx.await;
    }));

    TestSite {
        addr,
        shutdown: Some(tx),
        handle,
    }
}
