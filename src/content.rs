//! Article loading
//!
//! An [`ArticleSource`] hands out stored [`ContentItem`]s; [`prepare_article`]
//! turns one into the [`Article`] the resolver sees, withholding the body of
//! gated articles and the lead of free ones.

use crate::error::{Error, Result};
use crate::types::{Article, ContentItem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Source of stored articles
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Look up a stored item by slug; drafts are only returned when `preview` is set
    async fn get_item(&self, slug: &str, preview: bool) -> Result<Option<ContentItem>>;

    /// Slugs of every published article, newest first, for static path enumeration
    async fn list_slugs(&self) -> Result<Vec<String>>;
}

/// Apply the gating invariant to a stored item
///
/// Gated articles keep only their lead; their body is fetched later through
/// the unlock endpoint. Free articles keep only their body.
pub fn prepare_article(item: ContentItem) -> Article {
    let (lead_content, body) = if item.is_gated {
        (item.lead_content, None)
    } else {
        (None, item.body)
    };

    Article {
        id: item.id,
        slug: item.slug,
        title: item.title,
        date: item.date,
        image: item.image,
        seo: item.seo,
        is_gated: item.is_gated,
        lead_content,
        body,
    }
}

/// Load a prepared article by slug
pub async fn load_article(
    source: &dyn ArticleSource,
    slug: &str,
    preview: bool,
) -> Result<Option<Article>> {
    let item = source.get_item(slug, preview).await?;
    Ok(item.map(prepare_article))
}

/// Article source held in memory
#[derive(Debug, Default)]
pub struct InMemoryArticleSource {
    items: RwLock<HashMap<String, ContentItem>>,
}

impl InMemoryArticleSource {
    /// Create a source holding `items`
    ///
    /// A later item with the same slug replaces an earlier one.
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.slug.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    /// Load a JSON array of content items from `path`
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await?;
        let items: Vec<ContentItem> = serde_json::from_slice(&raw)?;

        for item in &items {
            if item.slug.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("content item {} has an empty slug", item.id),
                    key: Some("content.content_path".to_string()),
                });
            }
        }

        tracing::info!(path = ?path, count = items.len(), "loaded content items");
        Ok(Self::new(items))
    }

    /// Insert or replace an item
    pub async fn upsert(&self, item: ContentItem) {
        self.items.write().await.insert(item.slug.clone(), item);
    }
}

#[async_trait]
impl ArticleSource for InMemoryArticleSource {
    async fn get_item(&self, slug: &str, preview: bool) -> Result<Option<ContentItem>> {
        let items = self.items.read().await;
        let item = items
            .get(slug)
            .filter(|item| preview || !item.draft)
            .cloned();
        Ok(item)
    }

    async fn list_slugs(&self) -> Result<Vec<String>> {
        let items = self.items.read().await;
        let mut published: Vec<&ContentItem> = items.values().filter(|i| !i.draft).collect();
        published.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(published.into_iter().map(|i| i.slug.clone()).collect())
    }
}
