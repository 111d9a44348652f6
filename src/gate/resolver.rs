//! Resolver driving a [`GateView`] for one page view

use super::client::UnlockClient;
use super::crawler::CrawlerDetector;
use super::state::{GateEffect, GateInput, GateView, ViewKind, transition};
use crate::render::Region;
use crate::types::{Article, GateEvent, UnlockRequest};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Outcome of [`GatedContentResolver::submit`]
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The body was fetched and is now shown
    Unlocked,
    /// The fetch failed or returned no content; the lead and form are shown again
    StillGated,
    /// The submission did not apply to the current view (not `LeadOnly`, or blank token)
    Ignored,
    /// The resolver was unmounted before the fetch settled; its result was discarded
    Abandoned,
}

/// Gated content state machine for one article on one page view
///
/// Cloning is cheap and every clone drives the same view. Failures of the
/// unlock fetch never escape: they are logged, broadcast as
/// [`GateEvent::UnlockFailed`], and the view falls back to the lead.
#[derive(Clone)]
pub struct GatedContentResolver {
    view: Arc<Mutex<GateView>>,
    client: Arc<dyn UnlockClient>,
    crawler: CrawlerDetector,
    client_identity: Arc<Mutex<String>>,
    event_tx: broadcast::Sender<GateEvent>,
    lifetime: CancellationToken,
}

impl GatedContentResolver {
    /// Create a resolver whose route is still being resolved
    pub fn pending(client: Arc<dyn UnlockClient>, crawler: CrawlerDetector) -> Self {
        let (event_tx, _rx) = broadcast::channel(64);
        Self {
            view: Arc::new(Mutex::new(GateView::LoadingPlaceholder)),
            client,
            crawler,
            client_identity: Arc::new(Mutex::new(String::new())),
            event_tx,
            lifetime: CancellationToken::new(),
        }
    }

    /// Create a resolver for an already loaded article
    pub fn with_article(
        article: Article,
        client: Arc<dyn UnlockClient>,
        crawler: CrawlerDetector,
    ) -> Self {
        let resolver = Self::pending(client, crawler);
        let slug = article.slug.clone();
        resolver.resolve(slug, Some(article));
        resolver
    }

    /// Subscribe to view changes and unlock failures
    pub fn subscribe(&self) -> broadcast::Receiver<GateEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current view
    pub fn view(&self) -> GateView {
        self.lock_view().clone()
    }

    /// Discriminant of the current view
    pub fn kind(&self) -> ViewKind {
        self.lock_view().kind()
    }

    /// Render the current view into its content region
    pub fn render(&self) -> Region {
        Region::from_view(&self.lock_view())
    }

    /// Whether [`unmount`](Self::unmount) has not been called yet
    pub fn is_mounted(&self) -> bool {
        !self.lifetime.is_cancelled()
    }

    /// Finish route resolution with the loaded article (or `None` if there is none)
    pub fn resolve(&self, slug: impl Into<String>, article: Option<Article>) {
        let effect = self.apply(GateInput::RouteResolved {
            slug: slug.into(),
            article,
        });
        debug_assert!(effect.is_none());
    }

    /// Mount the view for a client
    ///
    /// Records `client_identity` for later unlock fetches; the latest mount
    /// wins. If it identifies an indexing agent and the article is gated, the
    /// body is fetched right away without an access token.
    pub async fn mount(&self, client_identity: &str) -> ViewKind {
        *self.lock_identity() = client_identity.to_string();

        let kind = self.kind();
        if matches!(kind, ViewKind::LoadingPlaceholder | ViewKind::Missing) {
            tracing::debug!(view = %kind, "mount skipped, no article resolved");
            return kind;
        }

        let indexing_agent = self.crawler.is_indexing_agent(client_identity);
        tracing::debug!(
            user_agent = %client_identity,
            indexing_agent,
            "mounted gated content view"
        );

        if let Some(GateEffect::Unlock(request)) = self.apply(GateInput::Mounted { indexing_agent })
        {
            let _ = self.run_unlock(request, client_identity).await;
        }

        self.kind()
    }

    /// Submit the unlock form with `access_token`
    ///
    /// Only honoured from `LeadOnly`; while a fetch is outstanding further
    /// submissions are ignored.
    pub async fn submit(&self, access_token: &str) -> SubmitOutcome {
        let input = GateInput::Submitted {
            access_token: access_token.to_string(),
        };

        match self.apply(input) {
            Some(GateEffect::Unlock(request)) => {
                let identity = self.lock_identity().clone();
                self.run_unlock(request, &identity).await
            }
            None => {
                tracing::debug!(view = %self.kind(), "submission ignored");
                SubmitOutcome::Ignored
            }
        }
    }

    /// Tear the view down
    ///
    /// An outstanding fetch is abandoned and any result arriving afterwards is
    /// discarded. The view is frozen from here on.
    pub fn unmount(&self) {
        // Hold the view lock so no transition interleaves with cancellation
        let _view = self.lock_view();
        self.lifetime.cancel();
    }

    async fn run_unlock(&self, request: UnlockRequest, identity: &str) -> SubmitOutcome {
        tracing::debug!(
            slug = %request.slug,
            client = self.client.name(),
            with_token = request.access_control.is_some(),
            "issuing unlock fetch"
        );

        let result = tokio::select! {
            _ = self.lifetime.cancelled() => {
                tracing::debug!(slug = %request.slug, "unlock fetch abandoned on unmount");
                return SubmitOutcome::Abandoned;
            }
            result = self.client.unlock(&request, identity) => result,
        };

        let body = match result {
            Ok(Some(body)) => Some(body),
            Ok(None) => {
                tracing::debug!(slug = %request.slug, "unlock endpoint returned no content");
                None
            }
            Err(e) => {
                tracing::warn!(slug = %request.slug, error = %e, "unlock request failed");
                if self.is_mounted() {
                    self.event_tx
                        .send(GateEvent::UnlockFailed {
                            slug: request.slug.clone(),
                            error: e.to_string(),
                        })
                        .ok();
                }
                None
            }
        };

        if !self.settle(body) {
            tracing::debug!(slug = %request.slug, "discarding unlock result after unmount");
            return SubmitOutcome::Abandoned;
        }

        match self.kind() {
            ViewKind::Unlocked => SubmitOutcome::Unlocked,
            _ => SubmitOutcome::StillGated,
        }
    }

    /// Apply a fetch result; returns false if the resolver is no longer mounted
    fn settle(&self, body: Option<crate::types::RichTextViewModel>) -> bool {
        let mut view = self.lock_view();
        if self.lifetime.is_cancelled() {
            return false;
        }
        self.step(&mut view, GateInput::FetchSettled(body));
        true
    }

    fn apply(&self, input: GateInput) -> Option<GateEffect> {
        let mut view = self.lock_view();
        if self.lifetime.is_cancelled() {
            return None;
        }
        self.step(&mut view, input)
    }

    fn step(&self, view: &mut GateView, input: GateInput) -> Option<GateEffect> {
        let from = view.kind();
        let current = std::mem::replace(view, GateView::LoadingPlaceholder);
        let next = transition(current, input);
        *view = next.view;

        let to = view.kind();
        if from != to {
            tracing::debug!(slug = ?view.slug(), %from, %to, "gate view changed");
            self.event_tx
                .send(GateEvent::ViewChanged {
                    slug: view.slug().map(str::to_string),
                    from,
                    to,
                })
                .ok();
        }

        next.effect
    }

    fn lock_identity(&self) -> MutexGuard<'_, String> {
        self.client_identity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_view(&self) -> MutexGuard<'_, GateView> {
        // The view is always left in a valid state, so a poisoned lock is still usable
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
