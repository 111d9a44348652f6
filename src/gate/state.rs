//! Gate view state and its pure transition function

use crate::error::{Error, Result};
use crate::types::{Article, RichTextViewModel, UnlockRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Discriminant of [`GateView`], cheap to copy into events and logs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Route resolution still pending
    LoadingPlaceholder,
    /// No article for the requested slug
    Missing,
    /// Unlock fetch outstanding
    Fetching,
    /// Lead excerpt plus unlock form
    LeadOnly,
    /// Full body after a successful unlock
    Unlocked,
    /// Full body of an ungated article
    Free,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViewKind::LoadingPlaceholder => "loading_placeholder",
            ViewKind::Missing => "missing",
            ViewKind::Fetching => "fetching",
            ViewKind::LeadOnly => "lead_only",
            ViewKind::Unlocked => "unlocked",
            ViewKind::Free => "free",
        };
        f.write_str(s)
    }
}

/// What the page currently shows for an article
///
/// Each variant owns exactly the data its region needs, so combinations like
/// "fetching while a body is shown" cannot be represented.
#[derive(Clone, Debug, PartialEq)]
pub enum GateView {
    /// Route resolution still pending; no article data may be accessed
    LoadingPlaceholder,
    /// No article exists for `slug`
    Missing {
        /// The slug that was requested
        slug: String,
    },
    /// An unlock fetch is outstanding
    Fetching {
        /// The gated article
        article: Arc<Article>,
    },
    /// Gated and not unlocked
    LeadOnly {
        /// The gated article
        article: Arc<Article>,
    },
    /// Gated and unlocked
    Unlocked {
        /// The gated article
        article: Arc<Article>,
        /// Body obtained from the unlock fetch (or preloaded)
        body: RichTextViewModel,
    },
    /// Not gated
    Free {
        /// The free article
        article: Arc<Article>,
    },
}

/// Input driving a [`GateView`] transition
#[derive(Clone, Debug, PartialEq)]
pub enum GateInput {
    /// The routing layer finished resolving the slug
    RouteResolved {
        /// Requested slug
        slug: String,
        /// Article found for the slug, if any
        article: Option<Article>,
    },
    /// The view was mounted for a client
    Mounted {
        /// Whether the client identity matched an indexing agent
        indexing_agent: bool,
    },
    /// The user submitted the unlock form
    Submitted {
        /// Token typed into the form
        access_token: String,
    },
    /// The unlock fetch finished; `None` covers both failure and "no content"
    FetchSettled(Option<RichTextViewModel>),
}

/// Side effect requested by a transition
#[derive(Clone, Debug, PartialEq)]
pub enum GateEffect {
    /// Issue exactly one unlock fetch
    Unlock(UnlockRequest),
}

/// Result of [`transition`]
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// The next view
    pub view: GateView,
    /// Side effect to perform, if any
    pub effect: Option<GateEffect>,
}

impl Transition {
    fn stay(view: GateView) -> Self {
        Self { view, effect: None }
    }
}

impl GateView {
    /// Initial view for a resolved article
    ///
    /// Driven only by `is_gated`; a gated article that already carries a body
    /// starts unlocked.
    pub fn initial(article: Arc<Article>) -> Self {
        if !article.is_gated {
            return GateView::Free { article };
        }

        match article.body.clone() {
            Some(body) => GateView::Unlocked { article, body },
            None => GateView::LeadOnly { article },
        }
    }

    /// The variant discriminant
    pub fn kind(&self) -> ViewKind {
        match self {
            GateView::LoadingPlaceholder => ViewKind::LoadingPlaceholder,
            GateView::Missing { .. } => ViewKind::Missing,
            GateView::Fetching { .. } => ViewKind::Fetching,
            GateView::LeadOnly { .. } => ViewKind::LeadOnly,
            GateView::Unlocked { .. } => ViewKind::Unlocked,
            GateView::Free { .. } => ViewKind::Free,
        }
    }

    /// The resolved article
    ///
    /// Fails with [`Error::RouteNotReady`] while loading and
    /// [`Error::ArticleMissing`] when nothing was found.
    pub fn article(&self) -> Result<&Article> {
        match self {
            GateView::LoadingPlaceholder => Err(Error::RouteNotReady),
            GateView::Missing { slug } => Err(Error::ArticleMissing { slug: slug.clone() }),
            GateView::Fetching { article }
            | GateView::LeadOnly { article }
            | GateView::Unlocked { article, .. }
            | GateView::Free { article } => Ok(article),
        }
    }

    /// Slug of the resolved article, or the slug that was not found
    pub fn slug(&self) -> Option<&str> {
        match self {
            GateView::LoadingPlaceholder => None,
            GateView::Missing { slug } => Some(slug),
            _ => self.article().ok().map(|a| a.slug.as_str()),
        }
    }

    /// Lead excerpt, shown only in [`GateView::LeadOnly`]
    pub fn lead(&self) -> Option<&RichTextViewModel> {
        match self {
            GateView::LeadOnly { article } => article.lead_content.as_ref(),
            _ => None,
        }
    }

    /// Full body, shown only when unlocked or free
    pub fn body(&self) -> Option<&RichTextViewModel> {
        match self {
            GateView::Unlocked { body, .. } => Some(body),
            GateView::Free { article } => article.body.as_ref(),
            _ => None,
        }
    }

    /// Whether the unlock form is reachable
    pub fn shows_gate_form(&self) -> bool {
        matches!(self, GateView::LeadOnly { .. })
    }
}

/// Compute the next view for `input`
///
/// Inputs that do not apply to the current view leave it unchanged and
/// request no effect. In particular nothing leaves `Unlocked` or `Free`, and
/// submissions are only honoured from `LeadOnly`, so at most one unlock fetch
/// is ever outstanding.
pub fn transition(view: GateView, input: GateInput) -> Transition {
    match (view, input) {
        (GateView::LoadingPlaceholder, GateInput::RouteResolved { slug, article }) => {
            match article {
                Some(article) => Transition::stay(GateView::initial(Arc::new(article))),
                None => Transition::stay(GateView::Missing { slug }),
            }
        }

        (GateView::LeadOnly { article }, GateInput::Mounted { indexing_agent: true }) => {
            let request = UnlockRequest {
                slug: article.slug.clone(),
                access_control: None,
            };
            Transition {
                view: GateView::Fetching { article },
                effect: Some(GateEffect::Unlock(request)),
            }
        }

        (GateView::LeadOnly { article }, GateInput::Submitted { access_token }) => {
            // The form marks the field as required
            if access_token.trim().is_empty() {
                return Transition::stay(GateView::LeadOnly { article });
            }

            let request = UnlockRequest {
                slug: article.slug.clone(),
                access_control: Some(access_token),
            };
            Transition {
                view: GateView::Fetching { article },
                effect: Some(GateEffect::Unlock(request)),
            }
        }

        (GateView::Fetching { article }, GateInput::FetchSettled(result)) => match result {
            Some(body) => Transition::stay(GateView::Unlocked { article, body }),
            None => Transition::stay(GateView::LeadOnly { article }),
        },

        (view, _) => Transition::stay(view),
    }
}
