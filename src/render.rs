//! Content regions for a gate view
//!
//! Each [`GateView`] maps to exactly one [`Region`]. Markup is deliberately
//! minimal: class names only mark which parts sit behind the paywall, so the
//! page shell can style them and crawlers can read the structured data.

use crate::config::SiteConfig;
use crate::gate::GateView;
use crate::types::{Article, RichTextViewModel};
use serde_json::json;

/// Shown while the route is still being resolved
pub const LOADING_MESSAGE: &str = "Loading...";

/// Shown while the unlock fetch is outstanding
pub const FETCHING_MESSAGE: &str = "We are loading your content! 👀";

/// Label of the access token field
pub const GATE_PROMPT: &str = "Simply enter something, anything, to access the full article.";

/// JSON unlock endpoint, advertised on the form for scripted clients
pub const UNLOCK_PATH: &str = "/api/gated-content";

/// Path prefix of server-rendered article pages; the gate form posts back here
pub const ARTICLE_PATH: &str = "/articles";

/// CSS selector of the gated part of the page, referenced from structured data
pub const PAYWALL_SELECTOR: &str = ".paywall";

/// The single content region rendered for a view
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    /// Minimal loading indicator
    LoadingIndicator,
    /// Nothing at all
    Empty,
    /// Progress message while fetching
    Progress,
    /// Lead excerpt followed by the unlock form
    Gate {
        /// Slug posted with the form
        slug: String,
        /// Lead excerpt
        lead: Option<RichTextViewModel>,
    },
    /// Full body
    Body {
        /// Body, absent only if a free article arrived without one
        body: Option<RichTextViewModel>,
    },
}

impl Region {
    /// Region for `view`
    pub fn from_view(view: &GateView) -> Self {
        match view {
            GateView::LoadingPlaceholder => Region::LoadingIndicator,
            GateView::Missing { .. } => Region::Empty,
            GateView::Fetching { .. } => Region::Progress,
            GateView::LeadOnly { article } => Region::Gate {
                slug: article.slug.clone(),
                lead: article.lead_content.clone(),
            },
            GateView::Unlocked { .. } | GateView::Free { .. } => Region::Body {
                body: view.body().cloned(),
            },
        }
    }

    /// Html for the region
    pub fn to_html(&self) -> String {
        self.html(false)
    }

    /// Html for the region on a preview page; the gate form keeps the preview flag
    pub fn to_preview_html(&self) -> String {
        self.html(true)
    }

    fn html(&self, preview: bool) -> String {
        match self {
            Region::LoadingIndicator => format!("<div>{}</div>", LOADING_MESSAGE),
            Region::Empty => String::new(),
            Region::Progress => format!("<p>{}</p>", FETCHING_MESSAGE),
            Region::Gate { slug, lead } => {
                let mut html = String::new();
                if let Some(lead) = lead {
                    html.push_str(&format!(
                        r#"<div class="no-paywall" data-region="lead">{}</div>"#,
                        lead.html
                    ));
                }
                html.push_str(&format!(
                    concat!(
                        r#"<form class="no-paywall" method="post" action="{action}/{slug_segment}{query}" data-unlock-endpoint="{endpoint}">"#,
                        r#"<input type="hidden" name="slug" value="{slug}">"#,
                        r#"<label for="accessControl">{prompt}</label>"#,
                        r#"<input id="accessControl" name="accessControl" type="text" placeholder="e.g. Pineapple 🍍" required>"#,
                        r#"<button type="submit">Gimme Access!</button>"#,
                        "</form>"
                    ),
                    action = ARTICLE_PATH,
                    endpoint = UNLOCK_PATH,
                    slug = escape_html(slug),
                    slug_segment = escape_html(&urlencoding::encode(slug)),
                    query = if preview { "?preview=true" } else { "" },
                    prompt = GATE_PROMPT,
                ));
                html
            }
            Region::Body { body } => format!(
                r#"<div class="paywall" data-region="body">{}</div>"#,
                body.as_ref().map(|b| b.html.as_str()).unwrap_or_default()
            ),
        }
    }
}

/// JSON-LD `NewsArticle` for an article
///
/// Gated articles are marked as not freely accessible, with the paywalled
/// part identified by [`PAYWALL_SELECTOR`].
pub fn structured_data(article: &Article, site: &SiteConfig) -> serde_json::Value {
    let date = article.date.map(|d| d.to_rfc3339());

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "NewsArticle",
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": format!("https://{}{}", site.host, article.seo.canonical_url),
        },
        "headline": article.seo.title,
        "image": article.seo.image.as_ref().map(|i| format!("{}?w=1200&h=1200&fit=crop", i)),
        "datePublished": date,
        "dateModified": date,
        "author": {
            "@type": "Person",
            "name": site.author,
        },
        "description": article.seo.description,
    });

    if article.is_gated {
        data["isAccessibleForFree"] = json!("False");
        data["hasPart"] = json!({
            "@type": "WebPageElement",
            "isAccessibleForFree": "False",
            "cssSelector": PAYWALL_SELECTOR,
        });
    }

    data
}

/// Html document fragment for a view: title, region and structured data
pub fn render_document(view: &GateView, site: &SiteConfig) -> String {
    document(view, site, false)
}

/// [`render_document`] for a preview page
pub fn render_preview_document(view: &GateView, site: &SiteConfig) -> String {
    document(view, site, true)
}

fn document(view: &GateView, site: &SiteConfig, preview: bool) -> String {
    let region = Region::from_view(view);
    let region = if preview {
        region.to_preview_html()
    } else {
        region.to_html()
    };

    let Ok(article) = view.article() else {
        return region;
    };

    // `</` inside a script element would end it early
    let ld_json = structured_data(article, site).to_string().replace("</", "<\\/");

    format!(
        concat!(
            r#"<article data-item-id="{id}">"#,
            r#"<script type="application/ld+json">{ld}</script>"#,
            "<h1>{title}</h1>",
            "{region}",
            "</article>"
        ),
        id = escape_html(article.id.as_str()),
        ld = ld_json,
        title = escape_html(&article.title),
        region = region,
    )
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
