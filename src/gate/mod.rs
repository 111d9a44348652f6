//! Gated content resolution
//!
//! Decides per article whether the lead or the full body is shown, and runs
//! the single unlock fetch that replaces one with the other:
//! - [`state`] - the view variants and the pure transition function
//! - [`resolver`] - drives a view for one page, owns the fetch and its cancellation
//! - [`client`] - the unlock fetch seam and its HTTP implementation
//! - [`crawler`] - indexing-agent heuristic

pub mod client;
pub mod crawler;
pub mod resolver;
pub mod state;

pub use client::{HttpUnlockClient, UnlockClient};
pub use crawler::CrawlerDetector;
pub use resolver::{GatedContentResolver, SubmitOutcome};
pub use state::{GateEffect, GateInput, GateView, Transition, ViewKind, transition};
