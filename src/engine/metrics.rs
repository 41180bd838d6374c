//! Dispatch metrics and resolution traces.
//!
//! The intended usage is:
//!
//! - `Engine::dispatch` for normal operation; only timings and the last stage
//!   reached are recorded.
//! - `Engine::dispatch_verbose` for debugging routing decisions. It also fills
//!   a [`ResolutionTrace`] with the tokens, the route taken and one entry per
//!   overload candidate, which allocates.

use super::matcher::LocaleFit;
use crate::ModuleId;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// Processing stages of a message, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    Received,
    Tokenized,
    Matched,
    PermissionChecked,
    Resolved,
    Invoked,
}

#[derive(Debug, Default, Clone)]
pub struct DispatchMetrics {
    /// Total elapsed time for the dispatch.
    pub total: Duration,
    pub tokenize: Duration,
    /// Standalone and group lookup, including subcommand suggestions.
    pub matching: Duration,
    /// Overload scoring and selection.
    pub resolve: Duration,
    /// Time spent inside the handler.
    pub invoke: Duration,
    /// Last stage the message reached.
    pub stage: Stage,
}

// --- Traces ------------------------------------------------------------------

/// Where a message was routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Primary name of the group, for group members.
    pub group: Option<String>,
    /// Matched (normalized) command key.
    pub key: String,
    pub locale_fit: LocaleFit,
    /// Argument tokens left after the command key.
    pub remaining: Vec<String>,
}

/// Outcome of scoring one overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTrace {
    pub module: ModuleId,
    pub usage: String,
    /// Total score; `None` when the candidate was not viable.
    pub score: Option<i32>,
    /// Why the candidate was not viable.
    pub failure: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionTrace {
    pub tokens: Vec<String>,
    pub locale: Option<String>,
    pub route: Option<Route>,
    /// Candidates in registration order. Admin-only overloads filtered out
    /// for the caller do not appear.
    pub candidates: Vec<CandidateTrace>,
}

impl ResolutionTrace {
    pub fn selected(&self) -> Option<&CandidateTrace> {
        self.candidates.iter().find(|c| c.selected)
    }
}
