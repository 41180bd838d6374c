//! Routing and resolution engine.
//!
//! The public entry point is [`Engine`](crate::Engine) in `api.rs`; this module
//! holds the stages it drives, split into focused submodules under
//! `src/engine/`.
//!
//! ## How the parts work together
//!
//! Dispatching one chat message is a pipeline:
//!
//! ```text
//! "/n create here Bob"
//!         │  strip prefix, tokenize             (tokenizer.rs)
//!         v
//! ["n", "create", "here", "Bob"]
//!         │  standalone lookup from token 0     (matcher.rs over registry.rs)
//!         │  else group "n" + lookup from token 1
//!         v
//! KeyEntry "create here" (npc)  +  remaining ["Bob"]
//!         │  drop admin-only handlers for non-admins
//!         │  score every overload               (resolve.rs, params weights)
//!         v
//! Selected handler + converted values
//!         │  invoke, contain errors and panics  (dispatcher.rs)
//!         v
//! DispatchReport { outcome, replies, metrics, trace }
//! ```
//!
//! Matching is longest-first but locale aware: a key registered for the
//! caller's own locale beats any key that is merely available to everyone,
//! even a longer one.
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: quote-aware splitting of the message body.
//! - `registry.rs`: the registration index (standalone commands, group
//!   buckets, per-module ownership and unregistration).
//! - `matcher.rs`: longest-match-first lookup with locale precedence, plus
//!   subcommand suggestions.
//! - `resolve.rs`: overload scoring and selection.
//! - `dispatcher.rs`: the per-message state machine and reply generation.
//! - `listing.rs`: cached per-locale command listings.
//! - `metrics.rs`: timings and optional resolution traces.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=chatroute=trace` (or `CHATROUTE_LOG` for the CLI) to see
//! every matching and resolution decision, or use
//! [`Engine::dispatch_verbose`](crate::Engine::dispatch_verbose) to get the
//! same information as data.

#[path = "engine/dispatcher.rs"]
mod dispatcher;
#[path = "engine/listing.rs"]
mod listing;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/tokenizer.rs"]
mod tokenizer;

pub(crate) use dispatcher::dispatch;
pub use dispatcher::{DispatchReport, Outcome};
pub(crate) use listing::ListingCache;
pub use listing::{CommandListing, ListingPage};
pub use matcher::LocaleFit;
pub use metrics::{CandidateTrace, DispatchMetrics, ResolutionTrace, Route, Stage};
pub(crate) use registry::Registry;
pub use registry::UnregisterSummary;
pub use tokenizer::tokenize;
