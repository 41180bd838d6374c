//! Message dispatch state machine.
//!
//! ```text
//! Received -> Tokenized -> Matched -> PermissionChecked -> Resolved -> Invoked
//!    │            │           │              │                │          │
//!    └─ no prefix └─ empty    └─ unknown     └─ denied        └─ failed  └─ handler error
//!       Ignored      Ignored     Ignored /      Rejected         Rejected   Rejected
//!                                group error
//! ```
//!
//! Every rejection is answered with one error-styled reply, localized through
//! the host in the engine's message scope.

use super::matcher::{self, CommandMatch};
use super::metrics::{DispatchMetrics, ResolutionTrace, Route, Stage};
use super::registry::{GroupBucket, Registry};
use super::resolve;
use super::tokenizer::tokenize;
use crate::api::Options;
use crate::error::DispatchError;
use crate::host::{self, Host};
use crate::invocation::{Invocation, Reply, ReplyStyle};
use crate::params::Value;
use crate::{Caller, Handler, ModuleId, normalize_key, normalize_locale};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Terminal state of one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not a command (missing prefix, empty, unknown name).
    Ignored,
    /// A handler ran to completion.
    Invoked { command: String, module: ModuleId, args: Vec<Value> },
    Rejected(DispatchError),
}

/// Everything a dispatch produced.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub outcome: Outcome,
    /// Replies for the caller, in order. Handler replies come first, followed
    /// by the engine's error reply if the message was rejected.
    pub replies: Vec<Reply>,
    pub metrics: DispatchMetrics,
    /// Only filled by `Engine::dispatch_verbose`.
    pub trace: Option<ResolutionTrace>,
}

impl DispatchReport {
    pub fn is_ignored(&self) -> bool {
        self.outcome == Outcome::Ignored
    }

    pub fn is_invoked(&self) -> bool {
        matches!(self.outcome, Outcome::Invoked { .. })
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match &self.outcome {
            Outcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

struct Routed<'r> {
    group: Option<&'r GroupBucket>,
    matched: CommandMatch<'r>,
    /// Index of the first argument token.
    args_start: usize,
}

enum Lookup<'r> {
    Found(Routed<'r>),
    NotFound,
    Rejected(DispatchError),
}

/// In-flight state shared by the stages.
struct Dispatch<'a> {
    options: &'a Options,
    host: &'a dyn Host,
    caller: &'a Caller,
    started: Instant,
    metrics: DispatchMetrics,
    trace: Option<ResolutionTrace>,
    replies: Vec<Reply>,
}

impl Dispatch<'_> {
    fn finish(mut self, outcome: Outcome) -> DispatchReport {
        self.metrics.total = self.started.elapsed();
        DispatchReport { outcome, replies: self.replies, metrics: self.metrics, trace: self.trace }
    }

    fn ignore(self, reason: &'static str) -> DispatchReport {
        tracing::trace!(caller = self.caller.id, reason, "message ignored");
        self.finish(Outcome::Ignored)
    }

    fn reject(mut self, err: DispatchError) -> DispatchReport {
        tracing::debug!(caller = self.caller.id, stage = ?self.metrics.stage, error = %err, "command rejected");
        let scope = ModuleId::new(self.options.message_scope.as_str());
        let text = host::localized(self.host, self.caller, &scope, err.message_key(), &err.message_params());
        self.replies.push(Reply { style: ReplyStyle::Error, text });
        self.finish(Outcome::Rejected(err))
    }
}

pub(crate) fn dispatch(
    registry: &Registry,
    options: &Options,
    host: &dyn Host,
    caller: &Caller,
    message: &str,
    verbose: bool,
) -> DispatchReport {
    let mut state = Dispatch {
        options,
        host,
        caller,
        started: Instant::now(),
        metrics: DispatchMetrics::default(),
        trace: verbose.then(ResolutionTrace::default),
        replies: Vec::new(),
    };

    let Some(body) = message.trim().strip_prefix(options.prefix) else {
        return state.ignore("no prefix");
    };

    let t = Instant::now();
    let tokens = tokenize(body);
    state.metrics.tokenize = t.elapsed();
    state.metrics.stage = Stage::Tokenized;
    if tokens.is_empty() {
        return state.ignore("empty");
    }

    let locale = normalize_locale(host.locale(caller).as_deref());
    if let Some(trace) = state.trace.as_mut() {
        trace.tokens = tokens.clone();
        trace.locale = locale.clone();
    }

    let t = Instant::now();
    let found = lookup(registry, options, &tokens, locale.as_deref());
    state.metrics.matching = t.elapsed();
    let routed = match found {
        Lookup::Found(routed) => routed,
        Lookup::NotFound => return state.ignore("unknown command"),
        Lookup::Rejected(err) => return state.reject(err),
    };
    state.metrics.stage = Stage::Matched;

    let remaining = &tokens[routed.args_start..];
    let invocation_name = match routed.group {
        Some(group) => format!("{} {}", group.primary, routed.matched.key),
        None => routed.matched.key.to_string(),
    };
    let command = format!("{}{invocation_name}", options.prefix);
    tracing::trace!(%command, fit = ?routed.matched.fit, args = remaining.len(), "command matched");
    if let Some(trace) = state.trace.as_mut() {
        trace.route = Some(Route {
            group: routed.group.map(|g| g.primary.clone()),
            key: routed.matched.key.to_string(),
            locale_fit: routed.matched.fit,
            remaining: remaining.to_vec(),
        });
    }

    let candidates = &routed.matched.entry.handlers;
    let is_admin = candidates.iter().any(|h| h.admin_only) && host.is_admin(caller);
    let allowed: Vec<Arc<Handler>> = candidates.iter().filter(|h| !h.admin_only || is_admin).cloned().collect();
    if allowed.is_empty() {
        return state.reject(DispatchError::PermissionDenied { command });
    }
    state.metrics.stage = Stage::PermissionChecked;

    let t = Instant::now();
    let target = resolve::Target {
        command: &command,
        prefix: options.prefix,
        group: routed.group.map(|g| g.primary.as_str()),
        locale: locale.as_deref(),
    };
    let traced = state.trace.as_mut().map(|t| &mut t.candidates);
    let resolved = resolve::resolve_overload(&allowed, remaining, &target, host, traced);
    state.metrics.resolve = t.elapsed();
    let selected = match resolved {
        Ok(selected) => selected,
        Err(err) => return state.reject(err),
    };
    state.metrics.stage = Stage::Resolved;

    let handler = selected.handler;
    let mut inv =
        Invocation::new(message, &invocation_name, remaining, caller, locale.as_deref(), &handler.module, host);
    let t = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| (handler.callback)(&mut inv, &selected.args)));
    state.metrics.invoke = t.elapsed();
    state.replies.extend(inv.into_replies());

    let detail = match result {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(format!("{err:#}")),
        Err(payload) => Some(panic_message(payload.as_ref())),
    };
    if let Some(detail) = detail {
        tracing::error!(
            %command,
            module = %handler.module,
            caller = caller.id,
            error = %detail,
            "command handler failed"
        );
        return state.reject(DispatchError::HandlerExecutionFailed { command, detail });
    }

    state.metrics.stage = Stage::Invoked;
    tracing::debug!(%command, module = %handler.module, score = selected.score, "command invoked");
    state.finish(Outcome::Invoked { command, module: handler.module.clone(), args: selected.args })
}

/// Standalone commands first, then `group subcommand`.
fn lookup<'r>(registry: &'r Registry, options: &Options, tokens: &[String], locale: Option<&str>) -> Lookup<'r> {
    if let Some(matched) = matcher::match_command(registry.standalone(), tokens, 0, locale) {
        return Lookup::Found(Routed { group: None, matched, args_start: matched.words });
    }

    let Some(group) = registry.group(&tokens[0]) else {
        return Lookup::NotFound;
    };
    let group_name = format!("{}{}", options.prefix, group.primary);

    if tokens.len() == 1 {
        let mut subcommands: Vec<String> = group
            .commands
            .iter()
            .filter(|(_, entry)| match (&entry.locale, locale) {
                (None, _) => true,
                (Some(tag), Some(locale)) => tag.eq_ignore_ascii_case(locale),
                (Some(_), None) => false,
            })
            .map(|(key, _)| key.to_string())
            .collect();
        subcommands.sort();
        return Lookup::Rejected(DispatchError::MissingGroupSubcommand { group: group_name, subcommands });
    }

    match matcher::match_command(&group.commands, tokens, 1, locale) {
        Some(matched) => Lookup::Found(Routed { group: Some(group), matched, args_start: 1 + matched.words }),
        None => {
            let subcommand = normalize_key(&tokens[1]);
            let suggestion =
                matcher::suggest(&subcommand, group.commands.iter().map(|(key, _)| key), options.suggest_distance);
            Lookup::Rejected(DispatchError::UnknownSubcommand { group: group_name, subcommand, suggestion })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandSpec, GroupSpec, Param, ParamKind, StaticHost};

    fn registry() -> Registry {
        let mut reg = Registry::default();
        let m = ModuleId::new("npc");
        reg.register_group(&m, &GroupSpec::new("npc").alias("n")).unwrap();
        for name in ["create", "create here", "list"] {
            let spec = CommandSpec::new(name, |inv, _args| {
                inv.reply(inv.command().to_string());
                Ok(())
            });
            let spec = spec.in_group("npc").param(Param::optional("name", ParamKind::Text, Value::Text("anon".into())));
            reg.register_command(&m, spec).unwrap();
        }
        reg.register_command(&m, CommandSpec::new("boom", |_inv, _args| panic!("kaboom"))).unwrap();
        reg
    }

    fn run(message: &str) -> DispatchReport {
        dispatch(&registry(), &Options::default(), &StaticHost::new(), &Caller::new(1, "Ana"), message, true)
    }

    #[test]
    fn group_subcommand_longest_match() {
        let report = run("/n create here Bob");
        assert_eq!(
            report.outcome,
            Outcome::Invoked {
                command: "/npc create here".into(),
                module: ModuleId::new("npc"),
                args: vec![Value::Text("Bob".into())],
            }
        );
        assert_eq!(report.replies[0].text, "npc create here");
        let route = report.trace.and_then(|t| t.route).unwrap();
        assert_eq!(route.group.as_deref(), Some("npc"));
        assert_eq!(route.remaining, vec!["Bob".to_string()]);
    }

    #[test]
    fn bare_group_lists_subcommands() {
        let report = run("/npc");
        assert_eq!(
            report.error(),
            Some(&DispatchError::MissingGroupSubcommand {
                group: "/npc".into(),
                subcommands: vec!["create".into(), "create here".into(), "list".into()],
            })
        );
        assert_eq!(report.replies.len(), 1);
        assert_eq!(report.replies[0].style, ReplyStyle::Error);
        assert_eq!(report.metrics.stage, Stage::Tokenized);
    }

    #[test]
    fn unknown_subcommand_suggests() {
        let report = run("/npc lst");
        assert!(matches!(
            report.error(),
            Some(DispatchError::UnknownSubcommand { suggestion: Some(s), .. }) if s == "list"
        ));
        assert_eq!(report.replies[0].text, "Unknown subcommand 'lst' for /npc. Did you mean 'list'?");
    }

    #[test]
    fn non_commands_are_ignored() {
        for message in ["hello", "/", "   /   ", "/nothing here", "!npc list"] {
            let report = run(message);
            assert!(report.is_ignored(), "{message:?} -> {:?}", report.outcome);
            assert!(report.replies.is_empty());
        }
    }

    #[test]
    fn errors_name_the_current_group() {
        let mut reg = Registry::default();
        let a = ModuleId::new("a");
        let b = ModuleId::new("b");
        reg.register_group(&a, &GroupSpec::new("npc").alias("n")).unwrap();
        let list = CommandSpec::new("list", |_inv, _args| Ok(())).in_group("n");
        reg.register_command(&b, list.param(Param::required("page", ParamKind::Int))).unwrap();
        reg.unregister(&a);

        let caller = Caller::new(1, "Ana");
        let report = dispatch(&reg, &Options::default(), &StaticHost::new(), &caller, "/n list", true);
        assert_eq!(
            report.error(),
            Some(&DispatchError::MissingRequiredParameter {
                command: "/n list".into(),
                param: "page".into(),
                usage: "/n list <page>".into(),
            })
        );
        let trace = report.trace.unwrap();
        assert_eq!(trace.candidates[0].usage, "/n list <page>");
    }

    #[test]
    fn panicking_handler_is_contained() {
        let report = run("/boom");
        assert!(matches!(
            report.error(),
            Some(DispatchError::HandlerExecutionFailed { detail, .. }) if detail.contains("kaboom")
        ));
        assert_eq!(report.replies.last().map(|r| r.text.as_str()), Some("Something went wrong while running /boom."));
        assert_eq!(report.metrics.stage, Stage::Resolved);
    }
}
