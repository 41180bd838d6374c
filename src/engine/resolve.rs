//! Overload resolution.
//!
//! Every handler registered under the matched key is scored against the
//! remaining argument tokens, slot by slot:
//!
//! ```text
//! slot has a token   -> convert; success adds the kind weight, failure kills the candidate
//! slot has no token  -> default adds DEFAULT_USED_SCORE, no default kills the candidate
//! ```
//!
//! Tokens beyond the last slot are ignored. The invocation context is passed
//! to handlers separately and never consumes a token.
//!
//! The unique top score wins. A tie at the top is ambiguous, and dispatch
//! never picks one of the tied handlers. With no viable candidate the failure
//! of the first candidate (in registration order) is reported.

use super::metrics::CandidateTrace;
use crate::error::DispatchError;
use crate::params::{DEFAULT_USED_SCORE, Value};
use crate::{Handler, Host};
use std::sync::Arc;

/// What the caller typed to reach the candidates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target<'a> {
    /// Prefixed invocation, e.g. `/npc create`.
    pub(crate) command: &'a str,
    pub(crate) prefix: char,
    /// Current primary name of the group, if any.
    pub(crate) group: Option<&'a str>,
    pub(crate) locale: Option<&'a str>,
}

impl Target<'_> {
    fn usage(&self, handler: &Handler) -> String {
        handler.usage_for(self.prefix, self.group, self.locale)
    }
}

#[derive(Debug)]
pub(crate) struct Selected {
    pub(crate) handler: Arc<Handler>,
    pub(crate) args: Vec<Value>,
    pub(crate) score: i32,
}

/// Score one candidate, producing its converted argument list.
pub(crate) fn score_candidate(
    handler: &Handler,
    tokens: &[String],
    target: &Target<'_>,
    host: &dyn Host,
) -> Result<(i32, Vec<Value>), DispatchError> {
    let mut score = 0;
    let mut args = Vec::with_capacity(handler.params.len());

    for (idx, param) in handler.params.iter().enumerate() {
        match tokens.get(idx) {
            Some(token) => match param.kind.try_parse(token, host) {
                Ok(value) => {
                    score += param.kind.weight();
                    args.push(value);
                }
                Err(reason) => {
                    return Err(DispatchError::InvalidParameterValue {
                        command: target.command.to_string(),
                        param: param.name.clone(),
                        reason,
                        usage: target.usage(handler),
                    });
                }
            },
            None => match &param.default {
                Some(default) => {
                    score += DEFAULT_USED_SCORE;
                    args.push(default.clone());
                }
                None => {
                    return Err(DispatchError::MissingRequiredParameter {
                        command: target.command.to_string(),
                        param: param.name.clone(),
                        usage: target.usage(handler),
                    });
                }
            },
        }
    }

    Ok((score, args))
}

/// Pick the best of `handlers` for `tokens`.
///
/// When `trace` is given, one [`CandidateTrace`] per handler is appended.
pub(crate) fn resolve_overload(
    handlers: &[Arc<Handler>],
    tokens: &[String],
    target: &Target<'_>,
    host: &dyn Host,
    mut trace: Option<&mut Vec<CandidateTrace>>,
) -> Result<Selected, DispatchError> {
    let command = target.command;
    let trace_start = trace.as_ref().map(|t| t.len()).unwrap_or(0);
    let mut viable: Vec<(usize, i32, Vec<Value>)> = Vec::new();
    let mut first_failure: Option<DispatchError> = None;

    for (idx, handler) in handlers.iter().enumerate() {
        let scored = score_candidate(handler, tokens, target, host);
        if let Some(trace) = trace.as_deref_mut() {
            let (score, failure) = match &scored {
                Ok((score, _)) => (Some(*score), None),
                Err(err) => (None, Some(err.to_string())),
            };
            trace.push(CandidateTrace {
                module: handler.module.clone(),
                usage: target.usage(handler),
                score,
                failure,
                selected: false,
            });
        }
        match scored {
            Ok((score, args)) => viable.push((idx, score, args)),
            Err(err) => {
                first_failure.get_or_insert(err);
            }
        }
    }

    let Some(top) = viable.iter().map(|(_, score, _)| *score).max() else {
        return Err(first_failure.unwrap_or_else(|| DispatchError::NoSuitableOverload { command: command.to_string() }));
    };

    let mut winners: Vec<(usize, i32, Vec<Value>)> = viable.into_iter().filter(|(_, score, _)| *score == top).collect();
    if winners.len() > 1 {
        tracing::debug!(command, score = top, tied = winners.len(), "ambiguous overload");
        return Err(DispatchError::AmbiguousOverload { command: command.to_string(), candidates: winners.len() });
    }

    let Some((idx, score, args)) = winners.pop() else {
        return Err(DispatchError::NoSuitableOverload { command: command.to_string() });
    };
    if let Some(entry) = trace.as_deref_mut().and_then(|t| t.get_mut(trace_start + idx)) {
        entry.selected = true;
    }
    Ok(Selected { handler: Arc::clone(&handlers[idx]), args, score })
}
