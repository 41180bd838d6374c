//! Collaborator interface of the embedding application.
//!
//! The engine never stores locales, permissions, principals or translations
//! itself; it asks the [`Host`] for them while a message is processed. Every
//! method has a conservative default so hosts only implement what they have.
//!
//! Localized strings use positional `{0}`, `{1}`, ... placeholders. When the
//! host has no translation for one of the engine's own keys, the built-in
//! English table below is used.

use crate::{Caller, ModuleId, Principal};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub trait Host {
    /// Preferred locale tag of `caller`, or `None` for the default locale.
    fn locale(&self, _caller: &Caller) -> Option<String> {
        None
    }

    /// Whether `caller` may run admin-only commands.
    fn is_admin(&self, _caller: &Caller) -> bool {
        false
    }

    /// Resolve a token to a known principal by name or numeric id.
    fn find_principal(&self, _token: &str) -> Option<Principal> {
        None
    }

    /// Localized text for `key` in the string table of `scope`, already
    /// formatted with `params`. `None` falls back to the engine's defaults.
    fn localize(&self, _caller: &Caller, _scope: &ModuleId, _key: &str, _params: &[String]) -> Option<String> {
        None
    }
}

/// English defaults for the engine's own reply keys.
static FALLBACK_MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("command.missing_subcommand", "Usage: {0} <{1}>"),
        ("command.unknown_subcommand", "Unknown subcommand '{1}' for {0}."),
        ("command.unknown_subcommand_suggest", "Unknown subcommand '{1}' for {0}. Did you mean '{2}'?"),
        ("command.missing_parameter", "Missing required parameter '{0}'. Usage: {1}"),
        ("command.invalid_parameter", "Invalid value for '{0}': {1}. Usage: {2}"),
        ("command.no_overload", "No form of {0} accepts those arguments."),
        ("command.ambiguous", "{0} is ambiguous for those arguments ({1} forms match equally well)."),
        ("command.permission_denied", "You are not allowed to use {0}."),
        ("command.execution_failed", "Something went wrong while running {0}."),
    ])
});

/// Substitute `{n}` placeholders with `params[n]`; unknown indexes are kept.
pub fn format_template(template: &str, params: &[String]) -> String {
    regex!(r"\{(\d+)\}")
        .replace_all(template, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| params.get(idx).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Built-in text for `key`. Keys without a default render as the key itself
/// followed by the parameters.
pub(crate) fn fallback_message(key: &str, params: &[String]) -> String {
    match FALLBACK_MESSAGES.get(key) {
        Some(template) => format_template(template, params),
        None if params.is_empty() => key.to_string(),
        None => format!("{key}: {}", params.join(", ")),
    }
}

/// Ask `host` for `key`, falling back to the built-in table.
pub(crate) fn localized(host: &dyn Host, caller: &Caller, scope: &ModuleId, key: &str, params: &[String]) -> String {
    host.localize(caller, scope, key, params).unwrap_or_else(|| fallback_message(key, params))
}

/// In-memory [`Host`] backed by plain tables.
///
/// Useful for tools, tests and small embedders that keep everything in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    locales: HashMap<u64, String>,
    admins: HashSet<u64>,
    principals: Vec<Principal>,
    /// (scope, locale, key) -> template. A `None` locale applies to everyone.
    messages: HashMap<(String, Option<String>, String), String>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, caller_id: u64, locale: impl Into<String>) -> Self {
        self.locales.insert(caller_id, locale.into());
        self
    }

    pub fn with_admin(mut self, caller_id: u64) -> Self {
        self.admins.insert(caller_id);
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals.push(principal);
        self
    }

    pub fn with_message(
        mut self,
        scope: impl Into<String>,
        locale: Option<&str>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let locale = locale.map(|l| l.to_lowercase());
        self.messages.insert((scope.into(), locale, key.into()), template.into());
        self
    }
}

impl Host for StaticHost {
    fn locale(&self, caller: &Caller) -> Option<String> {
        self.locales.get(&caller.id).cloned()
    }

    fn is_admin(&self, caller: &Caller) -> bool {
        self.admins.contains(&caller.id)
    }

    fn find_principal(&self, token: &str) -> Option<Principal> {
        let wanted = token.trim();
        let id = wanted.trim_start_matches('#').parse::<u64>().ok();
        self.principals
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
            .or_else(|| id.and_then(|id| self.principals.iter().find(|p| p.id == id)))
            .cloned()
    }

    fn localize(&self, caller: &Caller, scope: &ModuleId, key: &str, params: &[String]) -> Option<String> {
        let locale = self.locale(caller).map(|l| l.to_lowercase());
        let scope = scope.as_str().to_string();
        let key = key.to_string();
        let template = self
            .messages
            .get(&(scope.clone(), locale, key.clone()))
            .or_else(|| self.messages.get(&(scope, None, key)))?;
        Some(format_template(template, params))
    }
}
