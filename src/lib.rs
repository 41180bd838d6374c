//! Chat command routing engine.
//!
//! Turns free-form chat text such as `/npc create here Bob` into a resolved
//! handler invocation:
//!
//! ```text
//! "/give 42 3" ── tokenize ── match (longest first, locale aware)
//!                                  │
//!                                  └─ resolve overload (scored) ── invoke
//! ```
//!
//! Modules contribute commands through [`Engine::register`] and withdraw them
//! with [`Engine::unregister`]; the embedding application supplies locale,
//! permission, principal and string lookups through the [`Host`] trait.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod host;
mod invocation;
mod params;

pub use api::{Engine, Options};
pub use engine::{
    CandidateTrace, CommandListing, DispatchMetrics, DispatchReport, ListingPage, LocaleFit, Outcome, ResolutionTrace,
    Route, Stage, UnregisterSummary, tokenize,
};
pub use error::{ConfigError, DispatchError, RegistrationError, ValueError};
pub use host::{Host, StaticHost, format_template};
pub use invocation::{Invocation, Reply, ReplyStyle};
pub use params::{DEFAULT_USED_SCORE, EnumDef, KIND_COUNT, KindTag, Param, ParamKind, TokenShape, Value};

use std::fmt;
use std::sync::Arc;

// --- Identities ---------------------------------------------------------------

/// Identifier of the module that owns a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        ModuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        ModuleId::new(id)
    }
}

/// The chat participant a message came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    pub id: u64,
    pub name: String,
}

impl Caller {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Caller { id, name: name.into() }
    }
}

/// A known principal (player, object, ...) an argument token can resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub id: u64,
    pub name: String,
}

impl Principal {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Principal { id, name: name.into() }
    }
}

// --- Registration descriptors ---------------------------------------------------

/// Return type of command handlers.
pub type HandlerResult = anyhow::Result<()>;

/// Handler callback. The invocation context is always the first argument and
/// never consumes an argument token.
pub type HandlerFn = Arc<dyn Fn(&mut Invocation<'_>, &[Value]) -> HandlerResult + Send + Sync>;

/// A command group (namespace) and its aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub aliases: Vec<String>,
    /// Default for every command in the group that does not override it.
    pub admin_only: bool,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>) -> Self {
        GroupSpec { name: name.into(), aliases: Vec::new(), admin_only: false }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn admin_only(mut self, admin_only: bool) -> Self {
        self.admin_only = admin_only;
        self
    }
}

/// An invocable name that only applies to callers of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleVariant {
    pub locale: String,
    pub name: String,
    pub description: String,
    pub usage: String,
}

impl LocaleVariant {
    pub fn new(locale: impl Into<String>, name: impl Into<String>) -> Self {
        LocaleVariant { locale: locale.into(), name: name.into(), description: String::new(), usage: String::new() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

/// Everything a module declares about one command overload.
///
/// Usually built with the [`command!`] macro or the builder methods.
#[derive(Clone)]
pub struct CommandSpec {
    pub group: Option<String>,
    pub name: String,
    pub aliases: Vec<String>,
    /// `None` inherits the group's default (or `false` outside a group).
    pub admin_only: Option<bool>,
    pub description: String,
    pub usage: String,
    pub locales: Vec<LocaleVariant>,
    pub params: Vec<Param>,
    pub handler: HandlerFn,
}

impl CommandSpec {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>, &[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        CommandSpec {
            group: None,
            name: name.into(),
            aliases: Vec::new(),
            admin_only: None,
            description: String::new(),
            usage: String::new(),
            locales: Vec::new(),
            params: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn admin_only(mut self, admin_only: bool) -> Self {
        self.admin_only = Some(admin_only);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn locale(mut self, variant: LocaleVariant) -> Self {
        self.locales.push(variant);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("admin_only", &self.admin_only)
            .field("locales", &self.locales)
            .field("params", &self.params)
            .field("handler", &"<function>")
            .finish()
    }
}

/// A registered overload: the descriptor the registry stores under every one of
/// its keys.
pub struct Handler {
    pub(crate) module: ModuleId,
    /// Normalized primary command key.
    pub(crate) name: String,
    pub(crate) params: Vec<Param>,
    pub(crate) admin_only: bool,
    pub(crate) description: String,
    pub(crate) usage: String,
    pub(crate) locales: Vec<LocaleVariant>,
    pub(crate) callback: HandlerFn,
}

impl Handler {
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn admin_only(&self) -> bool {
        self.admin_only
    }

    fn variant_for(&self, locale: Option<&str>) -> Option<&LocaleVariant> {
        let locale = locale?;
        self.locales.iter().find(|v| v.locale.eq_ignore_ascii_case(locale))
    }

    /// Command name as a caller of `locale` would type it.
    pub fn display_name(&self, locale: Option<&str>) -> &str {
        self.variant_for(locale).map(|v| v.name.as_str()).unwrap_or(&self.name)
    }

    pub fn description_for(&self, locale: Option<&str>) -> &str {
        match self.variant_for(locale) {
            Some(v) if !v.description.is_empty() => &v.description,
            _ => &self.description,
        }
    }

    /// `group command` (or just `command`) in the caller's locale.
    ///
    /// `group` is the bucket's current primary name, which can change on
    /// unregistration.
    pub fn invocation(&self, group: Option<&str>, locale: Option<&str>) -> String {
        match group {
            Some(group) => format!("{} {}", group, self.display_name(locale)),
            None => self.display_name(locale).to_string(),
        }
    }

    /// Prefixed usage text for `locale`, falling back to the default usage and
    /// then to one generated from the parameter list.
    pub fn usage_for(&self, prefix: char, group: Option<&str>, locale: Option<&str>) -> String {
        let declared = match self.variant_for(locale) {
            Some(v) if !v.usage.is_empty() => v.usage.as_str(),
            _ => self.usage.as_str(),
        };
        if !declared.is_empty() {
            return if declared.starts_with(prefix) { declared.to_string() } else { format!("{prefix}{declared}") };
        }
        let mut usage = format!("{prefix}{}", self.invocation(group, locale));
        for param in &self.params {
            usage.push(' ');
            usage.push_str(&param.usage_fragment());
        }
        usage
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("admin_only", &self.admin_only)
            .field("callback", &"<function>")
            .finish()
    }
}

// --- Normalization --------------------------------------------------------------

/// Normalized form of a command key: trimmed, lower-cased, interior whitespace
/// collapsed to single spaces.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

/// Normalized locale tag; empty tags mean "default".
pub(crate) fn normalize_locale(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}
