use crate::engine::{self, CommandListing, DispatchReport, ListingCache, Registry, UnregisterSummary};
use crate::error::{ConfigError, RegistrationError};
use crate::{Caller, CommandSpec, GroupSpec, Host, ModuleId, normalize_locale};
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Options that affect routing behavior.
///
/// Loadable from TOML; every field is optional:
///
/// ```toml
/// prefix = "!"
/// message_scope = "core"
/// suggest_distance = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Character every command message starts with.
    pub prefix: char,
    /// String-table scope used for the engine's own replies.
    pub message_scope: String,
    /// Maximum edit distance for "did you mean" suggestions; `0` disables them.
    pub suggest_distance: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { prefix: '/', message_scope: "core".to_string(), suggest_distance: 2 }
    }
}

impl Options {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }
}

/// The command router.
///
/// Registration needs `&mut self`; dispatching only needs `&self`, so an
/// engine shared between threads is usually kept behind an `RwLock`.
///
/// # Example
/// ```
/// use chatroute::{Caller, Engine, ModuleId, Outcome, Param, ParamKind, StaticHost, command};
///
/// let mut engine = Engine::default();
/// let module = ModuleId::new("items");
/// engine
///     .register(&module, command! {
///         name: "give",
///         params: [Param::required("id", ParamKind::Id)],
///         run: |inv, args| {
///             inv.reply(format!("giving {}", args[0]));
///             Ok(())
///         },
///     })
///     .unwrap();
///
/// let report = engine.dispatch(&StaticHost::new(), &Caller::new(1, "Ana"), "/give #42");
/// assert!(matches!(report.outcome, Outcome::Invoked { .. }));
/// assert_eq!(report.replies[0].text, "giving #42");
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    registry: Registry,
    options: Options,
    listings: Mutex<ListingCache>,
}

impl Engine {
    pub fn new(options: Options) -> Self {
        Engine { registry: Registry::default(), options, listings: Mutex::new(ListingCache::default()) }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Declare a command group (or add aliases to an existing one).
    pub fn register_group(&mut self, module: &ModuleId, group: GroupSpec) -> Result<(), RegistrationError> {
        self.registry.register_group(module, &group)?;
        self.invalidate_listings();
        tracing::info!(%module, group = %group.name, aliases = group.aliases.len(), "registered group");
        Ok(())
    }

    /// Register one command overload owned by `module`.
    pub fn register(&mut self, module: &ModuleId, command: CommandSpec) -> Result<(), RegistrationError> {
        let group = command.group.clone();
        let handler = self.registry.register_command(module, command)?;
        self.invalidate_listings();
        tracing::info!(
            %module,
            command = %handler.invocation(group.as_deref(), None),
            params = handler.params.len(),
            "registered command"
        );
        Ok(())
    }

    /// Register a batch of overloads. Nothing is registered unless every
    /// descriptor is valid.
    pub fn register_all<I>(&mut self, module: &ModuleId, commands: I) -> Result<usize, RegistrationError>
    where
        I: IntoIterator<Item = CommandSpec>,
    {
        let commands: Vec<CommandSpec> = commands.into_iter().collect();
        for command in &commands {
            self.registry.validate_command(command)?;
        }
        let count = commands.len();
        for command in commands {
            self.registry.register_command(module, command)?;
        }
        self.invalidate_listings();
        tracing::info!(%module, count, "registered commands");
        Ok(count)
    }

    /// Remove every handler and group name `module` contributed.
    ///
    /// Unknown modules (and repeated calls) are a no-op.
    pub fn unregister(&mut self, module: &ModuleId) -> UnregisterSummary {
        let summary = self.registry.unregister(module);
        if !summary.is_empty() {
            self.invalidate_listings();
            tracing::info!(
                %module,
                handlers = summary.handlers_removed,
                keys = summary.keys_removed,
                groups = summary.groups_removed,
                "unregistered module"
            );
        }
        summary
    }

    /// Modules that currently own registrations, sorted.
    pub fn modules(&self) -> Vec<ModuleId> {
        self.registry.modules().into_iter().collect()
    }

    /// Route and run one chat message from `caller`.
    pub fn dispatch(&self, host: &dyn Host, caller: &Caller, message: &str) -> DispatchReport {
        engine::dispatch(&self.registry, &self.options, host, caller, message, false)
    }

    /// Like [`dispatch`](Self::dispatch), additionally recording a
    /// [`ResolutionTrace`](crate::ResolutionTrace).
    pub fn dispatch_verbose(&self, host: &dyn Host, caller: &Caller, message: &str) -> DispatchReport {
        engine::dispatch(&self.registry, &self.options, host, caller, message, true)
    }

    /// Commands visible to callers of `locale`, grouped by module.
    ///
    /// Listings are cached per locale until the next registration change.
    pub fn list_commands(&self, locale: Option<&str>) -> Arc<CommandListing> {
        let locale = normalize_locale(locale);
        let mut cache = self.listings.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_build(locale.clone(), || {
            CommandListing::build(&self.registry, self.options.prefix, locale.as_deref())
        })
    }

    fn invalidate_listings(&mut self) {
        self.listings.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Param, ParamKind, StaticHost, Value};

    fn noop(name: &str) -> CommandSpec {
        CommandSpec::new(name, |_inv, _args| Ok(()))
    }

    #[test]
    fn options_from_toml() {
        let opts = Options::from_toml_str("prefix = \"!\"\nsuggest_distance = 0\n").unwrap();
        assert_eq!(opts, Options { prefix: '!', message_scope: "core".into(), suggest_distance: 0 });
        assert_eq!(Options::from_toml_str("").unwrap(), Options::default());
    }

    #[test]
    fn options_reject_unknown_fields() {
        assert!(matches!(Options::from_toml_str("prefixx = \"!\""), Err(ConfigError::Parse(_))));
        assert!(matches!(Options::from_toml_str("prefix = \"ab\""), Err(ConfigError::Parse(_))));
        assert!(matches!(Options::load("/definitely/not/here.toml"), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn register_all_is_all_or_nothing() {
        let mut engine = Engine::default();
        let module = ModuleId::new("items");
        let bad = noop("take")
            .param(Param::optional("count", ParamKind::Int, Value::Int(1)))
            .param(Param::required("item", ParamKind::Text));

        let err = engine.register_all(&module, vec![noop("give"), bad]).unwrap_err();
        assert!(matches!(err, RegistrationError::RequiredAfterOptional { .. }));
        assert!(engine.modules().is_empty());

        assert_eq!(engine.register_all(&module, vec![noop("give"), noop("take")]), Ok(2));
        assert_eq!(engine.modules(), vec![module]);
    }

    #[test]
    fn listings_are_invalidated_on_change() {
        let mut engine = Engine::default();
        let module = ModuleId::new("items");
        engine.register(&module, noop("give")).unwrap();

        let first = engine.list_commands(None);
        assert!(Arc::ptr_eq(&first, &engine.list_commands(Some(""))));
        assert_eq!(first.commands(&module), ["/give"]);

        engine.register(&module, noop("take")).unwrap();
        assert_eq!(engine.list_commands(None).commands(&module), ["/give", "/take"]);

        engine.unregister(&module);
        assert!(engine.list_commands(None).is_empty());
    }

    #[test]
    fn custom_prefix_is_honored() {
        let engine = {
            let mut engine = Engine::new(Options { prefix: '!', ..Options::default() });
            engine.register(&ModuleId::new("m"), noop("ping")).unwrap();
            engine
        };
        let host = StaticHost::new();
        let caller = Caller::new(1, "Ana");
        assert!(engine.dispatch(&host, &caller, "!ping").is_invoked());
        assert!(engine.dispatch(&host, &caller, "/ping").is_ignored());
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
