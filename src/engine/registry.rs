//! Registration index.
//!
//! ```text
//! Registry
//!  ├─ standalone: CommandMap            key -> KeyEntry { locale, handlers }
//!  ├─ group_names: "npc" -> bucket 0    (primary name and aliases share a bucket)
//!  │               "n"   -> bucket 0
//!  └─ buckets:     0 -> GroupBucket { primary, admin_only, commands: CommandMap }
//! ```
//!
//! A key owns its locale tag together with its handler list, so the tag goes
//! away with the last handler registered under that key.

use crate::error::RegistrationError;
use crate::{CommandSpec, GroupSpec, Handler, ModuleId, normalize_key, normalize_locale};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

pub(crate) type BucketId = usize;

/// Handlers registered under one normalized key.
#[derive(Debug, Default)]
pub(crate) struct KeyEntry {
    /// `None` means the key is available to every locale.
    pub(crate) locale: Option<String>,
    pub(crate) handlers: Vec<Arc<Handler>>,
}

/// One command namespace: the standalone commands or the members of a group.
#[derive(Debug, Default)]
pub(crate) struct CommandMap {
    entries: HashMap<String, KeyEntry>,
    max_words: usize,
}

impl CommandMap {
    pub(crate) fn get_key_value(&self, key: &str) -> Option<(&str, &KeyEntry)> {
        self.entries.get_key_value(key).map(|(k, e)| (k.as_str(), e))
    }

    /// Word count of the longest key ever seen in this map.
    pub(crate) fn max_words(&self) -> usize {
        self.max_words
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &KeyEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    fn insert(&mut self, key: String, locale: Option<String>, handler: &Arc<Handler>) {
        self.max_words = self.max_words.max(key.split(' ').count());
        let entry = self.entries.entry(key).or_default();
        entry.locale = locale;
        entry.handlers.push(Arc::clone(handler));
    }

    /// Drop every handler owned by `module`; returns (handlers, keys) removed.
    fn remove_module(&mut self, module: &ModuleId) -> (usize, usize) {
        let mut handlers_removed = 0;
        for entry in self.entries.values_mut() {
            let before = entry.handlers.len();
            entry.handlers.retain(|h| &h.module != module);
            handlers_removed += before - entry.handlers.len();
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.handlers.is_empty());
        (handlers_removed, before - self.entries.len())
    }
}

#[derive(Debug)]
pub(crate) struct GroupBucket {
    pub(crate) primary: String,
    pub(crate) admin_only: bool,
    pub(crate) commands: CommandMap,
}

#[derive(Debug)]
struct GroupName {
    bucket: BucketId,
    /// Modules that registered this name (directly or through a command).
    modules: BTreeSet<ModuleId>,
}

/// What [`Engine::unregister`](crate::Engine::unregister) took out of the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnregisterSummary {
    /// Handler references removed across all keys.
    pub handlers_removed: usize,
    pub keys_removed: usize,
    pub group_names_removed: usize,
    pub groups_removed: usize,
}

impl UnregisterSummary {
    pub fn is_empty(&self) -> bool {
        *self == UnregisterSummary::default()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    standalone: CommandMap,
    group_names: HashMap<String, GroupName>,
    buckets: HashMap<BucketId, GroupBucket>,
    next_bucket: BucketId,
}

fn single_word(raw: &str, what: &'static str) -> Result<String, RegistrationError> {
    let name = normalize_key(raw);
    if name.is_empty() {
        return Err(RegistrationError::EmptyName { what });
    }
    if name.contains(' ') {
        return Err(RegistrationError::InvalidGroupName { name });
    }
    Ok(name)
}

impl Registry {
    pub(crate) fn standalone(&self) -> &CommandMap {
        &self.standalone
    }

    /// Bucket reachable through the group name or alias `name`.
    pub(crate) fn group(&self, name: &str) -> Option<&GroupBucket> {
        let entry = self.group_names.get(&normalize_key(name))?;
        self.buckets.get(&entry.bucket)
    }

    pub(crate) fn groups(&self) -> impl Iterator<Item = &GroupBucket> {
        self.buckets.values()
    }

    /// Every module that currently owns at least one handler or group name.
    pub(crate) fn modules(&self) -> BTreeSet<ModuleId> {
        let maps = std::iter::once(&self.standalone).chain(self.buckets.values().map(|b| &b.commands));
        let mut modules: BTreeSet<ModuleId> =
            maps.flat_map(|m| m.iter()).flat_map(|(_, e)| e.handlers.iter()).map(|h| h.module.clone()).collect();
        modules.extend(self.group_names.values().flat_map(|g| g.modules.iter().cloned()));
        modules
    }

    /// Register (or extend) a group. Returns the bucket the names point at.
    ///
    /// Re-registering an existing group merges new aliases into it; its
    /// admin default stays whatever the first registration declared.
    pub(crate) fn register_group(
        &mut self,
        module: &ModuleId,
        spec: &GroupSpec,
    ) -> Result<BucketId, RegistrationError> {
        let primary = single_word(&spec.name, "group name")?;
        let mut names = vec![primary.clone()];
        for alias in &spec.aliases {
            let alias = single_word(alias, "group alias")?;
            if !names.contains(&alias) {
                names.push(alias);
            }
        }

        let existing = self.group_names.get(&primary).map(|entry| entry.bucket);
        for alias in &names[1..] {
            let Some(entry) = self.group_names.get(alias) else { continue };
            if Some(entry.bucket) != existing {
                let owner = self.buckets.get(&entry.bucket).map(|b| b.primary.clone()).unwrap_or_default();
                return Err(RegistrationError::GroupAliasConflict { alias: alias.clone(), existing: owner });
            }
        }

        let bucket = match existing {
            Some(bucket) => bucket,
            None => {
                let id = self.next_bucket;
                self.next_bucket += 1;
                self.buckets.insert(
                    id,
                    GroupBucket {
                        primary: primary.clone(),
                        admin_only: spec.admin_only,
                        commands: CommandMap::default(),
                    },
                );
                id
            }
        };

        for name in names {
            self.group_names
                .entry(name)
                .or_insert_with(|| GroupName { bucket, modules: BTreeSet::new() })
                .modules
                .insert(module.clone());
        }
        Ok(bucket)
    }

    /// Check a command descriptor without touching the index.
    pub(crate) fn validate_command(&self, spec: &CommandSpec) -> Result<(), RegistrationError> {
        let command = normalize_key(&spec.name);
        if command.is_empty() {
            return Err(RegistrationError::EmptyName { what: "command name" });
        }
        if spec.aliases.iter().any(|a| normalize_key(a).is_empty()) {
            return Err(RegistrationError::EmptyName { what: "command alias" });
        }
        if let Some(group) = &spec.group {
            single_word(group, "group name")?;
        }
        for variant in &spec.locales {
            if normalize_key(&variant.name).is_empty() {
                return Err(RegistrationError::EmptyName { what: "locale alias" });
            }
            if normalize_locale(Some(&variant.locale)).is_none() {
                return Err(RegistrationError::MissingLocaleTag {
                    command: command.clone(),
                    name: variant.name.clone(),
                });
            }
        }

        let mut seen_optional = false;
        for param in &spec.params {
            match &param.default {
                Some(default) if !default.fits(&param.kind) => {
                    return Err(RegistrationError::DefaultKindMismatch {
                        command,
                        param: param.name.clone(),
                        expected: param.kind.display_name(),
                    });
                }
                Some(_) => seen_optional = true,
                None if seen_optional => {
                    return Err(RegistrationError::RequiredAfterOptional { command, param: param.name.clone() });
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Validate and index one overload for `module`.
    pub(crate) fn register_command(
        &mut self,
        module: &ModuleId,
        spec: CommandSpec,
    ) -> Result<Arc<Handler>, RegistrationError> {
        self.validate_command(&spec)?;

        let bucket = match &spec.group {
            Some(group) => Some(self.register_group(module, &GroupSpec::new(group.as_str()))?),
            None => None,
        };
        let admin_default = bucket.and_then(|id| self.buckets.get(&id)).map(|b| b.admin_only).unwrap_or(false);

        let name = normalize_key(&spec.name);
        let handler = Arc::new(Handler {
            module: module.clone(),
            name: name.clone(),
            params: spec.params,
            admin_only: spec.admin_only.unwrap_or(admin_default),
            description: spec.description,
            usage: spec.usage,
            locales: spec.locales,
            callback: spec.handler,
        });

        let mut keys: Vec<(String, Option<String>)> = vec![(name, None)];
        keys.extend(spec.aliases.iter().map(|a| (normalize_key(a), None)));
        keys.extend(handler.locales.iter().map(|v| (normalize_key(&v.name), normalize_locale(Some(&v.locale)))));

        let map = match bucket.and_then(|id| self.buckets.get_mut(&id)) {
            Some(bucket) => &mut bucket.commands,
            None => &mut self.standalone,
        };
        let mut seen = HashSet::new();
        for (key, locale) in keys {
            if seen.insert(key.clone()) {
                map.insert(key, locale, &handler);
            }
        }
        Ok(handler)
    }

    /// Remove everything `module` contributed.
    pub(crate) fn unregister(&mut self, module: &ModuleId) -> UnregisterSummary {
        let mut summary = UnregisterSummary::default();

        let before = self.group_names.len();
        for entry in self.group_names.values_mut() {
            entry.modules.remove(module);
        }
        self.group_names.retain(|_, entry| !entry.modules.is_empty());
        summary.group_names_removed = before - self.group_names.len();

        let mut live: HashMap<BucketId, BTreeSet<&String>> = HashMap::new();
        for (name, entry) in &self.group_names {
            live.entry(entry.bucket).or_default().insert(name);
        }
        let before = self.buckets.len();
        self.buckets.retain(|id, bucket| match live.get(id) {
            Some(names) => {
                if !names.contains(&bucket.primary) {
                    if let Some(first) = names.iter().next() {
                        bucket.primary = (*first).clone();
                    }
                }
                true
            }
            None => false,
        });
        summary.groups_removed = before - self.buckets.len();

        let maps = std::iter::once(&mut self.standalone).chain(self.buckets.values_mut().map(|b| &mut b.commands));
        for map in maps {
            let (handlers, keys) = map.remove_module(module);
            summary.handlers_removed += handlers;
            summary.keys_removed += keys;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocaleVariant, Param, ParamKind, Value};

    fn spec(name: &str) -> CommandSpec {
        CommandSpec::new(name, |_inv, _args| Ok(()))
    }

    fn handlers(map: &CommandMap, key: &str) -> usize {
        map.get_key_value(key).map(|(_, e)| e.handlers.len()).unwrap_or(0)
    }

    #[test]
    fn aliases_and_locale_names_share_one_handler() {
        let mut reg = Registry::default();
        let module = ModuleId::new("heal");
        reg.register_command(&module, spec("Heal").alias("h").locale(LocaleVariant::new("ES", "curar"))).unwrap();

        let map = reg.standalone();
        let (_, heal) = map.get_key_value("heal").unwrap();
        let (_, curar) = map.get_key_value("curar").unwrap();
        assert!(Arc::ptr_eq(&heal.handlers[0], &curar.handlers[0]));
        assert_eq!(heal.locale, None);
        assert_eq!(curar.locale.as_deref(), Some("es"));
        assert_eq!(handlers(map, "h"), 1);
    }

    #[test]
    fn duplicate_keys_in_one_registration_count_once() {
        let mut reg = Registry::default();
        reg.register_command(&ModuleId::new("m"), spec("give").alias("GIVE").alias("give ")).unwrap();
        assert_eq!(handlers(reg.standalone(), "give"), 1);
    }

    #[test]
    fn max_words_tracks_longest_key() {
        let mut reg = Registry::default();
        reg.register_command(&ModuleId::new("m"), spec("create").alias("create  npc here")).unwrap();
        assert_eq!(reg.standalone().max_words(), 3);
    }

    #[test]
    fn group_commands_inherit_admin_default() {
        let mut reg = Registry::default();
        let module = ModuleId::new("npc");
        reg.register_group(&module, &GroupSpec::new("npc").alias("n").admin_only(true)).unwrap();
        let create = reg.register_command(&module, spec("create").in_group("n")).unwrap();
        let list = reg.register_command(&module, spec("list").in_group("npc").admin_only(false)).unwrap();

        assert!(create.admin_only);
        assert!(!list.admin_only);
        assert_eq!(handlers(&reg.group("N").unwrap().commands, "create"), 1);
        assert!(reg.standalone().iter().next().is_none());
    }

    #[test]
    fn group_alias_conflict_is_rejected() {
        let mut reg = Registry::default();
        let module = ModuleId::new("m");
        reg.register_group(&module, &GroupSpec::new("npc").alias("n")).unwrap();
        reg.register_group(&module, &GroupSpec::new("note")).unwrap();

        let err = reg.register_group(&module, &GroupSpec::new("note").alias("n")).unwrap_err();
        assert_eq!(err, RegistrationError::GroupAliasConflict { alias: "n".into(), existing: "npc".into() });
    }

    #[test]
    fn invalid_descriptors_are_rejected() {
        let reg = Registry::default();
        let cases: Vec<(CommandSpec, RegistrationError)> = vec![
            (spec("  "), RegistrationError::EmptyName { what: "command name" }),
            (spec("give").alias(""), RegistrationError::EmptyName { what: "command alias" }),
            (spec("give").in_group("npc tools"), RegistrationError::InvalidGroupName { name: "npc tools".into() }),
            (
                spec("give").locale(LocaleVariant::new(" ", "dar")),
                RegistrationError::MissingLocaleTag { command: "give".into(), name: "dar".into() },
            ),
            (
                spec("give").param(Param::optional("count", ParamKind::Int, Value::Text("one".into()))),
                RegistrationError::DefaultKindMismatch {
                    command: "give".into(),
                    param: "count".into(),
                    expected: "int".into(),
                },
            ),
            (
                spec("give")
                    .param(Param::optional("count", ParamKind::Int, Value::Int(1)))
                    .param(Param::required("item", ParamKind::Text)),
                RegistrationError::RequiredAfterOptional { command: "give".into(), param: "item".into() },
            ),
        ];

        for (spec, expected) in cases {
            assert_eq!(reg.validate_command(&spec), Err(expected));
        }
    }

    #[test]
    fn unregister_removes_only_the_module() {
        let mut reg = Registry::default();
        let a = ModuleId::new("a");
        let b = ModuleId::new("b");
        reg.register_command(&a, spec("give")).unwrap();
        reg.register_command(&b, spec("give").alias("g")).unwrap();

        let summary = reg.unregister(&b);
        assert_eq!(summary, UnregisterSummary { handlers_removed: 2, keys_removed: 1, ..Default::default() });
        assert_eq!(handlers(reg.standalone(), "give"), 1);
        assert!(reg.standalone().get_key_value("g").is_none());
        assert!(reg.unregister(&b).is_empty());
    }

    #[test]
    fn locale_tag_dies_with_last_handler() {
        let mut reg = Registry::default();
        let module = ModuleId::new("heal");
        reg.register_command(&module, spec("heal").locale(LocaleVariant::new("es", "curar"))).unwrap();
        reg.unregister(&module);
        reg.register_command(&ModuleId::new("other"), spec("curar")).unwrap();

        let (_, entry) = reg.standalone().get_key_value("curar").unwrap();
        assert_eq!(entry.locale, None);
    }

    #[test]
    fn shared_group_survives_until_last_module_leaves() {
        let mut reg = Registry::default();
        let a = ModuleId::new("a");
        let b = ModuleId::new("b");
        reg.register_group(&a, &GroupSpec::new("npc").alias("n")).unwrap();
        reg.register_command(&b, spec("list").in_group("npc")).unwrap();

        let summary = reg.unregister(&a);
        assert_eq!(summary.group_names_removed, 1);
        assert_eq!(summary.groups_removed, 0);
        assert!(reg.group("n").is_none());
        assert_eq!(reg.group("npc").map(|g| g.primary.as_str()), Some("npc"));

        let summary = reg.unregister(&b);
        assert_eq!(summary.groups_removed, 1);
        assert!(reg.group("npc").is_none());
        assert!(reg.modules().is_empty());
    }

    #[test]
    fn primary_moves_to_remaining_alias() {
        let mut reg = Registry::default();
        let a = ModuleId::new("a");
        let b = ModuleId::new("b");
        reg.register_group(&a, &GroupSpec::new("npc").alias("n")).unwrap();
        reg.register_command(&b, spec("list").in_group("n")).unwrap();
        reg.unregister(&a);

        assert!(reg.group("npc").is_none());
        assert_eq!(reg.group("n").map(|g| g.primary.as_str()), Some("n"));
        assert_eq!(reg.modules().into_iter().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn usage_follows_the_renamed_group() {
        let mut reg = Registry::default();
        let a = ModuleId::new("a");
        let b = ModuleId::new("b");
        reg.register_group(&a, &GroupSpec::new("npc").alias("n")).unwrap();
        let list = reg
            .register_command(&b, spec("list").in_group("n").param(Param::required("page", ParamKind::Int)))
            .unwrap();
        reg.unregister(&a);

        let group = reg.group("n").unwrap();
        assert_eq!(list.usage_for('/', Some(&group.primary), None), "/n list <page>");
    }

    #[test]
    fn alias_of_another_group_cannot_start_a_new_one() {
        let mut reg = Registry::default();
        let module = ModuleId::new("m");
        reg.register_group(&module, &GroupSpec::new("npc").alias("n")).unwrap();
        let err = reg.register_group(&module, &GroupSpec::new("notes").alias("n")).unwrap_err();
        assert!(matches!(err, RegistrationError::GroupAliasConflict { ref existing, .. } if existing == "npc"));
        assert!(reg.group("notes").is_none());
    }
}
