//! Per-locale command listings for help output.

use super::registry::{KeyEntry, Registry};
use crate::{ModuleId, normalize_key};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Invocable commands grouped by owning module, as seen by callers of one
/// locale. Entries are prefixed and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandListing {
    locale: Option<String>,
    modules: BTreeMap<ModuleId, Vec<String>>,
    /// Line -> description of the first overload under it that has one.
    descriptions: BTreeMap<String, String>,
}

/// One page of a module's commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPage<'a> {
    pub items: &'a [String],
    /// 1-based page number actually shown (requests past the end are clamped).
    pub page: usize,
    pub total_pages: usize,
}

impl CommandListing {
    pub(crate) fn build(registry: &Registry, prefix: char, locale: Option<&str>) -> Self {
        let mut modules: BTreeMap<ModuleId, BTreeSet<String>> = BTreeMap::new();
        let mut descriptions = BTreeMap::new();

        let mut add = |head: String, key: &str, entry: &KeyEntry| {
            for handler in &entry.handlers {
                let name = handler.display_name(locale);
                let line = format!("{head}{name}");
                let description = handler.description_for(locale);
                // Overloads sharing a display name are registration-ordered under its own key.
                if !description.is_empty() && key == normalize_key(name) {
                    descriptions.entry(line.clone()).or_insert_with(|| description.to_string());
                }
                modules.entry(handler.module.clone()).or_default().insert(line);
            }
        };
        for (key, entry) in registry.standalone().iter() {
            add(prefix.to_string(), key, entry);
        }
        for group in registry.groups() {
            for (key, entry) in group.commands.iter() {
                add(format!("{prefix}{} ", group.primary), key, entry);
            }
        }

        CommandListing {
            locale: locale.map(str::to_string),
            modules: modules.into_iter().map(|(module, lines)| (module, lines.into_iter().collect())).collect(),
            descriptions,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &[String])> {
        self.modules.iter().map(|(module, lines)| (module, lines.as_slice()))
    }

    /// Description shown next to a listed command line, if any overload has one.
    pub fn description(&self, line: &str) -> Option<&str> {
        self.descriptions.get(line).map(String::as_str)
    }

    /// Commands owned by `module`; empty for unknown modules.
    pub fn commands(&self, module: &ModuleId) -> &[String] {
        self.modules.get(module).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Page `page` (1-based) of `module`'s commands, `per_page` at a time.
    ///
    /// Returns `None` for modules that own nothing.
    pub fn page(&self, module: &ModuleId, page: usize, per_page: usize) -> Option<ListingPage<'_>> {
        let lines = self.modules.get(module)?;
        let per_page = per_page.max(1);
        let total_pages = lines.len().div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);
        let start = (page - 1) * per_page;
        let end = (start + per_page).min(lines.len());
        Some(ListingPage { items: &lines[start..end], page, total_pages })
    }
}

/// Listings built since the last registry change, keyed by locale.
#[derive(Debug, Default)]
pub(crate) struct ListingCache {
    by_locale: HashMap<Option<String>, Arc<CommandListing>>,
}

impl ListingCache {
    pub(crate) fn get_or_build(
        &mut self,
        locale: Option<String>,
        build: impl FnOnce() -> CommandListing,
    ) -> Arc<CommandListing> {
        Arc::clone(self.by_locale.entry(locale).or_insert_with(|| Arc::new(build())))
    }

    pub(crate) fn clear(&mut self) {
        self.by_locale.clear();
    }
}
