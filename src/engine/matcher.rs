//! Longest-match-first command lookup.
//!
//! For a token sequence the matcher tries the longest word count first and
//! walks down to a single word. A key whose locale tag equals the caller's
//! locale wins immediately; otherwise the first default-locale key seen is
//! used, and failing that the first key of any locale.
//!
//! ```text
//! tokens: create here Bob          keys: "create" (default), "create here" (default)
//!   try "create here bob" -> miss
//!   try "create here"     -> default  (remembered, keep looking for exact)
//!   try "create"          -> default  (already have one)
//!   => "create here", remaining ["Bob"]
//! ```

use super::registry::{CommandMap, KeyEntry};
use crate::normalize_key;

/// How well the matched key fits the caller's locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleFit {
    /// Key tag equals the caller's locale (both absent counts).
    Exact,
    /// Key has no locale tag.
    Default,
    /// Key belongs to some other locale.
    Any,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandMatch<'m> {
    pub(crate) key: &'m str,
    pub(crate) entry: &'m KeyEntry,
    /// Tokens consumed by the key.
    pub(crate) words: usize,
    pub(crate) fit: LocaleFit,
}

fn locale_fits(tag: Option<&str>, locale: Option<&str>) -> bool {
    match (tag, locale) {
        (None, None) => true,
        (Some(tag), Some(locale)) => tag.eq_ignore_ascii_case(locale),
        _ => false,
    }
}

/// Find the best key in `map` for `tokens[start..]`.
pub(crate) fn match_command<'m>(
    map: &'m CommandMap,
    tokens: &[String],
    start: usize,
    locale: Option<&str>,
) -> Option<CommandMatch<'m>> {
    let available = tokens.len().checked_sub(start)?;
    let longest = available.min(map.max_words());

    let mut default_match = None;
    let mut any_match = None;
    for words in (1..=longest).rev() {
        let candidate = normalize_key(&tokens[start..start + words].join(" "));
        let Some((key, entry)) = map.get_key_value(&candidate) else { continue };

        if locale_fits(entry.locale.as_deref(), locale) {
            return Some(CommandMatch { key, entry, words, fit: LocaleFit::Exact });
        }
        if entry.locale.is_none() && default_match.is_none() {
            default_match = Some(CommandMatch { key, entry, words, fit: LocaleFit::Default });
        }
        if any_match.is_none() {
            any_match = Some(CommandMatch { key, entry, words, fit: LocaleFit::Any });
        }
    }
    default_match.or(any_match)
}

/// Closest known key to a mistyped `word`: a key starting with it first,
/// otherwise the nearest key within `max_distance` edits.
pub(crate) fn suggest<'k>(word: &str, keys: impl IntoIterator<Item = &'k str>, max_distance: usize) -> Option<String> {
    if max_distance == 0 || word.is_empty() {
        return None;
    }
    let word = word.to_lowercase();
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();

    if let Some(key) = keys.iter().find(|k| k.starts_with(&word)) {
        return Some((*key).to_string());
    }
    keys.iter()
        .map(|k| (levenshtein(&word, k), *k))
        .filter(|(distance, _)| *distance <= max_distance)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, k)| k.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { prev } else { prev + 1 };
            prev = row[j + 1];
            row[j + 1] = cost.min(row[j] + 1).min(prev + 1);
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::Registry;
    use crate::{CommandSpec, LocaleVariant, ModuleId};

    fn spec(name: &str) -> CommandSpec {
        CommandSpec::new(name, |_inv, _args| Ok(()))
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn longest_key_wins() {
        let mut reg = Registry::default();
        let m = ModuleId::new("npc");
        reg.register_command(&m, spec("create")).unwrap();
        reg.register_command(&m, spec("create here")).unwrap();

        let hit = match_command(reg.standalone(), &tokens(&["Create", "HERE", "Bob"]), 0, None).unwrap();
        assert_eq!((hit.key, hit.words, hit.fit), ("create here", 2, LocaleFit::Exact));

        let hit = match_command(reg.standalone(), &tokens(&["create", "there"]), 0, None).unwrap();
        assert_eq!((hit.key, hit.words), ("create", 1));
    }

    #[test]
    fn exact_locale_beats_longer_default_key() {
        let mut reg = Registry::default();
        let m = ModuleId::new("m");
        reg.register_command(&m, spec("go home")).unwrap();
        reg.register_command(&m, spec("return").locale(LocaleVariant::new("es", "go"))).unwrap();

        let words = tokens(&["go", "home"]);
        let hit = match_command(reg.standalone(), &words, 0, Some("es")).unwrap();
        assert_eq!((hit.key, hit.words, hit.fit), ("go", 1, LocaleFit::Exact));

        let hit = match_command(reg.standalone(), &words, 0, None).unwrap();
        assert_eq!((hit.key, hit.fit), ("go home", LocaleFit::Exact));
    }

    #[test]
    fn falls_back_to_default_then_any_locale() {
        let mut reg = Registry::default();
        let m = ModuleId::new("heal");
        reg.register_command(&m, spec("heal").locale(LocaleVariant::new("es", "curar"))).unwrap();

        let hit = match_command(reg.standalone(), &tokens(&["heal"]), 0, Some("fr")).unwrap();
        assert_eq!(hit.fit, LocaleFit::Default);

        let hit = match_command(reg.standalone(), &tokens(&["curar"]), 0, Some("fr")).unwrap();
        assert_eq!((hit.key, hit.fit), ("curar", LocaleFit::Any));
    }

    #[test]
    fn default_key_beats_longer_foreign_key() {
        let mut reg = Registry::default();
        let m = ModuleId::new("m");
        reg.register_command(&m, spec("return").locale(LocaleVariant::new("fr", "go home"))).unwrap();
        reg.register_command(&m, spec("go")).unwrap();

        let hit = match_command(reg.standalone(), &tokens(&["go", "home"]), 0, Some("es")).unwrap();
        assert_eq!((hit.key, hit.words, hit.fit), ("go", 1, LocaleFit::Default));
    }

    #[test]
    fn longest_default_key_is_kept() {
        let mut reg = Registry::default();
        let m = ModuleId::new("m");
        reg.register_command(&m, spec("go")).unwrap();
        reg.register_command(&m, spec("go home")).unwrap();
        reg.register_command(&m, spec("go home now")).unwrap();

        let hit = match_command(reg.standalone(), &tokens(&["go", "home", "now", "please"]), 0, Some("es")).unwrap();
        assert_eq!((hit.key, hit.words, hit.fit), ("go home now", 3, LocaleFit::Default));

        let hit = match_command(reg.standalone(), &tokens(&["go", "home", "later"]), 0, Some("es")).unwrap();
        assert_eq!((hit.key, hit.words, hit.fit), ("go home", 2, LocaleFit::Default));
    }

    #[test]
    fn start_offset_and_misses() {
        let mut reg = Registry::default();
        reg.register_command(&ModuleId::new("m"), spec("list")).unwrap();
        let words = tokens(&["npc", "list"]);

        assert_eq!(match_command(reg.standalone(), &words, 1, None).map(|m| m.key), Some("list"));
        assert!(match_command(reg.standalone(), &words, 0, None).is_none());
        assert!(match_command(reg.standalone(), &words, 2, None).is_none());
        assert!(match_command(reg.standalone(), &words, 5, None).is_none());
    }

    #[test]
    fn suggestions_prefer_prefix_then_distance() {
        let keys = ["create", "list", "remove", "rename"];
        assert_eq!(suggest("cre", keys, 2).as_deref(), Some("create"));
        assert_eq!(suggest("lsit", keys, 2).as_deref(), Some("list"));
        assert_eq!(suggest("xyzzy", keys, 2), None);
        assert_eq!(suggest("lsit", keys, 0), None);
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }
}
