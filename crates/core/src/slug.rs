//! Slug derivation and collision resolution.
//!
//! A slug is the lowercase, ASCII, hyphen-separated identifier derived
//! from an entity name. Category and product slugs live in separate
//! namespaces (their own tables), so a product and a category may share
//! a slug value.
//!
//! Collision resolution is split in two:
//! - [`slugify`] derives the base slug (pure string transform),
//! - [`resolve_unique`] picks the final slug against the set of slugs
//!   already taken in the namespace, which the caller fetches up front.
//!
//! The fetch-then-resolve sequence is not isolated from concurrent
//! assignment in the same namespace. Two concurrent creates with the
//! same base name can race to the same final slug; the database unique
//! constraint turns the loser into a conflict error rather than letting
//! the namespace corrupt.

use std::collections::HashSet;

/// Derive the base slug from a human-readable name.
///
/// Rules: transliterate common Latin diacritics to ASCII, lowercase,
/// collapse every run of non-alphanumeric characters to a single
/// hyphen, and trim leading/trailing hyphens.
///
/// An all-symbol name yields an empty base slug; [`resolve_unique`]
/// still terminates on it (producing `-1`, `-2`, ...), matching the
/// permissive behaviour of the upstream API.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        let mapped = transliterate(ch);
        if mapped.is_empty() {
            // Non-alphanumeric: merge into a single pending hyphen.
            pending_hyphen = !out.is_empty();
            continue;
        }
        if pending_hyphen {
            out.push('-');
            pending_hyphen = false;
        }
        out.push_str(mapped);
    }

    out
}

/// Map a single character to its ASCII slug form.
///
/// Returns an empty string for characters that act as separators.
/// Covers the Latin-1 Supplement and the handful of Latin Extended-A
/// letters that show up in product names; anything else non-ASCII is
/// treated as a separator.
fn transliterate(ch: char) -> &'static str {
    match ch {
        'a'..='z' | '0'..='9' => ascii_str(ch),
        'A'..='Z' => ascii_str(ch.to_ascii_lowercase()),
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'ā' | 'Ā' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' | 'ē' | 'Ē' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' | 'ī' | 'Ī' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'ō' | 'Ō' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' | 'ū' | 'Ū' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        _ => "",
    }
}

/// Static str for a single lowercase ASCII alphanumeric character.
fn ascii_str(ch: char) -> &'static str {
    const TABLE: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
    let idx = match ch {
        'a'..='z' => ch as usize - 'a' as usize,
        '0'..='9' => 26 + (ch as usize - '0' as usize),
        _ => unreachable!("caller only passes lowercase alphanumerics"),
    };
    &TABLE[idx..=idx]
}

/// Pick a slug unique against `taken`, starting from `base`.
///
/// Returns `base` itself when free, otherwise probes `base-1`, `base-2`,
/// ... sequentially. The counter never skips values, so numbered
/// variants freed by deletions are reused. Always terminates: `taken`
/// is finite and the counter is unbounded.
///
/// `taken` must already exclude the slug of the record being updated
/// (the `exclude_id` of the repository query), so re-submitting an
/// unchanged name does not conflict with the record's own slug.
pub fn resolve_unique(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("Wireless Mouse"), "wireless-mouse");
        assert_eq!(slugify("USB-C Cable 2m"), "usb-c-cable-2m");
    }

    #[test]
    fn slugify_diacritics() {
        assert_eq!(slugify("Electrónica"), "electronica");
        assert_eq!(slugify("Ropa y Accesorios"), "ropa-y-accesorios");
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn slugify_collapses_symbol_runs_and_trims_edges() {
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
        assert_eq!(slugify("a///b"), "a-b");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_drops_unknown_scripts_as_separators() {
        assert_eq!(slugify("café 東京 blend"), "cafe-blend");
    }

    #[test]
    fn resolve_returns_base_when_free() {
        assert_eq!(resolve_unique("home-garden", &taken(&[])), "home-garden");
    }

    #[test]
    fn resolve_appends_first_free_counter() {
        // Second "Home & Garden" in the same namespace gets -1.
        let t = taken(&["home-garden"]);
        assert_eq!(resolve_unique("home-garden", &t), "home-garden-1");

        let t = taken(&["home-garden", "home-garden-1"]);
        assert_eq!(resolve_unique("home-garden", &t), "home-garden-2");
    }

    #[test]
    fn resolve_reuses_freed_counters() {
        // home-garden-1 was deleted; the counter must not skip it.
        let t = taken(&["home-garden", "home-garden-2"]);
        assert_eq!(resolve_unique("home-garden", &t), "home-garden-1");
    }

    #[test]
    fn resolve_is_unique_against_arbitrary_taken_sets() {
        let t = taken(&["x", "x-1", "x-2", "x-3", "x-5", "y", "x-10"]);
        let got = resolve_unique("x", &t);
        assert_eq!(got, "x-4");
        assert!(!t.contains(&got));
    }

    #[test]
    fn unchanged_name_keeps_own_slug() {
        // On update the repository query excludes the record's own row,
        // so its current slug is absent from the taken set and the base
        // slug comes straight back with no suffix.
        let others = taken(&["other-thing", "home-garden-1"]);
        assert_eq!(resolve_unique("home-garden", &others), "home-garden");
    }

    #[test]
    fn empty_base_still_terminates() {
        let t = taken(&[""]);
        assert_eq!(resolve_unique("", &t), "-1");
    }
}
