//! Placeholder and blacklist vocabulary.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Whole-string placeholders used in checklists in lieu of a real name.
/// Matched case-insensitively against the normalised input.
pub(crate) static PLACEHOLDER_TOKENS: &[&str] = &[
    "incertae sedis",
    "inc. sed.",
    "inc.sed.",
    "unknown",
    "unplaced",
    "unassigned",
    "not assigned",
    "awaiting allocation",
    "uncertain",
    "unallocated",
    "undetermined",
    "unidentified",
    "unidentifiable",
    "unnamed",
    "unspecified",
    "none",
    "miscellaneous",
    "mixed",
    "temp",
    "dummy",
    "?",
    "??",
    "∅",
    "-",
    ".",
];

/// Tokens that look like epithets but never are: abbreviations for
/// indetermined or uncertain identifications.
pub(crate) static EPITHET_BLACKLIST: &[&str] = &[
    "sp", "spec", "species", "spp", "ssp", "subsp", "var", "forma", "indet", "indeterminate",
    "undet", "unknown", "an", "gen", "nov", "cf", "aff", "nr", "sim", "mixed", "uncertain",
    "null", "none",
];

static PLACEHOLDER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PLACEHOLDER_TOKENS.iter().copied().collect());

static BLACKLIST_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| EPITHET_BLACKLIST.iter().copied().collect());

/// True when the whole (trimmed, lowercased) string is a placeholder.
pub(crate) fn is_placeholder(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    PLACEHOLDER_SET.contains(lower.as_str())
}

/// True when a would-be epithet is blacklisted.
pub(crate) fn is_blacklisted_epithet(epithet: &str) -> bool {
    let stem = epithet.trim().trim_end_matches('.');
    BLACKLIST_SET.contains(stem.to_lowercase().as_str())
}
