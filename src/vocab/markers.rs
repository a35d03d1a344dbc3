//! Rank marker vocabulary.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::rank::Rank;

/// Marker stems (without the trailing dot) mapped to their canonical rank.
/// Lookup is dot-insensitive: `subsp` and `subsp.` resolve identically.
pub(crate) static RANK_MARKERS: Lazy<HashMap<&'static str, Rank>> = Lazy::new(|| {
    HashMap::from([
        ("subsp", Rank::Subspecies),
        ("ssp", Rank::Subspecies),
        ("subspecies", Rank::Subspecies),
        ("var", Rank::Variety),
        ("variety", Rank::Variety),
        ("subvar", Rank::Subvariety),
        ("subv", Rank::Subvariety),
        ("f", Rank::Form),
        ("fo", Rank::Form),
        ("forma", Rank::Form),
        ("form", Rank::Form),
        ("subf", Rank::Subform),
        ("subforma", Rank::Subform),
        ("f.sp", Rank::FormaSpecialis),
        ("fsp", Rank::FormaSpecialis),
        ("cv", Rank::Cultivar),
        ("cultivar", Rank::Cultivar),
        ("gx", Rank::Grex),
        ("grex", Rank::Grex),
        ("sp", Rank::Species),
        ("spec", Rank::Species),
        ("species", Rank::Species),
        ("spp", Rank::Species),
        ("agg", Rank::SpeciesAggregate),
        ("aggr", Rank::SpeciesAggregate),
        ("sl", Rank::SpeciesAggregate),
        ("subgen", Rank::Subgenus),
        ("subg", Rank::Subgenus),
        ("sg", Rank::Subgenus),
        ("sect", Rank::Section),
        ("subsect", Rank::Subsection),
        ("ser", Rank::Series),
        ("subser", Rank::Subseries),
        ("convar", Rank::Convariety),
        ("proles", Rank::Proles),
        ("prole", Rank::Proles),
        ("natio", Rank::Natio),
        ("ab", Rank::Aberration),
        ("aberr", Rank::Aberration),
        ("morph", Rank::Morph),
        ("morpha", Rank::Morph),
        ("pv", Rank::Pathovar),
        ("pathovar", Rank::Pathovar),
        ("bv", Rank::Biovar),
        ("biovar", Rank::Biovar),
        ("chemovar", Rank::Chemovar),
        ("morphovar", Rank::Morphovar),
        ("phagovar", Rank::Phagovar),
        ("serovar", Rank::Serovar),
        ("chemoform", Rank::Chemoform),
        ("str", Rank::Strain),
        ("strain", Rank::Strain),
        ("infrasp", Rank::InfraspecificName),
        ("infrasubsp", Rank::InfrasubspecificName),
    ])
});

/// The subset of markers that introduce a capitalised infrageneric epithet,
/// as in `Maxillaria sect. Multiflorae`.
pub(crate) static INFRAGENERIC_MARKERS: &[&str] =
    &["subgen", "subg", "sg", "sect", "subsect", "ser", "subser"];

/// All marker stems, longest first, for building a regex alternation where
/// leftmost-first matching must not stop at a prefix (`subsp` before `sp`).
pub(crate) fn marker_stems_longest_first() -> Vec<&'static str> {
    let mut stems: Vec<&'static str> = RANK_MARKERS.keys().copied().collect();
    stems.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    stems
}

/// Infrageneric marker stems, longest first.
pub(crate) fn infrageneric_marker_stems() -> Vec<&'static str> {
    let mut stems: Vec<&'static str> = INFRAGENERIC_MARKERS.to_vec();
    stems.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    stems
}

/// Resolve a marker as matched in a name (with or without trailing dot,
/// optionally with a `notho` prefix) to its rank.
pub(crate) fn rank_of_marker(marker: &str) -> Option<Rank> {
    let stem = marker.trim().trim_end_matches('.');
    let stem = stem.strip_prefix("notho").unwrap_or(stem);
    RANK_MARKERS.get(stem).copied()
}

/// Infer a suprageneric rank from the standardised Latin ending of a
/// uninomial, e.g. `Pinaceae` is a family and `Fabales` an order.
pub(crate) fn suprageneric_rank_of(uninomial: &str) -> Option<Rank> {
    // Ordered longest-ending first so e.g. -oideae wins over -eae.
    const ENDINGS: &[(&str, Rank)] = &[
        ("virales", Rank::Order),
        ("oideae", Rank::Subfamily),
        ("aceae", Rank::Family),
        ("ineae", Rank::Suborder),
        ("oidea", Rank::Superfamily),
        ("acea", Rank::Superfamily),
        ("idae", Rank::Family),
        ("inae", Rank::Subfamily),
        ("ales", Rank::Order),
        ("eae", Rank::Tribe),
        ("ini", Rank::Tribe),
        ("ina", Rank::Subtribe),
    ];
    for (ending, rank) in ENDINGS {
        if uninomial.len() > ending.len() + 2 && uninomial.ends_with(ending) {
            return Some(*rank);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_resolution() {
        assert_eq!(rank_of_marker("subsp."), Some(Rank::Subspecies));
        assert_eq!(rank_of_marker("ssp"), Some(Rank::Subspecies));
        assert_eq!(rank_of_marker("var."), Some(Rank::Variety));
        assert_eq!(rank_of_marker("nothovar."), Some(Rank::Variety));
        assert_eq!(rank_of_marker("sp."), Some(Rank::Species));
        assert_eq!(rank_of_marker("bogus"), None);
    }

    #[test]
    fn stems_sorted_longest_first() {
        let stems = marker_stems_longest_first();
        let sp = stems.iter().position(|s| *s == "sp").unwrap();
        let subsp = stems.iter().position(|s| *s == "subsp").unwrap();
        assert!(subsp < sp);
    }

    #[test]
    fn latin_endings() {
        assert_eq!(suprageneric_rank_of("Pinaceae"), Some(Rank::Family));
        assert_eq!(suprageneric_rank_of("Fabales"), Some(Rank::Order));
        assert_eq!(suprageneric_rank_of("Felidae"), Some(Rank::Family));
        assert_eq!(suprageneric_rank_of("Pooideae"), Some(Rank::Subfamily));
        assert_eq!(suprageneric_rank_of("Abies"), None);
    }
}
