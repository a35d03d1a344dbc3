//! Nomenclatural status vocabulary and code markers.

use crate::parsed_name::NomCode;

/// Latin status epithet stems that follow `nom.`, `comb.`, `gen.`, `sp.` or
/// `stat.` in a status phrase, e.g. `nom. nud.`, `comb. nov.`, `nom. illeg.`
/// Stems are matched with an optional trailing dot and optional Latin
/// inflection, so `nudum`, `nud.` and `nud` all resolve.
pub(crate) static NOM_STATUS_STEMS: &[&str] = &[
    "ambig",
    "altern",
    "alter",
    "alt",
    "confus",
    "conserv",
    "cons",
    "correct",
    "dubium",
    "dub",
    "herb",
    "illegitimum",
    "illeg",
    "invalid",
    "inval",
    "legit",
    "negatum",
    "neg",
    "novum",
    "nov",
    "nudum",
    "nud",
    "oblitum",
    "obl",
    "obrutum",
    "obr",
    "praeoccup",
    "protectum",
    "prot",
    "provisorium",
    "prov",
    "rejiciendum",
    "rejic",
    "rej",
    "superfluum",
    "superfl",
    "transf",
    "utique",
];

/// Resolve an explicit nomenclatural code marker found in a name string.
pub(crate) fn code_of_marker(marker: &str) -> Option<NomCode> {
    match marker.trim().trim_matches(|c| matches!(c, '[' | ']' | '(' | ')')).to_uppercase().as_str() {
        "ICN" | "ICBN" | "ICNAFP" => Some(NomCode::Botanical),
        "ICZN" => Some(NomCode::Zoological),
        "ICNB" | "ICNP" => Some(NomCode::Bacterial),
        "ICNCP" => Some(NomCode::Cultivars),
        "ICTV" => Some(NomCode::Virus),
        _ => None,
    }
}
