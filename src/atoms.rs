//! The regex atom library.
//!
//! Named sub-patterns are assembled from the vocabulary tables into the two
//! compiled top-level patterns: [`NAME_PATTERN`] for whole scientific names
//! and [`AUTHORSHIP_PATTERN`] for free-standing authorship strings.
//!
//! ## Group contract
//!
//! Both patterns expose *named* capture groups; extraction is keyed on the
//! names listed in [`NAME_GROUPS`] and never on positional indices, so the
//! pattern structure can change without touching the extractor as long as the
//! group names stay stable:
//!
//! ```text
//! nothogen    hybrid sign before the monomial
//! monomial    genus or uninomial (or `?` placeholder genus)
//! infragen    infrageneric epithet in parentheses
//! rankgen     infrageneric rank marker (`sect.`, `subgen.`, ...)
//! infragen2   infrageneric epithet following `rankgen`
//! nothosp     hybrid sign before the specific epithet
//! epithet     specific epithet
//! rankmarker  rank marker between/after epithets
//! nothoinf    hybrid sign before the infraspecific epithet
//! infepithet  infraspecific epithet
//! cultivar    cultivar epithet in single quotes
//! phrase      phrase-name phrase  /  voucher: its voucher in parens
//! strain      strain designation
//! basex/basauth/bassanct/basyear      basionym authorship (ex/team/sanct/year)
//! combex/combauth/combsanct/combyear  combination authorship
//! tail        unconsumed remainder (controls `State`)
//! ```
//!
//! The underlying engine is linear-time, so the atoms avoid lookaround
//! entirely; exclusions the original grammar expressed with negative
//! lookahead (blacklisted epithets, author particles in epithet position) are
//! validated by the parsing job *after* matching instead.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::vocab;

/// Uppercase letters allowed to start a monomial.
pub(crate) const NAME_UPPER: &str = "A-ZÏËÖÜÄÉÈČÁÀÆŒ";
/// Lowercase letters allowed in epithets.
pub(crate) const NAME_LOWER: &str = "a-zïëöüäåéèčáàæœ";
/// Uppercase letters allowed in author names.
const AUTHOR_UPPER: &str = "A-ZÁÀÂÄÃÅČÇĆĐÉÈÊËÍÌÎÏĹĽŁÑÓÒÔÖÕØŚŠŞÞÚÙÛÜÝŸŽ";
/// Lowercase letters allowed in author names.
const AUTHOR_LOWER: &str = "a-zàáâäãåæçčćđèéêëìíîïĺľłñòóôöõøśšşßþùúûüýÿž";

/// Lowercase epithet of two or more letters, hyphens allowed inside.
pub(crate) fn epithet() -> String {
    format!("[{NAME_LOWER}](?:-?[{NAME_LOWER}])+")
}

/// Capitalised genus-like token of two or more letters, optionally a
/// hyphenated compound.
pub(crate) fn monomial() -> String {
    format!("[{NAME_UPPER}][{NAME_LOWER}]+(?:-[{NAME_UPPER}]?[{NAME_LOWER}]+)?")
}

/// A single author: optional initials, optional lowercase particles, a
/// surname (possibly an abbreviation ending in a dot), an optional filius
/// suffix. Also admits the pseudo authors `anon.`, `hort.` and the `al.` of
/// author team et-al tails.
pub(crate) fn author() -> String {
    let particles = vocab::AUTHOR_PARTICLES.join("|");
    format!(
        "(?:(?:[{AUTHOR_UPPER}](?:[{AUTHOR_LOWER}]{{0,2}})?\\.[ -]?){{0,3}}\
         (?:(?:{particles}) )*\
         (?:[dDlLoO]['’])?\
         [{AUTHOR_UPPER}][{AUTHOR_UPPER}{AUTHOR_LOWER}'-]*\\.?\
         (?: ?f(?:il)?\\.)?\
         |anon\\.?|hort\\.?|al\\.?)"
    )
}

/// One or more authors joined by commas, ampersands or `et`/`and`.
pub(crate) fn author_team() -> String {
    let author = author();
    format!("{author}(?:(?: ?[,;&] ?| (?:et|and) ){author})*")
}

/// Four-digit year with the loose decorations seen in the wild: brackets,
/// letter suffix, question mark, trailing range.
pub(crate) fn year_loose() -> String {
    "\\[?[12][0-9]{3}[a-dh]?\\??\\]?(?: ?[-/] ?[0-9]{1,4})?".to_string()
}

/// An authorship block: optional ex-authors, the author team and an optional
/// sanctioning author, captured as `{prefix}ex`, `{prefix}auth`,
/// `{prefix}sanct`.
fn authorship_group(prefix: &str) -> String {
    let team = author_team();
    let author = author();
    format!("(?:(?P<{prefix}ex>{team}) ex\\.? )?(?P<{prefix}auth>{team})(?: ?: ?(?P<{prefix}sanct>{author}))?")
}

/// Alternation of rank marker stems, longest first, with a word boundary and
/// an optional trailing dot.
fn rank_marker_alternation() -> String {
    let stems: Vec<String> =
        vocab::marker_stems_longest_first().iter().map(|s| regex::escape(s)).collect();
    format!("(?:notho)?(?:{})\\b\\.?", stems.join("|"))
}

fn infrageneric_marker_alternation() -> String {
    let stems: Vec<String> =
        vocab::infrageneric_marker_stems().iter().map(|s| regex::escape(s)).collect();
    format!("(?:{})\\b\\.?", stems.join("|"))
}

/// The group names of [`NAME_PATTERN`], in match order. The extractor in the
/// parsing job iterates this table; see the module docs for the contract.
pub(crate) const NAME_GROUPS: &[&str] = &[
    "nothogen", "monomial", "infragen", "rankgen", "infragen2", "nothosp", "epithet",
    "rankmarker", "nothoinf", "infepithet", "cultivar", "phrase", "voucher", "strain", "basex",
    "basauth", "bassanct", "basyear", "combex", "combauth", "combsanct", "combyear", "tail",
];

fn build_name_pattern() -> String {
    let monomial = monomial();
    let epithet = epithet();
    let year = year_loose();
    let markers = rank_marker_alternation();
    let infragen_markers = infrageneric_marker_alternation();
    let bas = authorship_group("bas");
    let comb = authorship_group("comb");

    format!(
        "^\
         (?P<nothogen>×)? ?\
         (?P<monomial>{monomial}|[{NAME_UPPER}]\\.)\
         (?: \\((?P<infragen>{monomial})\\))?\
         (?: (?P<rankgen>{infragen_markers}) ?(?P<infragen2>{monomial}))?\
         (?: (?P<nothosp>×)? ?(?P<epithet>{epithet}))?\
         (?: (?P<rankmarker>{markers}))?\
         (?: (?P<nothoinf>×)? ?(?P<infepithet>{epithet}))?\
         (?: '(?P<cultivar>.+)')?\
         (?: (?P<phrase>[{NAME_UPPER}][{NAME_LOWER}]+(?: [{NAME_UPPER}][{NAME_LOWER}]+){{0,3}}) \\((?P<voucher>[^()]+)\\))?\
         (?: (?P<strain>[A-Z][A-Z0-9-]*[0-9][A-Z0-9-]*))?\
         (?: ?\\( ?(?:{bas})?,? ?(?P<basyear>{year})? ?\\))?\
         (?: ?{comb})?\
         (?:,? ?\\(?(?P<combyear>{year})\\)?)?\
         (?:[ ,;](?P<tail>.*))?\
         $"
    )
}

fn build_authorship_pattern() -> String {
    let year = year_loose();
    let bas = authorship_group("bas");
    let comb = authorship_group("comb");

    format!(
        "^\
         (?: ?\\( ?(?:{bas})?,? ?(?P<basyear>{year})? ?\\))?\
         (?: ?{comb})?\
         (?: ?\\(?,? ?(?P<combyear>{year})\\)?)?\
         (?:[ ,;](?P<tail>.*))?\
         $"
    )
}

/// The compiled top-level name pattern.
pub(crate) static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&build_name_pattern()).unwrap());

/// The compiled authorship-only pattern. More reliable than the name pattern
/// when the caller already knows there are no epithets in the string.
pub(crate) static AUTHORSHIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&build_authorship_pattern()).unwrap());

/// Names that lead with a rank marker and no genus, e.g. `var. alpina`.
pub(crate) static MISSING_GENUS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?P<rankmarker>{}) ?(?P<infepithet>{})$", rank_marker_alternation(), epithet()))
        .unwrap()
});

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(re: &Regex, text: &str) -> bool {
        re.captures(text).map(|c| c.get(0).map(|m| m.as_str() == text).unwrap_or(false)).unwrap_or(false)
    }

    #[test]
    fn author_atom_matches_common_forms() {
        let re = Regex::new(&format!("^{}$", author())).unwrap();
        for ok in ["L.", "Mill.", "DC.", "H.Karst.", "Balf.f.", "Jørgensen", "van der Veken", "Christenson", "d'Urv."] {
            assert!(re.is_match(ok), "author should match {ok:?}");
        }
        for bad in ["alba", "1899", "×"] {
            assert!(!whole(&re, bad), "author should not match {bad:?}");
        }
    }

    #[test]
    fn team_atom_joins_authors() {
        let re = Regex::new(&format!("^{}$", author_team())).unwrap();
        for ok in ["Balf.f. & Forrest", "Cleve", "Jones, Smith & Brown", "Smith et al."] {
            assert!(re.is_match(ok), "team should match {ok:?}");
        }
    }

    #[test]
    fn year_atom() {
        let re = Regex::new(&format!("^{}$", year_loose())).unwrap();
        for ok in ["1899", "1899?", "[1899]", "1899a", "1899-1901", "2003"] {
            assert!(re.is_match(ok), "year should match {ok:?}");
        }
        assert!(!re.is_match("899"));
    }

    #[test]
    fn name_pattern_binomial_groups() {
        let caps = NAME_PATTERN.captures("Abies alba Mill.").unwrap();
        assert_eq!(caps.name("monomial").unwrap().as_str(), "Abies");
        assert_eq!(caps.name("epithet").unwrap().as_str(), "alba");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Mill.");
        assert!(caps.name("tail").map(|m| m.as_str().is_empty()).unwrap_or(true));
    }

    #[test]
    fn name_pattern_basionym_groups() {
        let caps = NAME_PATTERN.captures("Picea abies (L.) H.Karst.").unwrap();
        assert_eq!(caps.name("basauth").unwrap().as_str(), "L.");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "H.Karst.");
    }

    #[test]
    fn name_pattern_zoological_years() {
        let caps = NAME_PATTERN.captures("Protoscenium simplex (Cleve, 1899) Jørgensen, 1905").unwrap();
        assert_eq!(caps.name("basauth").unwrap().as_str(), "Cleve");
        assert_eq!(caps.name("basyear").unwrap().as_str(), "1899");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Jørgensen");
        assert_eq!(caps.name("combyear").unwrap().as_str(), "1905");
    }

    #[test]
    fn name_pattern_trinomial_with_marker() {
        let caps = NAME_PATTERN.captures("Abies alba subsp. alpina Mill.").unwrap();
        assert_eq!(caps.name("epithet").unwrap().as_str(), "alba");
        assert_eq!(caps.name("rankmarker").unwrap().as_str(), "subsp.");
        assert_eq!(caps.name("infepithet").unwrap().as_str(), "alpina");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Mill.");
    }

    #[test]
    fn name_pattern_terminal_marker() {
        let caps = NAME_PATTERN.captures("Abies sp.").unwrap();
        assert_eq!(caps.name("monomial").unwrap().as_str(), "Abies");
        assert!(caps.name("epithet").is_none());
        assert_eq!(caps.name("rankmarker").unwrap().as_str(), "sp.");
    }

    #[test]
    fn name_pattern_infrageneric() {
        let caps = NAME_PATTERN.captures("Maxillaria sect. Multiflorae Christenson").unwrap();
        assert_eq!(caps.name("rankgen").unwrap().as_str(), "sect.");
        assert_eq!(caps.name("infragen2").unwrap().as_str(), "Multiflorae");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Christenson");
    }

    #[test]
    fn name_pattern_notho_and_cultivar() {
        let caps = NAME_PATTERN.captures("×Abies Mill.").unwrap();
        assert_eq!(caps.name("nothogen").unwrap().as_str(), "×");
        assert_eq!(caps.name("monomial").unwrap().as_str(), "Abies");

        let caps = NAME_PATTERN.captures("Rhododendron 'Cunningham's White'").unwrap();
        assert_eq!(caps.name("cultivar").unwrap().as_str(), "Cunningham's White");
    }

    #[test]
    fn name_pattern_sanctioning_author() {
        let caps = NAME_PATTERN.captures("Agaricus campestris L. : Fr.").unwrap();
        assert_eq!(caps.name("combauth").unwrap().as_str(), "L.");
        assert_eq!(caps.name("combsanct").unwrap().as_str(), "Fr.");
    }

    #[test]
    fn name_pattern_leaves_tail() {
        let caps = NAME_PATTERN.captures("Abies alba Mill. some junk here").unwrap();
        assert_eq!(caps.name("epithet").unwrap().as_str(), "alba");
        let tail = caps.name("tail").unwrap().as_str();
        assert!(tail.contains("junk"), "tail was {tail:?}");
    }

    #[test]
    fn authorship_pattern_groups() {
        let caps = AUTHORSHIP_PATTERN.captures("(Cleve, 1899) Jørgensen, 1905").unwrap();
        assert_eq!(caps.name("basauth").unwrap().as_str(), "Cleve");
        assert_eq!(caps.name("basyear").unwrap().as_str(), "1899");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Jørgensen");
        assert_eq!(caps.name("combyear").unwrap().as_str(), "1905");
    }

    #[test]
    fn authorship_pattern_ex_authors() {
        let caps = AUTHORSHIP_PATTERN.captures("(Pers. ex Willd.) Sm.").unwrap();
        assert_eq!(caps.name("basex").unwrap().as_str(), "Pers.");
        assert_eq!(caps.name("basauth").unwrap().as_str(), "Willd.");
        assert_eq!(caps.name("combauth").unwrap().as_str(), "Sm.");
    }

    #[test]
    fn missing_genus_pattern() {
        let caps = MISSING_GENUS_PATTERN.captures("var. alpina").unwrap();
        assert_eq!(caps.name("rankmarker").unwrap().as_str(), "var.");
        assert_eq!(caps.name("infepithet").unwrap().as_str(), "alpina");
    }

    #[test]
    fn group_table_is_exhaustive() {
        let names: Vec<&str> = NAME_PATTERN.capture_names().flatten().collect();
        for name in names {
            assert!(NAME_GROUPS.contains(&name), "group {name:?} missing from NAME_GROUPS");
        }
    }
}
