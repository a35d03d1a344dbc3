//! Input pre-classification.
//!
//! Scans the (pre-cleaned, not yet fully normalised) input for shapes that
//! can never become a single parsed name: viruses, OTU identifiers, hybrid
//! formulas and placeholders. Runs before the expensive pattern and again as
//! the best-guess classifier when the pattern finds no match.
//!
//! The scan is heuristic on purpose: false negatives fall through to the
//! top-level pattern, which still has to match in full.

use crate::parsed_name::NameType;
use crate::vocab;

/// Virus-ish vocabulary: virus names are detected and reported, never parsed.
fn is_virus(name: &str) -> bool {
    regex!(r"(?i)\b(?:[a-z]*virus(?:es)?|viroids?|[a-z]*phages?|prions?|satellites?|ictv|npv|[a-z]+virales)\b")
        .is_match(name)
}

/// OTU identifiers: BOLD BINs and UNITE species hypotheses.
fn is_otu(name: &str) -> bool {
    regex!(r"(?i)^(?:BOLD:[0-9A-Z]{7}|SH[0-9]{6,9}\.[0-9]{2}FU)$").is_match(name.trim())
}

/// A hybrid formula joins two parent names with a hybrid sign. A sign in
/// front of a single epithet is a notho marker instead and stays parsable.
fn is_hybrid_formula(name: &str) -> bool {
    let sign = regex!(r" [×xX] |\s×");
    let mut count = 0;
    for m in sign.find_iter(name) {
        count += 1;
        if count > 1 {
            return true;
        }
        let left_tokens = name[..m.start()].split_whitespace().count();
        let right = name[m.end()..].trim_start_matches(['×', ' ']);
        let right_capitalised = right.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if right_capitalised && left_tokens >= 1 {
            // A second capitalised name follows the sign.
            return true;
        }
        if left_tokens >= 2 {
            // Shorthand formula: full binomial × epithet.
            return true;
        }
    }
    false
}

/// Detect shapes that are unparsable by construction. Returns the name type
/// to report.
pub(crate) fn detect_unparsable(name: &str) -> Option<NameType> {
    if is_otu(name) {
        Some(NameType::Otu)
    } else if is_virus(name) {
        Some(NameType::Virus)
    } else if is_hybrid_formula(name) {
        Some(NameType::HybridFormula)
    } else if vocab::is_placeholder(name) {
        Some(NameType::Placeholder)
    } else {
        None
    }
}

/// Best-guess classification of an input the top-level pattern rejected.
pub(crate) fn classify_failure(name: &str) -> NameType {
    if let Some(name_type) = detect_unparsable(name) {
        return name_type;
    }
    let trimmed = name.trim();
    if trimmed.starts_with('?') || vocab::is_placeholder(trimmed) {
        return NameType::Placeholder;
    }
    if regex!(r"(?i)\b(?:cf|aff|nr|indet|sp|spec|ssp)\b\.?").is_match(trimmed) {
        return NameType::Informal;
    }
    NameType::NoName
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viruses() {
        assert_eq!(detect_unparsable("Tobacco mosaic virus"), Some(NameType::Virus));
        assert_eq!(detect_unparsable("Vesicular stomatitis Indiana virus"), Some(NameType::Virus));
        assert_eq!(detect_unparsable("Enterobacteria phage T4"), Some(NameType::Virus));
        assert_eq!(detect_unparsable("Abies alba"), None);
    }

    #[test]
    fn otus() {
        assert_eq!(detect_unparsable("BOLD:AAX3687"), Some(NameType::Otu));
        assert_eq!(detect_unparsable("SH1234567.09FU"), Some(NameType::Otu));
        assert_eq!(detect_unparsable("sh1234567.09fu"), Some(NameType::Otu));
        assert_eq!(detect_unparsable("BOLD:123"), None);
    }

    #[test]
    fn hybrid_formulas() {
        assert_eq!(detect_unparsable("Pinus alba × Abies picea Mill."), Some(NameType::HybridFormula));
        assert_eq!(detect_unparsable("Asplenium rhizophyllum × ruta-muraria"), Some(NameType::HybridFormula));
        assert_eq!(detect_unparsable("Pinus alba x Abies picea"), Some(NameType::HybridFormula));
        // A notho marker is not a formula.
        assert_eq!(detect_unparsable("Abies × alba"), None);
        assert_eq!(detect_unparsable("×Abies alba"), None);
    }

    #[test]
    fn placeholders() {
        assert_eq!(detect_unparsable("incertae sedis"), Some(NameType::Placeholder));
        assert_eq!(detect_unparsable("unknown"), Some(NameType::Placeholder));
        assert_eq!(classify_failure("?"), NameType::Placeholder);
    }

    #[test]
    fn failure_fallbacks() {
        assert_eq!(classify_failure("a a a a a a"), NameType::NoName);
        assert_eq!(classify_failure("crab cf. something"), NameType::Informal);
    }
}
