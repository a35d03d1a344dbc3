//! The structured output model.
//!
//! A [`ParsedName`] is built up field by field while a parsing job walks the
//! normalisation pipeline and the match groups. It is returned by value and
//! never mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;

use crate::rank::Rank;

/// Standard warning strings attached to parsed names.
pub mod warnings {
    pub const NULL_EPITHET: &str = "epithet with literal value null";
    pub const UNUSUAL_CHARACTERS: &str = "unusual characters";
    pub const SUBSPECIES_ASSIGNED: &str = "Name was considered species but contains infraspecific epithet";
    pub const LC_MONOMIAL: &str = "lower case monomial match";
    pub const INDETERMINED: &str = "indetermined name missing its terminal epithet";
    pub const HIGHER_RANK_BINOMIAL: &str = "binomial with rank higher than species aggregate";
    pub const QUESTION_MARKS_REMOVED: &str = "question marks removed";
    pub const REPL_ENCLOSING_QUOTE: &str = "removed enclosing quotes";
    pub const MISSING_GENUS: &str = "epithet without genus";
    pub const RANK_MISMATCH: &str = "rank does not fit the parsed name";
    pub const HTML_ENTITIES: &str = "html entities unescaped";
    pub const XML_TAGS: &str = "xml tags removed";
    pub const BLACKLISTED_EPITHET: &str = "blacklisted epithet used";
    pub const NOMENCLATURAL_REFERENCE: &str = "nomenclatural reference removed";
}

/// Coarse classification of an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameType {
    Scientific,
    Virus,
    HybridFormula,
    Informal,
    Otu,
    Placeholder,
    NoName,
}

impl fmt::Display for NameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameType::Scientific => "scientific",
            NameType::Virus => "virus",
            NameType::HybridFormula => "hybrid formula",
            NameType::Informal => "informal",
            NameType::Otu => "OTU",
            NameType::Placeholder => "placeholder",
            NameType::NoName => "no name",
        };
        f.write_str(s)
    }
}

/// Nomenclatural code governing a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NomCode {
    Bacterial,
    Botanical,
    Cultivars,
    Virus,
    Zoological,
}

/// The name part a hybrid marker applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePart {
    Generic,
    Infrageneric,
    Specific,
    Infraspecific,
}

/// How much of the input was consumed by the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Complete,
    Partial,
    None,
}

impl Default for State {
    fn default() -> Self {
        State::None
    }
}

/// Authorship of a name: the author team, optional ex-authors and an
/// optional year. Author strings are kept verbatim post-normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorship {
    pub authors: Vec<String>,
    pub ex_authors: Vec<String>,
    pub year: Option<String>,
}

impl Authorship {
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.ex_authors.is_empty() && self.year.is_none()
    }

    /// Render the authorship the way it appears in a full name.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.ex_authors.is_empty() {
            out.push_str(&join_authors(&self.ex_authors));
            out.push_str(" ex ");
        }
        out.push_str(&join_authors(&self.authors));
        if let Some(year) = &self.year {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(year);
        }
        out
    }
}

fn join_authors(authors: &[String]) -> String {
    match authors.len() {
        0 => String::new(),
        1 => authors[0].clone(),
        n => {
            let mut out = authors[..n - 1].join(", ");
            // "et al." tails stay glued to the preceding author.
            if authors[n - 1] == "al." {
                out.push_str(" et ");
            } else {
                out.push_str(" & ");
            }
            out.push_str(&authors[n - 1]);
            out
        }
    }
}

/// The structured result of parsing a scientific name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedName {
    /// Single-word name at or above the genus when no epithets are present.
    pub uninomial: Option<String>,
    pub genus: Option<String>,
    pub infrageneric_epithet: Option<String>,
    pub specific_epithet: Option<String>,
    pub infraspecific_epithet: Option<String>,
    pub cultivar_epithet: Option<String>,
    pub strain: Option<String>,
    /// Phrase-name phrase, e.g. the locality in `Pultenaea sp. Olinda (Coveny 6616)`.
    pub phrase: Option<String>,
    /// Which name part carries a hybrid marker.
    pub notho: Option<NamePart>,
    pub rank: Rank,
    pub code: Option<NomCode>,
    pub combination_authorship: Authorship,
    pub basionym_authorship: Authorship,
    pub sanctioning_author: Option<String>,
    pub taxonomic_note: Option<String>,
    pub nomenclatural_note: Option<String>,
    pub published_in: Option<String>,
    pub remarks: Option<String>,
    pub name_type: NameType,
    pub candidatus: bool,
    pub doubtful: bool,
    pub manuscript: bool,
    pub state: State,
    /// Textual remainder the match did not consume.
    pub unparsed: Vec<String>,
    pub warnings: BTreeSet<String>,
}

impl ParsedName {
    pub fn new() -> Self {
        ParsedName { name_type: NameType::Scientific, ..Default::default() }
    }

    pub fn add_warning(&mut self, warning: &str) {
        self.warnings.insert(warning.to_string());
    }

    pub fn add_unparsed(&mut self, remainder: &str) {
        let remainder = remainder.trim();
        if !remainder.is_empty() {
            self.unparsed.push(remainder.to_string());
        }
    }

    pub fn has_authorship(&self) -> bool {
        !self.combination_authorship.is_empty() || !self.basionym_authorship.is_empty()
    }

    /// The lowest epithet present, if any.
    pub fn terminal_epithet(&self) -> Option<&str> {
        self.infraspecific_epithet.as_deref().or(self.specific_epithet.as_deref())
    }

    /// True when the name points at a taxon without naming it fully, e.g.
    /// `Abies sp.` or an infraspecific rank without its terminal epithet.
    pub fn is_indetermined(&self) -> bool {
        (self.rank.is_species_or_below() && self.terminal_epithet().is_none() && self.cultivar_epithet.is_none())
            || (self.rank.is_infraspecific() && self.infraspecific_epithet.is_none())
    }

    /// Render the canonical name: epithets with markers and authorship, no
    /// notes or references. Re-parsing a complete canonical name yields an
    /// equal `ParsedName`.
    pub fn canonical_name(&self) -> String {
        let mut out = String::new();

        if let Some(uninomial) = &self.uninomial {
            if self.notho == Some(NamePart::Generic) {
                out.push('×');
            }
            out.push_str(uninomial);
        } else if let Some(genus) = &self.genus {
            if self.notho == Some(NamePart::Generic) {
                out.push('×');
            }
            out.push_str(genus);
        }

        if let Some(infragen) = &self.infrageneric_epithet {
            if self.specific_epithet.is_none() && self.rank.is_infrageneric() {
                if let Some(marker) = self.rank.marker() {
                    out.push(' ');
                    out.push_str(marker);
                }
                out.push(' ');
                out.push_str(infragen);
            } else {
                out.push_str(" (");
                out.push_str(infragen);
                out.push(')');
            }
        }

        if let Some(epithet) = &self.specific_epithet {
            out.push(' ');
            if self.notho == Some(NamePart::Specific) {
                out.push('×');
            }
            out.push_str(epithet);
        }

        if self.rank.is_infraspecific() {
            if let Some(marker) = self.rank.marker() {
                out.push(' ');
                out.push_str(marker);
            }
        } else if self.is_indetermined() {
            if let Some(marker) = self.rank.marker() {
                out.push(' ');
                out.push_str(marker);
            }
        }

        if let Some(infra) = &self.infraspecific_epithet {
            out.push(' ');
            if self.notho == Some(NamePart::Infraspecific) {
                out.push('×');
            }
            out.push_str(infra);
        }

        if let Some(cultivar) = &self.cultivar_epithet {
            out.push_str(" '");
            out.push_str(cultivar);
            out.push('\'');
        }

        if let Some(strain) = &self.strain {
            out.push(' ');
            out.push_str(strain);
        }

        if !self.basionym_authorship.is_empty() {
            out.push_str(" (");
            out.push_str(&self.basionym_authorship.render());
            out.push(')');
        }
        if !self.combination_authorship.is_empty() {
            out.push(' ');
            out.push_str(&self.combination_authorship.render());
            if let Some(sanct) = &self.sanctioning_author {
                out.push_str(" : ");
                out.push_str(sanct);
            }
        }

        out.trim().to_string()
    }
}

/// The structured result of parsing a free-standing authorship string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAuthorship {
    pub combination_authorship: Authorship,
    pub basionym_authorship: Authorship,
    pub sanctioning_author: Option<String>,
    pub taxonomic_note: Option<String>,
    pub nomenclatural_note: Option<String>,
    pub published_in: Option<String>,
    pub manuscript: bool,
    pub state: State,
    pub unparsed: Vec<String>,
    pub warnings: BTreeSet<String>,
}

impl ParsedAuthorship {
    pub fn add_warning(&mut self, warning: &str) {
        self.warnings.insert(warning.to_string());
    }

    pub fn add_unparsed(&mut self, remainder: &str) {
        let remainder = remainder.trim();
        if !remainder.is_empty() {
            self.unparsed.push(remainder.to_string());
        }
    }
}

impl Default for NameType {
    fn default() -> Self {
        NameType::NoName
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorship_render() {
        let a = Authorship { authors: vec!["Mill.".into()], ex_authors: vec![], year: None };
        assert_eq!(a.render(), "Mill.");

        let a = Authorship {
            authors: vec!["Balf.f.".into(), "Forrest".into()],
            ex_authors: vec![],
            year: None,
        };
        assert_eq!(a.render(), "Balf.f. & Forrest");

        let a = Authorship {
            authors: vec!["Cleve".into()],
            ex_authors: vec![],
            year: Some("1899".into()),
        };
        assert_eq!(a.render(), "Cleve, 1899");

        let a = Authorship {
            authors: vec!["Willd.".into()],
            ex_authors: vec!["Pers.".into()],
            year: None,
        };
        assert_eq!(a.render(), "Pers. ex Willd.");
    }

    #[test]
    fn canonical_binomial_with_authorship() {
        let mut pn = ParsedName::new();
        pn.genus = Some("Abies".into());
        pn.specific_epithet = Some("alba".into());
        pn.rank = Rank::Species;
        pn.combination_authorship.authors.push("Mill.".into());
        assert_eq!(pn.canonical_name(), "Abies alba Mill.");
    }

    #[test]
    fn canonical_trinomial_with_basionym() {
        let mut pn = ParsedName::new();
        pn.genus = Some("Verbascum".into());
        pn.specific_epithet = Some("cheiranthifolium".into());
        pn.infraspecific_epithet = Some("asperulum".into());
        pn.rank = Rank::Variety;
        pn.basionym_authorship.authors.push("Boiss.".into());
        pn.combination_authorship.authors.push("Murb.".into());
        assert_eq!(pn.canonical_name(), "Verbascum cheiranthifolium var. asperulum (Boiss.) Murb.");
    }

    #[test]
    fn canonical_notho_uninomial() {
        let mut pn = ParsedName::new();
        pn.uninomial = Some("Abies".into());
        pn.notho = Some(NamePart::Generic);
        pn.combination_authorship.authors.push("Mill.".into());
        assert_eq!(pn.canonical_name(), "×Abies Mill.");
    }

    #[test]
    fn canonical_indetermined_species() {
        let mut pn = ParsedName::new();
        pn.genus = Some("Abies".into());
        pn.rank = Rank::Species;
        assert_eq!(pn.canonical_name(), "Abies sp.");
        assert!(pn.is_indetermined());
    }

    #[test]
    fn canonical_infrageneric() {
        let mut pn = ParsedName::new();
        pn.genus = Some("Maxillaria".into());
        pn.infrageneric_epithet = Some("Multiflorae".into());
        pn.rank = Rank::Section;
        pn.combination_authorship.authors.push("Christenson".into());
        assert_eq!(pn.canonical_name(), "Maxillaria sect. Multiflorae Christenson");
    }
}
