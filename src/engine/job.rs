//! Name parsing job.
//!
//! One job parses one scientific name: it walks the normalisation pipeline,
//! applies the top-level name pattern, maps the named capture groups onto a
//! [`ParsedName`] and finishes with rank resolution and consistency checks.
//!
//! The job is infallible only in the sense that it always terminates with
//! either a `ParsedName` or a [`JobError`]; the harness converts the latter
//! into the public error types.

use std::time::Instant;

use tracing::debug;

use crate::atoms::{MISSING_GENUS_PATTERN, NAME_GROUPS, NAME_PATTERN};
use crate::normalize;
use crate::parsed_name::{warnings, NamePart, NameType, NomCode, ParsedName, State};
use crate::pool::{CancelFlag, Cancelled};
use crate::rank::Rank;
use crate::vocab;

use super::authorship::authorship_of_groups;
use super::classify;

/// Internal failure of a parsing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobError {
    Unparsable(NameType),
    UnparsableAuthorship,
    Cancelled,
}

impl From<Cancelled> for JobError {
    fn from(_: Cancelled) -> Self {
        JobError::Cancelled
    }
}

/// Capture-group values lifted out of a pattern match, keyed by the group
/// names of [`NAME_GROUPS`].
type Groups = Vec<(&'static str, String)>;

/// Working state that is not part of the returned record.
#[derive(Default)]
struct Extraction {
    monomial: Option<String>,
    marker_rank: Option<Rank>,
}

pub(crate) struct ParsingJob {
    scientific_name: String,
    rank: Rank,
    code: Option<NomCode>,
    cancel: CancelFlag,
}

impl ParsingJob {
    pub fn new(
        scientific_name: impl Into<String>,
        rank: Rank,
        code: Option<NomCode>,
        cancel: CancelFlag,
    ) -> Self {
        ParsingJob { scientific_name: scientific_name.into(), rank, code, cancel }
    }

    pub fn run(self) -> Result<ParsedName, JobError> {
        let started = Instant::now();
        let mut pn = ParsedName::new();

        let cleaned = normalize::pre_clean(&self.scientific_name);
        if cleaned.html_entities {
            pn.add_warning(warnings::HTML_ENTITIES);
        }
        if cleaned.xml_tags {
            pn.add_warning(warnings::XML_TAGS);
        }
        if cleaned.enclosing_quotes {
            pn.add_warning(warnings::REPL_ENCLOSING_QUOTE);
        }
        let mut name = cleaned.text;
        if name.is_empty() {
            return Err(JobError::Unparsable(NameType::NoName));
        }

        if let Some(rest) = normalize::strip_candidatus(&name) {
            pn.candidatus = true;
            pn.code = Some(NomCode::Bacterial);
            name = rest;
        }

        self.cancel.check()?;
        if let Some((rest, reference)) = normalize::preparse_nom_ref(&name) {
            pn.published_in = Some(reference);
            pn.add_warning(warnings::NOMENCLATURAL_REFERENCE);
            name = rest;
        }

        if let Some(rest) = normalize::remove_placeholder_author(&name) {
            if rest.is_empty() {
                return Err(JobError::Unparsable(NameType::Placeholder));
            }
            pn.doubtful = true;
            name = rest;
        }

        if let Some(name_type) = classify::detect_unparsable(&name) {
            return Err(JobError::Unparsable(name_type));
        }

        self.cancel.check()?;
        name = normalize::normalize(&name);
        if name.is_empty() {
            return Err(JobError::Unparsable(NameType::NoName));
        }

        while let Some((rest, note)) = normalize::extract_nom_status(&name) {
            pn.nomenclatural_note = Some(match pn.nomenclatural_note.take() {
                Some(existing) => format!("{existing}; {note}"),
                None => note,
            });
            name = rest;
        }
        if let Some(note) = &pn.nomenclatural_note {
            if regex!(r"\b(?:ined|in press|unpublished)").is_match(note) {
                pn.manuscript = true;
            }
        }

        if let Some((rest, note)) = normalize::extract_sec_reference(&name) {
            pn.taxonomic_note = Some(note);
            name = rest;
        }
        if pn.published_in.is_none() {
            if let Some((rest, reference)) = normalize::extract_published_in(&name) {
                pn.published_in = Some(reference);
                pn.add_warning(warnings::NOMENCLATURAL_REFERENCE);
                name = rest;
            }
        }

        name = normalize::normalize_hort(&name);
        if let Some(rest) = normalize::remove_question_marks(&name) {
            pn.add_warning(warnings::QUESTION_MARKS_REMOVED);
            pn.doubtful = true;
            name = rest;
        }
        name = normalize::norm_brackets(&name);
        name = normalize::norm_ws_punct(&name);
        if let Some(rest) = normalize::strip_unusual_characters(&name) {
            pn.add_warning(warnings::UNUSUAL_CHARACTERS);
            pn.doubtful = true;
            name = rest;
        }

        // Explicit nomenclatural code markers, e.g. `Aus bus (ICZN)`.
        let code_marker = regex!(r" ?\(?\b(?:ICZN|ICBN|ICNAFP|ICNCP|ICNB|ICNP|ICTV|ICN)\b\)? ?");
        let marker_span =
            code_marker.find(&name).map(|m| (m.start(), m.end(), m.as_str().to_string()));
        if let Some((start, end, marker)) = marker_span {
            if let Some(code) = vocab::code_of_marker(&marker) {
                if code == NomCode::Virus {
                    return Err(JobError::Unparsable(NameType::Virus));
                }
                if pn.code.is_none() {
                    pn.code = Some(code);
                }
            }
            let rebuilt = format!("{} {}", &name[..start], &name[end..]);
            name = normalize::norm_ws_punct(&rebuilt);
        }

        // Determination qualifiers make the whole name informal.
        let qualifier = regex!(r"\b(cf|aff|nr|sim)\.? ");
        if let Some(caps) = qualifier.captures(&name) {
            pn.name_type = NameType::Informal;
            pn.doubtful = true;
            pn.remarks = Some(format!("{}.", &caps[1]));
            name = qualifier.replace(&name, "").trim().to_string();
        }

        if name.is_empty() {
            return Err(JobError::Unparsable(NameType::NoName));
        }

        self.cancel.check()?;
        debug!(name = %name, "parse normalised name");
        self.parse_normalised(&name, &mut pn)?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            input = %self.scientific_name,
            "parsed name"
        );
        Ok(pn)
    }

    fn parse_normalised(&self, name: &str, pn: &mut ParsedName) -> Result<(), JobError> {
        // Names led by a bare rank marker carry no genus at all.
        if let Some(caps) = MISSING_GENUS_PATTERN.captures(name) {
            let marker = caps.name("rankmarker").unwrap().as_str();
            pn.rank = vocab::rank_of_marker(marker).unwrap_or(Rank::InfraspecificName);
            pn.infraspecific_epithet =
                caps.name("infepithet").map(|m| m.as_str().to_string());
            pn.add_warning(warnings::MISSING_GENUS);
            pn.add_warning(warnings::INDETERMINED);
            pn.name_type = NameType::Informal;
            pn.doubtful = true;
            pn.state = State::Complete;
            return Ok(());
        }

        let groups = match NAME_PATTERN.captures(name) {
            Some(caps) => collect_groups(&caps),
            None => match self.retry_capitalised(name) {
                Some(groups) => {
                    pn.add_warning(warnings::LC_MONOMIAL);
                    pn.doubtful = true;
                    groups
                }
                None => {
                    return Err(JobError::Unparsable(classify::classify_failure(name)));
                }
            },
        };

        let mut ext = Extraction::default();
        self.apply_groups(&groups, pn, &mut ext);
        self.finalize(name, pn, ext);
        Ok(())
    }

    /// Lower-case monomials are retried with the first letter capitalised.
    fn retry_capitalised(&self, name: &str) -> Option<Groups> {
        let first = name.chars().next()?;
        if !first.is_lowercase() {
            return None;
        }
        let capitalised: String =
            first.to_uppercase().chain(name.chars().skip(1)).collect();
        NAME_PATTERN.captures(&capitalised).map(|caps| collect_groups(&caps))
    }

    /// Map named capture groups onto the record; the table in `NAME_GROUPS`
    /// is the single source of truth for which groups exist.
    fn apply_groups(&self, groups: &Groups, pn: &mut ParsedName, ext: &mut Extraction) {
        let mut bas: [Option<&str>; 3] = [None; 3];
        let mut comb: [Option<&str>; 3] = [None; 3];
        let mut bas_sanct = None;
        let mut comb_sanct = None;
        let mut voucher: Option<&str> = None;
        let mut tail: Option<&str> = None;

        for (group, value) in groups {
            match *group {
                "nothogen" => pn.notho = Some(NamePart::Generic),
                "monomial" => ext.monomial = Some(value.clone()),
                "infragen" | "infragen2" => pn.infrageneric_epithet = Some(value.clone()),
                "rankgen" => ext.marker_rank = vocab::rank_of_marker(value),
                "nothosp" => pn.notho = Some(NamePart::Specific),
                "epithet" => pn.specific_epithet = Some(value.clone()),
                "rankmarker" => {
                    if value.starts_with("notho") {
                        pn.notho = Some(NamePart::Infraspecific);
                    }
                    ext.marker_rank = vocab::rank_of_marker(value);
                }
                "nothoinf" => pn.notho = Some(NamePart::Infraspecific),
                "infepithet" => pn.infraspecific_epithet = Some(value.clone()),
                "cultivar" => pn.cultivar_epithet = Some(value.clone()),
                "phrase" => pn.phrase = Some(value.clone()),
                "voucher" => voucher = Some(value.as_str()),
                "strain" => pn.strain = Some(value.clone()),
                "basex" => bas[0] = Some(value.as_str()),
                "basauth" => bas[1] = Some(value.as_str()),
                "basyear" => bas[2] = Some(value.as_str()),
                "bassanct" => bas_sanct = Some(value.clone()),
                "combex" => comb[0] = Some(value.as_str()),
                "combauth" => comb[1] = Some(value.as_str()),
                "combyear" => comb[2] = Some(value.as_str()),
                "combsanct" => comb_sanct = Some(value.clone()),
                "tail" => tail = Some(value.as_str()),
                _ => {}
            }
        }

        pn.basionym_authorship = authorship_of_groups(bas[0], bas[1], bas[2]);
        pn.combination_authorship = authorship_of_groups(comb[0], comb[1], comb[2]);
        pn.sanctioning_author = comb_sanct.or(bas_sanct);

        // A bare year in parentheses belongs to the combination.
        if pn.basionym_authorship.authors.is_empty()
            && pn.basionym_authorship.ex_authors.is_empty()
            && pn.basionym_authorship.year.is_some()
            && pn.combination_authorship.year.is_none()
        {
            pn.combination_authorship.year = pn.basionym_authorship.year.take();
        }

        if let Some(voucher) = voucher {
            pn.remarks = Some(match pn.remarks.take() {
                Some(existing) => format!("{existing}; {voucher}"),
                None => voucher.to_string(),
            });
        }

        match tail.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tail) => {
                pn.state = State::Partial;
                pn.add_unparsed(tail);
                debug!(tail = %tail, "partial match with unparsed remainder");
            }
            None => pn.state = State::Complete,
        }

        if pn.phrase.is_some() {
            pn.name_type = NameType::Informal;
        }
    }

    /// Rank resolution, epithet validation and the final consistency checks.
    fn finalize(&self, name: &str, pn: &mut ParsedName, mut ext: Extraction) {
        // Literal null epithets.
        for slot in [&mut pn.specific_epithet, &mut pn.infraspecific_epithet] {
            if matches!(slot.as_deref(), Some("null") | Some("none")) {
                *slot = None;
                pn.warnings.insert(warnings::NULL_EPITHET.to_string());
            }
        }

        // Blacklisted tokens in epithet position.
        if let Some(epithet) = pn.specific_epithet.clone() {
            if vocab::is_blacklisted_epithet(&epithet) {
                pn.add_warning(warnings::BLACKLISTED_EPITHET);
                if ext.marker_rank.is_none() {
                    ext.marker_rank = vocab::rank_of_marker(&epithet);
                }
                pn.specific_epithet = None;
            }
        }
        if let Some(infra) = pn.infraspecific_epithet.clone() {
            if vocab::is_blacklisted_epithet(&infra) {
                pn.add_warning(warnings::BLACKLISTED_EPITHET);
                pn.infraspecific_epithet = None;
            }
        }

        // A rank hint at or above genus turns `Genus particle ...` into a
        // uninomial with authorship rather than a binomial.
        if self.rank.is_comparable() && self.rank <= Rank::Genus {
            self.reinterpret_particle_epithet(name, pn);
        }

        // Rank: explicit marker, then epithet slots, then the hint, then
        // Latin endings of the uninomial.
        let slot_rank = if pn.cultivar_epithet.is_some() {
            Some(Rank::Cultivar)
        } else if pn.infraspecific_epithet.is_some() {
            Some(if self.code == Some(NomCode::Zoological) {
                Rank::Subspecies
            } else {
                Rank::InfraspecificName
            })
        } else if pn.specific_epithet.is_some() {
            Some(Rank::Species)
        } else if pn.infrageneric_epithet.is_some() {
            Some(Rank::InfragenericName)
        } else {
            None
        };

        let mut rank = ext.marker_rank.or(slot_rank).unwrap_or(Rank::Unranked);
        if rank == Rank::Unranked {
            if self.rank != Rank::Unranked {
                rank = self.rank;
            } else if let Some(mono) = &ext.monomial {
                if let Some(inferred) = vocab::suprageneric_rank_of(mono) {
                    rank = inferred;
                }
            }
        }

        // Hint consistency.
        if self.rank.is_comparable() && self.rank != rank {
            if self.rank < Rank::SpeciesAggregate && rank.is_species_or_below() {
                pn.add_warning(warnings::HIGHER_RANK_BINOMIAL);
            } else if self.rank == Rank::Species && rank.is_infraspecific() {
                pn.add_warning(warnings::SUBSPECIES_ASSIGNED);
            } else if rank.is_comparable() {
                pn.add_warning(warnings::RANK_MISMATCH);
            }
        }
        pn.rank = rank;

        // Genus or uninomial.
        if let Some(monomial) = ext.monomial.take() {
            let genus_like = pn.specific_epithet.is_some()
                || pn.infraspecific_epithet.is_some()
                || pn.infrageneric_epithet.is_some()
                || pn.cultivar_epithet.is_some()
                || pn.phrase.is_some()
                || pn.rank.is_species_or_below()
                || pn.rank.is_infrageneric();
            if genus_like {
                pn.genus = Some(monomial);
            } else {
                pn.uninomial = Some(monomial);
            }
        }

        // A notho marker must point at a populated slot.
        match pn.notho {
            Some(NamePart::Specific) if pn.specific_epithet.is_none() => pn.notho = None,
            Some(NamePart::Infraspecific) if pn.infraspecific_epithet.is_none() => {
                pn.notho = None
            }
            Some(NamePart::Generic) if pn.genus.is_none() && pn.uninomial.is_none() => {
                pn.notho = None
            }
            _ => {}
        }

        if pn.cultivar_epithet.is_some() {
            pn.code = Some(NomCode::Cultivars);
        } else if pn.code.is_none() {
            pn.code = self.code;
        }

        if pn.is_indetermined()
            || (pn.infraspecific_epithet.is_some() && pn.specific_epithet.is_none())
        {
            pn.add_warning(warnings::INDETERMINED);
        }
    }

    /// `Abies van der Veken` with a genus-or-higher rank hint: the lowercase
    /// tokens are an author, not epithets.
    fn reinterpret_particle_epithet(&self, name: &str, pn: &mut ParsedName) {
        let epithet = match &pn.specific_epithet {
            Some(e) if vocab::is_particle(e) => e.clone(),
            _ => return,
        };
        let monomial = match name.split_whitespace().next() {
            Some(m) => m,
            None => return,
        };
        let rest = name[monomial.len()..].trim();
        if !rest.starts_with(&epithet) {
            return;
        }
        let caps = match crate::atoms::AUTHORSHIP_PATTERN.captures(rest) {
            Some(c) => c,
            None => return,
        };
        let complete = caps.name("tail").map(|m| m.as_str().trim().is_empty()).unwrap_or(true);
        if !complete || caps.name("combauth").is_none() {
            return;
        }

        let group = |g: &str| caps.name(g).map(|m| m.as_str());
        pn.specific_epithet = None;
        pn.infraspecific_epithet = None;
        pn.notho = None;
        pn.basionym_authorship =
            authorship_of_groups(group("basex"), group("basauth"), group("basyear"));
        pn.combination_authorship =
            authorship_of_groups(group("combex"), group("combauth"), group("combyear"));
        pn.state = State::Complete;
        pn.unparsed.clear();
    }
}

fn collect_groups(caps: &regex::Captures<'_>) -> Groups {
    NAME_GROUPS
        .iter()
        .filter_map(|group| caps.name(group).map(|m| (*group, m.as_str().to_string())))
        .collect()
}
