//! Authorship parsing job.
//!
//! A specialisation of the name job for strings known to hold no epithets:
//! only the authorship pattern is applied, which makes the parse far more
//! reliable than running a full name through the name pattern.

use std::time::Instant;

use tracing::debug;

use crate::atoms::AUTHORSHIP_PATTERN;
use crate::normalize;
use crate::parsed_name::{warnings, Authorship, ParsedAuthorship, State};
use crate::pool::CancelFlag;

use super::job::JobError;

/// Split a matched author team on its separators. `al.` tails survive as a
/// final pseudo author.
pub(crate) fn split_team(team: &str) -> Vec<String> {
    regex!(r" ?[,;&] ?| et | and ")
        .split(team)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce a loosely matched year (`[1899]`, `1899?`, `1899-1901`) to its
/// plain form.
pub(crate) fn clean_year(year: &str) -> String {
    regex!(r"[12][0-9]{3}[a-dh]?(?:[-/][0-9]{1,4})?")
        .find(year)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| year.trim().to_string())
}

/// Combine the three authorship capture groups of one block into an
/// [`Authorship`].
pub(crate) fn authorship_of_groups(
    ex: Option<&str>,
    team: Option<&str>,
    year: Option<&str>,
) -> Authorship {
    Authorship {
        authors: team.map(split_team).unwrap_or_default(),
        ex_authors: ex.map(split_team).unwrap_or_default(),
        year: year.map(clean_year),
    }
}

pub(crate) struct AuthorshipParsingJob {
    authorship: String,
    cancel: CancelFlag,
}

impl AuthorshipParsingJob {
    pub fn new(authorship: impl Into<String>, cancel: CancelFlag) -> Self {
        AuthorshipParsingJob { authorship: authorship.into(), cancel }
    }

    pub fn run(self) -> Result<ParsedAuthorship, JobError> {
        let started = Instant::now();
        let mut pa = ParsedAuthorship::default();

        let cleaned = normalize::pre_clean(&self.authorship);
        if cleaned.html_entities {
            pa.add_warning(warnings::HTML_ENTITIES);
        }
        if cleaned.xml_tags {
            pa.add_warning(warnings::XML_TAGS);
        }
        if cleaned.enclosing_quotes {
            pa.add_warning(warnings::REPL_ENCLOSING_QUOTE);
        }
        let mut name = cleaned.text;

        self.cancel.check()?;
        if let Some((rest, reference)) = normalize::preparse_nom_ref(&name) {
            pa.published_in = Some(reference);
            pa.add_warning(warnings::NOMENCLATURAL_REFERENCE);
            name = rest;
        }

        name = normalize::normalize(&name);
        if name.is_empty() {
            return Err(JobError::UnparsableAuthorship);
        }

        self.cancel.check()?;
        while let Some((rest, note)) = normalize::extract_nom_status(&name) {
            pa.nomenclatural_note = Some(match pa.nomenclatural_note.take() {
                Some(existing) => format!("{existing}; {note}"),
                None => note,
            });
            name = rest;
        }
        if let Some(note) = &pa.nomenclatural_note {
            if regex!(r"\b(?:ined|in press|unpublished)").is_match(note) {
                pa.manuscript = true;
            }
        }
        if let Some((rest, note)) = normalize::extract_sec_reference(&name) {
            pa.taxonomic_note = Some(note);
            name = rest;
        }
        if pa.published_in.is_none() {
            if let Some((rest, reference)) = normalize::extract_published_in(&name) {
                pa.published_in = Some(reference);
                pa.add_warning(warnings::NOMENCLATURAL_REFERENCE);
                name = rest;
            }
        }

        name = normalize::normalize_hort(&name);
        if let Some(cleaned) = normalize::remove_question_marks(&name) {
            pa.add_warning(warnings::QUESTION_MARKS_REMOVED);
            name = cleaned;
        }
        name = normalize::norm_brackets(&name);
        name = normalize::norm_ws_punct(&name);

        self.cancel.check()?;
        debug!(authorship = %name, "parse normalised authorship");
        self.parse_normalised(&name, &mut pa)?;

        debug!(elapsed_ms = started.elapsed().as_millis() as u64, input = %self.authorship, "parsed authorship");
        Ok(pa)
    }

    fn parse_normalised(&self, name: &str, pa: &mut ParsedAuthorship) -> Result<(), JobError> {
        let caps = match AUTHORSHIP_PATTERN.captures(name) {
            Some(caps) => caps,
            None => return Err(JobError::UnparsableAuthorship),
        };

        let group = |g: &str| caps.name(g).map(|m| m.as_str());

        pa.basionym_authorship =
            authorship_of_groups(group("basex"), group("basauth"), group("basyear"));
        pa.combination_authorship =
            authorship_of_groups(group("combex"), group("combauth"), group("combyear"));
        pa.sanctioning_author =
            group("combsanct").or_else(|| group("bassanct")).map(str::to_string);

        // A bare year in parentheses belongs to the combination.
        if pa.basionym_authorship.authors.is_empty()
            && pa.basionym_authorship.ex_authors.is_empty()
            && pa.basionym_authorship.year.is_some()
            && pa.combination_authorship.year.is_none()
        {
            pa.combination_authorship.year = pa.basionym_authorship.year.take();
        }

        if pa.basionym_authorship.is_empty()
            && pa.combination_authorship.is_empty()
            && pa.sanctioning_author.is_none()
        {
            return Err(JobError::UnparsableAuthorship);
        }

        match group("tail").map(str::trim).filter(|t| !t.is_empty()) {
            Some(tail) => {
                pa.state = State::Partial;
                pa.add_unparsed(tail);
                debug!(tail = %tail, "partial authorship match");
            }
            None => pa.state = State::Complete,
        }
        Ok(())
    }
}
