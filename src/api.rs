//! Public parser surface.
//!
//! [`NameParser`] owns the worker pool, the per-call timeout and the manual
//! overrides. Reuse one instance as much as possible and call [`NameParser::close`]
//! (or drop it) so the worker threads shut down properly.
//!
//! The two parse operations never fail with anything other than their typed
//! unparsable errors: timeouts, cancellations, pool saturation and worker
//! failures are all converted.

use std::sync::mpsc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::configs::ParserConfigs;
use crate::engine::{AuthorshipParsingJob, JobError, ParsingJob};
use crate::error::{UnparsableAuthorship, UnparsableName};
use crate::parsed_name::{NameType, NomCode, ParsedAuthorship, ParsedName};
use crate::pool::{CancelFlag, SubmitError, WorkerPool};
use crate::rank::Rank;

/// Default per-parse wall-clock timeout.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 1000;
const DEFAULT_CORE_POOL_SIZE: usize = 0;
const DEFAULT_MAX_POOL_SIZE: usize = 100;

pub struct NameParser {
    timeout: Duration,
    pool: WorkerPool,
    configs: ParserConfigs,
}

impl NameParser {
    /// A parser with the default 1 s timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_MILLIS)
    }

    /// A parser with an explicit timeout in milliseconds.
    ///
    /// # Panics
    ///
    /// Panics when `timeout_millis` is zero; a deadline is not optional.
    pub fn with_timeout(timeout_millis: u64) -> Self {
        Self::with_pool(timeout_millis, DEFAULT_CORE_POOL_SIZE, DEFAULT_MAX_POOL_SIZE)
    }

    /// Full control over timeout and pool sizing. Idle workers above
    /// `core_pool_size` terminate after twice the timeout.
    pub fn with_pool(timeout_millis: u64, core_pool_size: usize, max_pool_size: usize) -> Self {
        assert!(timeout_millis > 0, "timeout needs to be at least 1ms");
        debug!(timeout_millis, core_pool_size, max_pool_size, "create new name parser");
        let timeout = Duration::from_millis(timeout_millis);
        NameParser {
            timeout,
            pool: WorkerPool::new(core_pool_size, max_pool_size, timeout * 2),
            configs: ParserConfigs::new(),
        }
    }

    /// The mutable manual overrides consulted before every parse.
    pub fn configs(&self) -> &ParserConfigs {
        &self.configs
    }

    /// Parse a scientific name with no rank or code hint.
    pub fn parse(&self, scientific_name: &str) -> Result<ParsedName, UnparsableName> {
        self.parse_with(scientific_name, Rank::Unranked, None)
    }

    /// Fully parse the supplied name, extracting authorships, a conceptual
    /// sec reference, remarks and nomenclatural status notes.
    ///
    /// The rank hint helps telling infrageneric names from bracket authors;
    /// the code hint biases rank-marker resolution. Strings that are no
    /// scientific name, virus names and proper hybrid formulas yield an
    /// [`UnparsableName`] carrying the detected [`NameType`].
    pub fn parse_with(
        &self,
        scientific_name: &str,
        rank: Rank,
        code: Option<NomCode>,
    ) -> Result<ParsedName, UnparsableName> {
        if scientific_name.trim().is_empty() {
            return Err(UnparsableName::new(NameType::NoName, scientific_name));
        }
        if let Some(parsed) = self.configs.for_name(scientific_name) {
            debug!(name = %scientific_name, "manual override found for name");
            return Ok(parsed);
        }

        let cancel = CancelFlag::new();
        let job = ParsingJob::new(scientific_name, rank, code, cancel.clone());
        let (tx, rx) = mpsc::channel();
        let submitted = self.pool.submit(
            Box::new(move || {
                let _ = tx.send(job.run());
            }),
            self.timeout,
        );
        match submitted {
            Ok(()) => {}
            Err(SubmitError::Terminated) => {
                return Err(UnparsableName::new(NameType::NoName, scientific_name));
            }
            Err(SubmitError::Saturated) => {
                warn!(name = %scientific_name, "parser pool saturated, rejecting parse");
                return Err(UnparsableName::new(NameType::NoName, scientific_name));
            }
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(parsed)) => Ok(parsed),
            Ok(Err(JobError::Unparsable(name_type))) => {
                Err(UnparsableName::new(name_type, scientific_name))
            }
            Ok(Err(JobError::UnparsableAuthorship | JobError::Cancelled)) => {
                Err(UnparsableName::new(NameType::NoName, scientific_name))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(name = %scientific_name, "parsing timeout");
                cancel.cancel();
                Err(UnparsableName::new(NameType::Scientific, scientific_name))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!(name = %scientific_name, "parse job was dropped before completion");
                Err(UnparsableName::new(NameType::NoName, scientific_name))
            }
        }
    }

    /// Parse a free-standing authorship incl. basionym, ex authors and years.
    pub fn parse_authorship(
        &self,
        authorship: &str,
    ) -> Result<ParsedAuthorship, UnparsableAuthorship> {
        if authorship.trim().is_empty() {
            return Err(UnparsableAuthorship::new(authorship));
        }
        if let Some(parsed) = self.configs.for_authorship(authorship) {
            debug!(authorship = %authorship, "manual override found for authorship");
            return Ok(parsed);
        }

        let cancel = CancelFlag::new();
        let job = AuthorshipParsingJob::new(authorship, cancel.clone());
        let (tx, rx) = mpsc::channel();
        let submitted = self.pool.submit(
            Box::new(move || {
                let _ = tx.send(job.run());
            }),
            self.timeout,
        );
        if submitted.is_err() {
            return Err(UnparsableAuthorship::new(authorship));
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(parsed)) => Ok(parsed),
            Ok(Err(_)) => Err(UnparsableAuthorship::new(authorship)),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(authorship = %authorship, "authorship parsing timeout");
                cancel.cancel();
                Err(UnparsableAuthorship::new(authorship))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(UnparsableAuthorship::new(authorship))
            }
        }
    }

    /// Release the worker threads. Idempotent; subsequent parses fail with
    /// an unparsable error instead of blocking.
    pub fn close(&self) {
        debug!("shutting down name parser worker threads");
        self.pool.shutdown(Duration::from_secs(1));
    }
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NameParser {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_name::State;
    use std::time::Instant;

    #[test]
    fn parse_through_the_pool() {
        let parser = NameParser::new();
        let pn = parser.parse("Abies alba Mill.").unwrap();
        assert_eq!(pn.genus.as_deref(), Some("Abies"));
        assert_eq!(pn.specific_epithet.as_deref(), Some("alba"));
        assert_eq!(pn.combination_authorship.authors, vec!["Mill."]);
        assert_eq!(pn.state, State::Complete);

        let err = parser.parse("BOLD:AAX3687").unwrap_err();
        assert_eq!(err.name_type, NameType::Otu);
        assert_eq!(err.name, "BOLD:AAX3687");
        parser.close();
    }

    #[test]
    fn empty_input_fails_fast() {
        let parser = NameParser::new();
        let err = parser.parse("").unwrap_err();
        assert_eq!(err.name_type, NameType::NoName);
        assert!(parser.parse_authorship("  ").is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let parser = NameParser::new();
        let mut custom = ParsedName::new();
        custom.uninomial = Some("Overridden".into());
        custom.remarks = Some("curator verified".into());
        parser.configs().set_name("Abies alba Mill.", custom.clone());

        assert_eq!(parser.parse("Abies alba Mill.").unwrap(), custom);

        parser.configs().delete_name("Abies alba Mill.");
        let reparsed = parser.parse("Abies alba Mill.").unwrap();
        assert_eq!(reparsed.genus.as_deref(), Some("Abies"));
    }

    #[test]
    fn authorship_overrides_take_precedence() {
        let parser = NameParser::new();
        let mut custom = ParsedAuthorship::default();
        custom.combination_authorship.authors.push("Custom".into());
        parser.configs().set_authorship("L.", custom.clone());
        assert_eq!(parser.parse_authorship("L.").unwrap(), custom);
    }

    #[test]
    fn parse_authorship_through_the_pool() {
        let parser = NameParser::new();
        let pa = parser.parse_authorship("(Cleve, 1899) Jørgensen, 1905").unwrap();
        assert_eq!(pa.basionym_authorship.authors, vec!["Cleve"]);
        assert_eq!(pa.combination_authorship.year.as_deref(), Some("1905"));
    }

    #[test]
    fn close_is_idempotent_and_rejects_parses() {
        let parser = NameParser::with_timeout(200);
        parser.close();
        parser.close();

        let started = Instant::now();
        let err = parser.parse("Abies alba Mill.").unwrap_err();
        assert_eq!(err.name_type, NameType::NoName);
        // Rejection happens within one timeout.
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn pathological_input_respects_deadline() {
        let parser = NameParser::with_timeout(1000);
        let input = "a ".repeat(200);
        let started = Instant::now();
        let err = parser.parse(&input).unwrap_err();
        assert_eq!(err.name_type, NameType::NoName);
        assert!(started.elapsed() < Duration::from_millis(1500));
        parser.close();
    }

    #[test]
    #[should_panic]
    fn zero_timeout_is_a_programmer_error() {
        let _ = NameParser::with_timeout(0);
    }

    #[test]
    fn rank_and_code_hints_are_forwarded() {
        let parser = NameParser::new();
        let pn = parser
            .parse_with("Poephila personata leucotis", Rank::Unranked, Some(NomCode::Zoological))
            .unwrap();
        assert_eq!(pn.rank, Rank::Subspecies);
        parser.close();
    }
}
