//! Parsing jobs.
//!
//! This module is the operational core of the parser. Parsing one input is a
//! pipeline:
//!
//! ```text
//! input ── pre_clean ──┬─ preparse nom. reference      (normalize.rs)
//!                      ├─ placeholder author removal
//!                      ├─ unparsable detection          (classify.rs)
//!                      ├─ normalise + extractions
//!                      v
//!              NAME_PATTERN match                       (atoms.rs)
//!                      │
//!                      ├─ no match ─ classify_failure ─ UnparsableName
//!                      v
//!              group extraction + finalize  ──  ParsedName
//! ```
//!
//! ## Responsibilities by module
//!
//! - `job.rs`: the name-parsing job; owns the pipeline order, the capture
//!   group mapping and the rank/consistency finalisation.
//! - `authorship.rs`: the authorship-parsing job and the author team
//!   splitting helpers shared with `job.rs`.
//! - `classify.rs`: coarse scans for viruses, OTUs, hybrid formulas and
//!   placeholders; also the best-guess classifier for failed matches.
//!
//! Jobs are synchronous and single-shot; the bounded execution harness in
//! `pool.rs` runs them on worker threads and enforces the deadline. Each job
//! polls its [`crate::pool::CancelFlag`] between pipeline stages so an
//! abandoned parse stops early.

#[path = "engine/authorship.rs"]
mod authorship;
#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/job.rs"]
mod job;

pub(crate) use authorship::AuthorshipParsingJob;
pub(crate) use job::{JobError, ParsingJob};
