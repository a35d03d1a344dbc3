//! Frozen vocabulary tables.
//!
//! Everything here is a process-lifetime constant: rank markers, placeholder
//! tokens, epithet blacklists, author particles and the nomenclatural status
//! vocabulary. The regex atom library composes its alternations from these
//! tables and the classifier consults them directly, so the two can never
//! disagree about what a marker or a placeholder looks like.

#[path = "vocab/markers.rs"]
mod markers;
#[path = "vocab/authors.rs"]
mod authors;
#[path = "vocab/placeholders.rs"]
mod placeholders;
#[path = "vocab/status.rs"]
mod status;

pub(crate) use authors::{is_particle, AUTHOR_PARTICLES};
pub(crate) use markers::{
    infrageneric_marker_stems, marker_stems_longest_first, rank_of_marker, suprageneric_rank_of,
};
pub(crate) use placeholders::{is_blacklisted_epithet, is_placeholder};
pub(crate) use status::{code_of_marker, NOM_STATUS_STEMS};
