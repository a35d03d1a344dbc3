//! Author name vocabulary: surname particles and placeholder authors.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Lowercase particles that may precede a surname (`van der Veken`,
/// `de la Torre`). Multi-word particles are expressed by repetition of the
/// single-word forms in the author pattern.
pub(crate) static AUTHOR_PARTICLES: &[&str] = &[
    "af", "av", "a", "ab", "al", "ap", "auf", "bin", "da", "dal", "dalla", "de", "degli", "dei",
    "del", "della", "den", "der", "des", "di", "do", "don", "dos", "du", "el", "ibn", "la", "le",
    "ten", "ter", "van", "vander", "vd", "vom", "von", "zu", "zum", "zur",
];

static PARTICLE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| AUTHOR_PARTICLES.iter().copied().collect());

/// True when a lowercase token is a known surname particle.
pub(crate) fn is_particle(token: &str) -> bool {
    PARTICLE_SET.contains(token.trim_end_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particles() {
        assert!(is_particle("van"));
        assert!(is_particle("der"));
        assert!(is_particle("de"));
        assert!(!is_particle("alba"));
    }
}
