//! Manual parser overrides.
//!
//! Curators register exact input strings whose parse result is known (or
//! known to be pathological); the harness consults these maps before any job
//! is submitted. Reads and writes are atomic per entry: concurrent readers
//! see either the old or the new value, and the last write wins.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::parsed_name::{ParsedAuthorship, ParsedName};

#[derive(Debug, Default)]
pub struct ParserConfigs {
    names: RwLock<HashMap<String, ParsedName>>,
    authorships: RwLock<HashMap<String, ParsedAuthorship>>,
}

impl ParserConfigs {
    pub fn new() -> Self {
        ParserConfigs::default()
    }

    /// The override for a full name, if one is registered.
    pub fn for_name(&self, name: &str) -> Option<ParsedName> {
        self.names.read().unwrap().get(name).cloned()
    }

    /// The override for an authorship, if one is registered.
    pub fn for_authorship(&self, authorship: &str) -> Option<ParsedAuthorship> {
        self.authorships.read().unwrap().get(authorship).cloned()
    }

    pub fn set_name(&self, name: impl Into<String>, parsed: ParsedName) {
        self.names.write().unwrap().insert(name.into(), parsed);
    }

    pub fn set_authorship(&self, authorship: impl Into<String>, parsed: ParsedAuthorship) {
        self.authorships.write().unwrap().insert(authorship.into(), parsed);
    }

    pub fn delete_name(&self, name: &str) -> Option<ParsedName> {
        self.names.write().unwrap().remove(name)
    }

    pub fn delete_authorship(&self, authorship: &str) -> Option<ParsedAuthorship> {
        self.authorships.write().unwrap().remove(authorship)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;

    #[test]
    fn name_overrides_roundtrip() {
        let configs = ParserConfigs::new();
        assert!(configs.for_name("Abies alba").is_none());

        let mut pn = ParsedName::new();
        pn.genus = Some("Abies".into());
        pn.specific_epithet = Some("alba".into());
        pn.rank = Rank::Species;
        configs.set_name("Abies alba", pn.clone());

        assert_eq!(configs.for_name("Abies alba"), Some(pn));
        assert!(configs.delete_name("Abies alba").is_some());
        assert!(configs.for_name("Abies alba").is_none());
    }

    #[test]
    fn last_write_wins() {
        let configs = ParserConfigs::new();
        let mut first = ParsedName::new();
        first.uninomial = Some("Abies".into());
        let mut second = ParsedName::new();
        second.uninomial = Some("Picea".into());

        configs.set_name("x", first);
        configs.set_name("x", second.clone());
        assert_eq!(configs.for_name("x"), Some(second));
    }
}
