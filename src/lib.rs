//! Parser for Linnaean-style scientific names.
//!
//! Given a free-form string purporting to be a scientific name, the parser
//! decomposes it into a structured [`ParsedName`]: genus or uninomial,
//! epithets, rank, hybrid markers, cultivar epithet, authorships with ex
//! authors and years, status notes, sec reference and citation — or a typed
//! [`UnparsableName`] classifying the input as a virus name, hybrid formula,
//! OTU identifier, placeholder or plain garbage.
//!
//! Parsing runs on a background worker pool with a hard wall-clock deadline
//! per call, so a single pathological input can never stall a pipeline.
//!
//! ```
//! use nomen::{NameParser, Rank};
//!
//! let parser = NameParser::new();
//! let name = parser.parse("Abies alba Mill.").unwrap();
//! assert_eq!(name.genus.as_deref(), Some("Abies"));
//! assert_eq!(name.specific_epithet.as_deref(), Some("alba"));
//! assert_eq!(name.rank, Rank::Species);
//! parser.close();
//! ```

extern crate self as nomen;

#[macro_use]
mod macros;
mod api;
mod atoms;
mod configs;
mod engine;
mod error;
mod normalize;
mod parsed_name;
mod pool;
mod rank;
mod vocab;

pub use api::{NameParser, DEFAULT_TIMEOUT_MILLIS};
pub use configs::ParserConfigs;
pub use error::{UnparsableAuthorship, UnparsableName};
pub use parsed_name::{
    warnings, Authorship, NamePart, NameType, NomCode, ParsedAuthorship, ParsedName, State,
};
pub use rank::Rank;
