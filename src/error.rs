//! The error taxonomy.
//!
//! The two parse operations only ever fail with these typed errors; worker
//! panics, timeouts and cancellations are converted by the harness and never
//! reach the caller as anything else.

use thiserror::Error;

use crate::parsed_name::NameType;

/// A string that cannot be expressed as a single parsed name, carrying the
/// classifier's best guess at what it is instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unparsable {name_type} name: {name}")]
pub struct UnparsableName {
    pub name_type: NameType,
    pub name: String,
}

impl UnparsableName {
    pub fn new(name_type: NameType, name: impl Into<String>) -> Self {
        UnparsableName { name_type, name: name.into() }
    }
}

/// An authorship string that does not match the authorship grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unparsable authorship: {authorship}")]
pub struct UnparsableAuthorship {
    pub authorship: String,
}

impl UnparsableAuthorship {
    pub fn new(authorship: impl Into<String>) -> Self {
        UnparsableAuthorship { authorship: authorship.into() }
    }
}
