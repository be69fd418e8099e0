use thiserror::Error;

use crate::schema::OptionKind;

/// Errors produced while marshaling [`SessionOptions`](crate::SessionOptions)
/// into argv or parsing a command line back into options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// A schema entry declares a kind its backing field cannot hold, or an
    /// entry is malformed (duplicate or missing argument name).
    #[error("schema inconsistency on `{field}`: {reason}")]
    SchemaInconsistency { field: &'static str, reason: String },

    #[error("required option `{field}` has no value")]
    RequiredFieldAbsent { field: &'static str },

    #[error("unrecognized token `{token}`: {reason}")]
    UnrecognizedToken { token: String, reason: String },

    #[error("malformed value `{value}` for `{argument}`: {reason}")]
    MalformedValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl ArgsError {
    pub(crate) fn kind_mismatch(field: &'static str, declared: OptionKind, found: OptionKind) -> Self {
        Self::SchemaInconsistency {
            field,
            reason: format!("declared as {declared} but the field holds {found}"),
        }
    }
}
