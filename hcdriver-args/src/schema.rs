//! Declarative binding between [`SessionOptions`] fields and command-line
//! switches.
//!
//! Both the marshaler and the parser walk the same table, so a new engine
//! switch only needs a new entry in the `session_options!` declaration.

use std::collections::HashSet;
use std::fmt;

use crate::error::ArgsError;
use crate::options::{OPTION_SCHEMA, SessionOptions};

/// Primitive encoding used for an option on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Bare switch, emitted only when set to `true`.
    Flag,
    /// `--name=<decimal>`.
    Integer,
    /// `--name=<value>`, or the raw value for positional arguments.
    Text,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an option may be left out of the generated command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Absence is a caller error reported before marshaling starts.
    Required,
    /// Absent values contribute nothing to the output. Presence alone
    /// decides emission; an integer set to zero is always emitted.
    OmitWhenAbsent,
}

/// Read-only view of a single field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Flag(Option<bool>),
    Integer(Option<i64>),
    Text(Option<&'a str>),
}

impl FieldRef<'_> {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Flag(_) => OptionKind::Flag,
            Self::Integer(_) => OptionKind::Integer,
            Self::Text(_) => OptionKind::Text,
        }
    }

    pub fn is_absent(&self) -> bool {
        match self {
            Self::Flag(value) => value.is_none(),
            Self::Integer(value) => value.is_none(),
            Self::Text(value) => value.is_none_or(str::is_empty),
        }
    }
}

/// Mutable handle to a single field, used by the parser.
#[derive(Debug)]
pub enum FieldMut<'a> {
    Flag(&'a mut Option<bool>),
    Integer(&'a mut Option<i64>),
    Text(&'a mut Option<String>),
    /// Positional input where an empty string means absent.
    Required(&'a mut String),
}

impl FieldMut<'_> {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Flag(_) => OptionKind::Flag,
            Self::Integer(_) => OptionKind::Integer,
            Self::Text(_) | Self::Required(_) => OptionKind::Text,
        }
    }

    /// Resets the field to its absent representation.
    pub fn clear(self) {
        match self {
            Self::Flag(slot) => *slot = None,
            Self::Integer(slot) => *slot = None,
            Self::Text(slot) => *slot = None,
            Self::Required(slot) => slot.clear(),
        }
    }
}

/// Maps a field's Rust type onto its schema accessors.
pub(crate) trait FieldSlot {
    fn field_ref(&self) -> FieldRef<'_>;
    fn field_mut(&mut self) -> FieldMut<'_>;
    fn is_unset(&self) -> bool {
        self.field_ref().is_absent()
    }
}

impl FieldSlot for Option<bool> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Flag(*self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Flag(self)
    }

    // `Some(false)` is still serialized; only the argv encoding drops it.
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl FieldSlot for Option<i64> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Integer(*self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Integer(self)
    }
}

impl FieldSlot for Option<String> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Text(self.as_deref())
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Text(self)
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl FieldSlot for String {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Text((!self.is_empty()).then_some(self.as_str()))
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Required(self)
    }
}

/// One row of the option schema.
#[derive(Clone, Copy)]
pub struct OptionSpec {
    /// Field identifier inside [`SessionOptions`].
    pub field: &'static str,
    /// Full switch (`--hash-type`), or `None` for positional arguments.
    pub argument: Option<&'static str>,
    pub kind: OptionKind,
    pub presence: Presence,
    pub read: for<'a> fn(&'a SessionOptions) -> FieldRef<'a>,
    pub write: for<'a> fn(&'a mut SessionOptions) -> FieldMut<'a>,
}

impl OptionSpec {
    pub fn is_positional(&self) -> bool {
        self.argument.is_none()
    }

    /// Switch name without the leading dashes, as the tokenizer expects it.
    pub fn long_name(&self) -> Option<&'static str> {
        self.argument
            .map(|argument| argument.strip_prefix("--").unwrap_or(argument))
    }

    /// Label used in diagnostics: the switch, or the field for positionals.
    pub fn label(&self) -> &'static str {
        self.argument.unwrap_or(self.field)
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("field", &self.field)
            .field("argument", &self.argument)
            .field("kind", &self.kind)
            .field("presence", &self.presence)
            .finish_non_exhaustive()
    }
}

/// The schema shipped with this crate.
pub fn option_schema() -> &'static [OptionSpec] {
    OPTION_SCHEMA
}

pub fn find_by_field(field: &str) -> Option<&'static OptionSpec> {
    OPTION_SCHEMA.iter().find(|spec| spec.field == field)
}

/// Looks up a switch; accepts the name with or without its leading dashes.
pub fn find_by_argument(argument: &str) -> Option<&'static OptionSpec> {
    let wanted = argument.strip_prefix("--").unwrap_or(argument);
    OPTION_SCHEMA
        .iter()
        .find(|spec| spec.long_name() == Some(wanted))
}

/// Checks the structural invariants of a schema: switch names are unique and
/// dash-prefixed, only text options are positional, and every accessor holds
/// the kind its entry declares.
pub fn validate_schema(schema: &[OptionSpec]) -> Result<(), ArgsError> {
    let mut seen_arguments = HashSet::new();
    let mut seen_fields = HashSet::new();
    let sample = SessionOptions::default();

    for spec in schema {
        if !seen_fields.insert(spec.field) {
            return Err(ArgsError::SchemaInconsistency {
                field: spec.field,
                reason: "field declared more than once".to_string(),
            });
        }

        match spec.argument {
            Some(argument) => {
                if !argument.starts_with("--") || argument.len() <= 2 {
                    return Err(ArgsError::SchemaInconsistency {
                        field: spec.field,
                        reason: format!("argument name `{argument}` must be `--` followed by a name"),
                    });
                }
                if !seen_arguments.insert(argument) {
                    return Err(ArgsError::SchemaInconsistency {
                        field: spec.field,
                        reason: format!("argument name `{argument}` is already bound"),
                    });
                }
            }
            None if spec.kind != OptionKind::Text => {
                return Err(ArgsError::SchemaInconsistency {
                    field: spec.field,
                    reason: format!("{} options need an argument name", spec.kind),
                });
            }
            None => {}
        }

        let found = (spec.read)(&sample).kind();
        if found != spec.kind {
            return Err(ArgsError::kind_mismatch(spec.field, spec.kind, found));
        }
    }

    Ok(())
}
