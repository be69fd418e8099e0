use tracing::debug;

use crate::error::ArgsError;
use crate::options::{OPTION_SCHEMA, SessionOptions};
use crate::schema::{FieldRef, OptionSpec, Presence};

/// Builds the engine argument list for `options` using the shipped schema.
///
/// The result is either the complete argv or an error; a partially encoded
/// list is never returned.
pub fn marshal(options: &SessionOptions) -> Result<Vec<String>, ArgsError> {
    marshal_with(OPTION_SCHEMA, options)
}

/// Same as [`marshal`] but driven by an arbitrary schema table.
pub fn marshal_with(
    schema: &[OptionSpec],
    options: &SessionOptions,
) -> Result<Vec<String>, ArgsError> {
    ensure_required(schema, options)?;

    let mut separator = needs_separator(schema, options);
    let mut args = Vec::with_capacity(schema.len() + 1);
    for spec in schema {
        if separator && spec.is_positional() {
            args.push(POSITIONAL_SEPARATOR.to_string());
            separator = false;
        }
        encode(spec, (spec.read)(options), &mut args)?;
    }

    debug!(count = args.len(), "marshaled session options");
    Ok(args)
}

/// Ends switch parsing so positional values may start with `-`.
const POSITIONAL_SEPARATOR: &str = "--";

fn needs_separator(schema: &[OptionSpec], options: &SessionOptions) -> bool {
    schema
        .iter()
        .filter(|spec| spec.is_positional())
        .any(|spec| {
            matches!((spec.read)(options), FieldRef::Text(Some(text)) if text.starts_with('-'))
        })
}

fn ensure_required(schema: &[OptionSpec], options: &SessionOptions) -> Result<(), ArgsError> {
    match schema
        .iter()
        .filter(|spec| spec.presence == Presence::Required)
        .find(|spec| (spec.read)(options).is_absent())
    {
        Some(spec) => Err(ArgsError::RequiredFieldAbsent { field: spec.field }),
        None => Ok(()),
    }
}

fn encode(spec: &OptionSpec, value: FieldRef<'_>, args: &mut Vec<String>) -> Result<(), ArgsError> {
    if value.kind() != spec.kind {
        return Err(ArgsError::kind_mismatch(spec.field, spec.kind, value.kind()));
    }

    match (value, spec.argument) {
        (FieldRef::Flag(Some(true)), Some(argument)) => args.push(argument.to_string()),
        (FieldRef::Flag(_), Some(_)) => {}
        (FieldRef::Integer(Some(number)), Some(argument)) => {
            args.push(format!("{argument}={number}"));
        }
        (FieldRef::Integer(None), Some(_)) => {}
        (FieldRef::Text(Some(text)), argument) if !text.is_empty() => match argument {
            Some(argument) => args.push(format!("{argument}={text}")),
            None => args.push(text.to_string()),
        },
        (FieldRef::Text(_), _) => {}
        (FieldRef::Flag(_) | FieldRef::Integer(_), None) => {
            return Err(ArgsError::SchemaInconsistency {
                field: spec.field,
                reason: format!("{} options cannot be positional", spec.kind),
            });
        }
    }

    Ok(())
}
