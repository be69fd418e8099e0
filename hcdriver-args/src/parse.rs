//! Reconstructs [`SessionOptions`] from a serialized command line.
//!
//! Tokenizing is delegated to a `clap` command generated from the schema.
//! Every switch is registered with a library default, so the matches alone
//! cannot tell "absent" from "explicitly zero". Presence is taken from
//! [`ArgMatches::value_source`] instead: only values that came from the
//! command line are copied onto the result and every other field is reset.

use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::trace;

use crate::error::ArgsError;
use crate::options::{OPTION_SCHEMA, SessionOptions};
use crate::schema::{FieldMut, OptionKind, OptionSpec, validate_schema};

/// Parses a whitespace separated argument line.
pub fn parse(line: &str) -> Result<SessionOptions, ArgsError> {
    parse_args(line.split_whitespace())
}

/// Parses already tokenized arguments.
pub fn parse_args<I, T>(tokens: I) -> Result<SessionOptions, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    parse_with(OPTION_SCHEMA, tokens)
}

/// Parses arguments against an arbitrary schema table.
pub fn parse_with<I, T>(schema: &[OptionSpec], tokens: I) -> Result<SessionOptions, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    validate_schema(schema)?;

    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    let matches = tokenizer(schema)
        .try_get_matches_from(&tokens)
        .map_err(|err| classify(schema, &tokens, &err))?;

    ensure_positionals_trail(schema, &matches)?;

    let mut options = SessionOptions::default();
    for spec in schema {
        if matches.value_source(spec.field) == Some(ValueSource::CommandLine) {
            trace!(field = spec.field, "switch present on command line");
            assign(spec, &matches, &mut options)?;
        } else {
            (spec.write)(&mut options).clear();
        }
    }

    Ok(options)
}

fn tokenizer(schema: &[OptionSpec]) -> Command {
    let mut command = Command::new("hashcat")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .allow_negative_numbers(true);

    let mut position = 0;
    for spec in schema {
        let arg = Arg::new(spec.field).action(ArgAction::Set);
        let arg = match spec.long_name() {
            Some(long) => {
                let arg = arg.long(long);
                match spec.kind {
                    OptionKind::Flag => arg
                        .num_args(0..=1)
                        .require_equals(true)
                        .default_missing_value("true")
                        .default_value("false")
                        .value_parser(BoolishValueParser::new()),
                    OptionKind::Integer => arg.default_value("0").value_parser(value_parser!(i64)),
                    OptionKind::Text => arg.default_value(""),
                }
            }
            None => {
                position += 1;
                arg.index(position)
            }
        };
        command = command.arg(arg);
    }

    command
}

/// Positional inputs are only valid after the last switch.
fn ensure_positionals_trail(schema: &[OptionSpec], matches: &ArgMatches) -> Result<(), ArgsError> {
    let last_switch = schema
        .iter()
        .filter(|spec| !spec.is_positional())
        .filter(|spec| matches.value_source(spec.field) == Some(ValueSource::CommandLine))
        .filter_map(|spec| matches.indices_of(spec.field).and_then(Iterator::max))
        .max();

    let Some(last_switch) = last_switch else {
        return Ok(());
    };

    for spec in schema.iter().filter(|spec| spec.is_positional()) {
        let Some(index) = matches.index_of(spec.field) else {
            continue;
        };
        if index < last_switch {
            let token = matches
                .get_one::<String>(spec.field)
                .cloned()
                .unwrap_or_default();
            return Err(ArgsError::UnrecognizedToken {
                token,
                reason: "positional arguments must follow every switch".to_string(),
            });
        }
    }

    Ok(())
}

fn assign(spec: &OptionSpec, matches: &ArgMatches, options: &mut SessionOptions) -> Result<(), ArgsError> {
    let slot = (spec.write)(options);
    if slot.kind() != spec.kind {
        return Err(ArgsError::kind_mismatch(spec.field, spec.kind, slot.kind()));
    }

    let inconsistent = |err: clap::parser::MatchesError| ArgsError::SchemaInconsistency {
        field: spec.field,
        reason: err.to_string(),
    };

    match slot {
        FieldMut::Flag(slot) => {
            *slot = matches.try_get_one::<bool>(spec.field).map_err(inconsistent)?.copied();
        }
        FieldMut::Integer(slot) => {
            *slot = matches.try_get_one::<i64>(spec.field).map_err(inconsistent)?.copied();
        }
        FieldMut::Text(slot) => {
            *slot = matches.try_get_one::<String>(spec.field).map_err(inconsistent)?.cloned();
        }
        FieldMut::Required(slot) => {
            *slot = matches
                .try_get_one::<String>(spec.field)
                .map_err(inconsistent)?
                .cloned()
                .unwrap_or_default();
        }
    }

    Ok(())
}

fn classify(schema: &[OptionSpec], tokens: &[String], err: &clap::Error) -> ArgsError {
    let context = |kind| err.get(kind).map(ToString::to_string).unwrap_or_default();
    let rendered = context(ContextKind::InvalidArg);

    match err.kind() {
        ErrorKind::InvalidValue
        | ErrorKind::ValueValidation
        | ErrorKind::NoEquals
        | ErrorKind::TooManyValues
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => ArgsError::MalformedValue {
            argument: switch_label(schema, &rendered),
            value: context(ContextKind::InvalidValue),
            reason: err.kind().as_str().unwrap_or("invalid value").to_string(),
        },
        kind => ArgsError::UnrecognizedToken {
            token: offending_token(tokens, &rendered),
            reason: kind.as_str().unwrap_or("unexpected argument").to_string(),
        },
    }
}

/// Maps clap's rendering of an argument (`--hash-type <hash_type>`) back to
/// the schema label.
fn switch_label(schema: &[OptionSpec], rendered: &str) -> String {
    let name = rendered
        .split(|c: char| c.is_whitespace() || c == '[' || c == '=')
        .next()
        .unwrap_or_default();
    let bare = name.trim_matches(|c| c == '<' || c == '>');

    schema
        .iter()
        .find(|spec| {
            spec.argument == Some(name) || (spec.is_positional() && spec.field == bare)
        })
        .map_or_else(|| rendered.to_string(), |spec| spec.label().to_string())
}

/// Caller token clap complained about; clap may only report a prefix of it
/// (`-h` for `-hashes.txt`).
fn offending_token(tokens: &[String], rendered: &str) -> String {
    if rendered.is_empty() {
        return String::new();
    }
    tokens
        .iter()
        .find(|token| token.as_str() == rendered)
        .or_else(|| tokens.iter().find(|token| token.starts_with(rendered)))
        .cloned()
        .unwrap_or_else(|| rendered.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn custom_command_line_is_accepted() {
        let options = parse(
            "--optimized-kernel-enable=true --custom-charset1=DEADBEEF --attack-mode=0 --hash-type=0 --potfile-disable=true",
        )
        .expect("parse");

        assert_eq!(
            options,
            SessionOptions {
                optimized_kernel_enabled: Some(true),
                custom_charset1: Some("DEADBEEF".to_string()),
                attack_mode: Some(0),
                hash_type: Some(0),
                potfile_disable: Some(true),
                ..SessionOptions::default()
            }
        );
    }

    #[test]
    fn unknown_switch_is_rejected() {
        let err = parse("--nonexistent-flag=1").expect_err("unknown switch");
        assert!(matches!(err, ArgsError::UnrecognizedToken { .. }), "{err:?}");

        let err = parse("--invalid-option --optimized-kernel-enable=true --custom-charset1=DEADBEEF")
            .expect_err("unknown switch");
        assert!(matches!(err, ArgsError::UnrecognizedToken { .. }), "{err:?}");
    }

    #[test]
    fn positional_before_switch_is_rejected() {
        let err = parse("thisisatest --optimized-kernel-enable=true --custom-charset1=DEADBEEF")
            .expect_err("leading positional");
        assert_eq!(
            err,
            ArgsError::UnrecognizedToken {
                token: "thisisatest".to_string(),
                reason: "positional arguments must follow every switch".to_string(),
            }
        );
    }

    #[test]
    fn positional_before_bare_flag_is_rejected() {
        assert!(parse("deadbeef --force").is_err());
    }

    #[test]
    fn presence_comes_from_the_command_line_not_defaults() {
        let options = parse("--hash-type=0").expect("parse");
        assert_eq!(options.hash_type, Some(0));
        assert_eq!(options.attack_mode, None);
        assert_eq!(options.force, None);
        assert_eq!(options.session_name, None);
        assert_eq!(options.input_file, "");
    }

    #[test]
    fn flags_accept_bare_and_explicit_forms() {
        let options = parse("--force --loopback=false --keep-guessing=yes").expect("parse");
        assert_eq!(options.force, Some(true));
        assert_eq!(options.loopback, Some(false));
        assert_eq!(options.keep_guessing, Some(true));
    }

    #[test]
    fn separated_values_are_accepted() {
        let options = parse("--hash-type 1000 --session job-7 hashes.txt").expect("parse");
        assert_eq!(options.hash_type, Some(1000));
        assert_eq!(options.session_name.as_deref(), Some("job-7"));
        assert_eq!(options.input_file, "hashes.txt");
    }

    #[test]
    fn negative_numbers_parse() {
        let options = parse("--skip=-1 --limit -5").expect("parse");
        assert_eq!(options.skip, Some(-1));
        assert_eq!(options.limit, Some(-5));
    }

    #[test]
    fn non_numeric_integer_is_malformed() {
        let err = parse("--hash-type=md5").expect_err("malformed");
        match err {
            ArgsError::MalformedValue {
                argument, value, ..
            } => {
                assert_eq!(argument, "--hash-type");
                assert_eq!(value, "md5");
            }
            other => panic!("expected malformed value, got {other:?}"),
        }
    }

    #[test]
    fn malformed_flag_reports_the_switch_name() {
        match parse("--force=maybe").expect_err("malformed") {
            ArgsError::MalformedValue { argument, .. } => assert_eq!(argument, "--force"),
            other => panic!("expected malformed value, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tokens_are_reported_as_given() {
        match parse("--nonexistent-flag=1").expect_err("unknown switch") {
            ArgsError::UnrecognizedToken { token, .. } => {
                assert_eq!(token, "--nonexistent-flag=1");
            }
            other => panic!("expected unrecognized token, got {other:?}"),
        }

        match parse("--hash-type=0 -hashes.txt").expect_err("short switch cluster") {
            ArgsError::UnrecognizedToken { token, .. } => assert_eq!(token, "-hashes.txt"),
            other => panic!("expected unrecognized token, got {other:?}"),
        }
    }

    #[test]
    fn label_lookup_falls_back_to_clap_rendering() {
        assert_eq!(switch_label(OPTION_SCHEMA, "--hash-type <hash_type>"), "--hash-type");
        assert_eq!(switch_label(OPTION_SCHEMA, "--force[=<force>]"), "--force");
        assert_eq!(switch_label(OPTION_SCHEMA, "<input_file>"), "input_file");
        assert_eq!(switch_label(OPTION_SCHEMA, "--bogus <x>"), "--bogus <x>");
    }

    #[test]
    fn non_boolean_flag_value_is_malformed() {
        assert!(matches!(
            parse("--force=maybe"),
            Err(ArgsError::MalformedValue { .. })
        ));
    }

    #[test]
    fn missing_value_is_malformed() {
        assert!(matches!(
            parse("--session"),
            Err(ArgsError::MalformedValue { .. })
        ));
    }

    #[test]
    fn last_repeated_switch_wins() {
        let options = parse("--hash-type=0 --hash-type=100").expect("parse");
        assert_eq!(options.hash_type, Some(100));
    }

    #[test]
    fn positional_inputs_fill_in_order() {
        let options = parse("--attack-mode=3 deadbeef ?a?a?a").expect("parse");
        assert_eq!(options.input_file, "deadbeef");
        assert_eq!(options.dictionary_mask_directory_input.as_deref(), Some("?a?a?a"));
    }

    #[test]
    fn extra_positional_is_rejected() {
        assert!(matches!(
            parse("deadbeef words.txt extra"),
            Err(ArgsError::UnrecognizedToken { .. })
        ));
    }

    #[test]
    fn double_dash_ends_switches() {
        let options = parse("--hash-type=0 -- --looks-like-a-switch").expect("parse");
        assert_eq!(options.input_file, "--looks-like-a-switch");
    }

    #[test]
    fn empty_line_yields_default_options() {
        assert_eq!(parse("   ").expect("parse"), SessionOptions::default());
    }
}
