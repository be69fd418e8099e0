use std::fmt::Write as _;

use anyhow::{Context, Result};
use hcdriver_args::{OptionKind, Presence, SessionOptions, marshal, option_schema, parse};
use serde::Serialize;

/// `[job]` table as it appears in `hcdriver.toml`.
#[derive(Serialize)]
struct JobDocument<'a> {
    job: &'a SessionOptions,
}

/// Prints the engine argv for `options`.
pub fn handle_args_command(options: &SessionOptions, json: bool) -> Result<()> {
    let args = marshal(options).context("Failed to marshal [job] options")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&args)?);
    } else {
        for arg in args {
            println!("{arg}");
        }
    }
    Ok(())
}

/// Parses `line` and prints the recovered options.
pub fn handle_parse_command(line: &[String], json: bool) -> Result<()> {
    let line = line.join(" ");
    let options = parse(&line).with_context(|| format!("Failed to parse `{line}`"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        print!("{}", toml::to_string(&JobDocument { job: &options })?);
    }
    Ok(())
}

pub fn handle_schema_command(json: bool) -> Result<()> {
    let schema = option_schema();

    if json {
        let rows: Vec<serde_json::Value> = schema
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "field": spec.field,
                    "argument": spec.argument,
                    "kind": spec.kind.as_str(),
                    "required": spec.presence == Presence::Required,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let labels: Vec<String> = schema
        .iter()
        .map(|spec| match spec.argument {
            Some(argument) => argument.to_string(),
            None => format!("<{}>", spec.field),
        })
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or_default();

    let mut out = String::new();
    for (spec, label) in schema.iter().zip(&labels) {
        let note = match (spec.kind, spec.presence) {
            (_, Presence::Required) => "required",
            (OptionKind::Flag, _) => "bare switch when true",
            _ => "",
        };
        let line = format!(
            "{label:<width$}  {:<7}  {:<32}  {note}",
            spec.kind.as_str(),
            spec.field,
        );
        writeln!(out, "{}", line.trim_end())?;
    }
    print!("{out}");
    Ok(())
}
