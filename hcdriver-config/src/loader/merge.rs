use hcdriver_args::{OptionKind, find_by_field};

use crate::error::ConfigError;

/// Recursively merge two TOML values.
///
/// Tables merge key by key; any other `overlay` value replaces `base`.
pub fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key.clone(), value.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

/// Inserts `value` at a dotted path such as `job.hash_type`, creating
/// intermediate tables and replacing non-table values in the way.
pub(crate) fn insert_dotted_key(
    table: &mut toml::Table,
    key: &str,
    value: toml::Value,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').map(str::trim).collect();
    let invalid = |reason: &str| ConfigError::Override {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    if parts.iter().any(|part| part.is_empty()) {
        return Err(invalid("empty key segment"));
    }
    let Some((last, parents)) = parts.split_last() else {
        return Err(invalid("empty key"));
    };

    let mut current = table;
    for part in parents {
        let entry = current
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        if !entry.is_table() {
            *entry = toml::Value::Table(toml::Table::new());
        }
        current = match entry {
            toml::Value::Table(nested) => nested,
            _ => return Err(invalid("intermediate key is not a table")),
        };
    }

    current.insert((*last).to_string(), value);
    Ok(())
}

/// Reads a `--set` value as a TOML literal, falling back to a plain string.
///
/// Keys naming a text field (`job.session_name`, `engine.shared_path`) keep
/// the raw text, so `2024` stays a string there.
pub(crate) fn parse_override_value(key: &str, raw: &str) -> toml::Value {
    let literal = toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"));

    match literal {
        Some(toml::Value::String(text)) => toml::Value::String(text),
        Some(_) if expects_text(key) => toml::Value::String(raw.to_string()),
        Some(value) => value,
        None => toml::Value::String(raw.to_string()),
    }
}

fn expects_text(key: &str) -> bool {
    if matches!(key, "engine.shared_path" | "engine.executable_path") {
        return true;
    }
    key.strip_prefix("job.")
        .and_then(find_by_field)
        .is_some_and(|spec| spec.kind == OptionKind::Text)
}
