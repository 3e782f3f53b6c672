//! Loading the TOML table and applying `-o path.to.key=value` overrides on top.

use std::{fs, path::Path};

use toml::{value::Table, Value};

use crate::{config::Config, errors::ConfigError};

/// Reads a config file into an untyped table.
pub fn load_config_value(path: &Path) -> Result<Value, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

/// Splits `a.b.c=value` into its key path and value.
///
/// The value is read as a TOML scalar or array, falling back to a plain
/// string when it doesn't parse.
pub fn parse_override(raw: &str) -> Result<(Vec<String>, Value), ConfigError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(raw.to_owned()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidOverride(raw.to_owned()));
    }

    let path = key.split('.').map(str::to_owned).collect();
    Ok((path, parse_value(value.trim())))
}

fn parse_value(raw: &str) -> Value {
    toml::from_str::<Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_owned()))
}

/// Sets `path` in `table` to `value`, creating intermediate tables as needed.
pub fn apply_override(path: &[String], value: Value, table: &mut Table) -> Result<(), ConfigError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(ConfigError::MissingKey(String::new()));
    };

    let mut current = table;
    for (depth, key) in parents.iter().enumerate() {
        if key.is_empty() {
            return Err(ConfigError::MissingKey(path[..=depth].join(".")));
        }
        current = current
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| ConfigError::TraverseNonTableAt(path[..=depth].join(".")))?;
    }

    if last.is_empty() {
        return Err(ConfigError::MissingKey(path.join(".")));
    }
    current.insert(last.clone(), value);
    Ok(())
}

/// Loads the config at `path` (or an empty one), applies `overrides` in order
/// and deserializes the result.
pub fn load_config(path: Option<&Path>, overrides: &[String]) -> Result<Config, ConfigError> {
    let mut value = match path {
        Some(path) => load_config_value(path)?,
        None => Value::Table(Table::new()),
    };
    let table = value
        .as_table_mut()
        .ok_or_else(|| ConfigError::TraverseNonTableAt("<root>".to_owned()))?;

    for raw in overrides {
        let (path, val) = parse_override(raw)?;
        apply_override(&path, val, table)?;
    }

    Ok(value.try_into::<Config>()?)
}
