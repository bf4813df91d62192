use std::ffi::OsStr;
use std::io::{self, Write};
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use toml::Value;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Reads a JSON or TOML document, chosen by file extension. Anything that is
/// not `.toml` is read as JSON. TOML dates may be quoted or bare.
pub(super) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));
    if is_toml {
        let table = toml::from_str::<toml::Table>(&raw)
            .with_context(|| format!("invalid toml in {}", path.display()))?;
        T::deserialize(dates_as_text(Value::Table(table)))
            .with_context(|| format!("invalid toml in {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("invalid json in {}", path.display()))
    }
}

/// Bare TOML dates reach serde as a datetime map; date fields expect text.
fn dates_as_text(value: Value) -> Value {
    match value {
        Value::Datetime(datetime) => Value::String(datetime.to_string()),
        Value::Array(values) => Value::Array(values.into_iter().map(dates_as_text).collect()),
        Value::Table(table) => Value::Table(
            table
                .into_iter()
                .map(|(key, value)| (key, dates_as_text(value)))
                .collect(),
        ),
        other => other,
    }
}
