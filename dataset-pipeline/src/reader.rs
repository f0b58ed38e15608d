use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::Path,
};

use common::error::AppError;
use serde_json::Value;

const BOM: char = '\u{feff}';

/// Reads a file holding a single JSON array and returns its elements.
pub fn read_json(path: &Path) -> Result<Vec<Value>, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::malformed(path, format!("reading file: {err}")))?;
    let body = raw.strip_prefix(BOM).unwrap_or(&raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|err| AppError::malformed(path, format!("parsing JSON: {err}")))?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(AppError::malformed(
            path,
            format!("expected a top-level JSON array, found {}", json_kind(&other)),
        )),
    }
}

/// Reads newline-delimited JSON, one value per non-blank line. Each value is
/// paired with its 1-based line number.
pub fn read_jsonl(path: &Path) -> Result<Vec<(usize, Value)>, AppError> {
    let file = File::open(path)
        .map_err(|err| AppError::malformed(path, format!("opening file: {err}")))?;
    let mut values = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_number = idx.saturating_add(1);
        let raw = line.map_err(|err| {
            AppError::malformed(path, format!("reading line {line_number}: {err}"))
        })?;
        let raw = if idx == 0 {
            raw.strip_prefix(BOM).unwrap_or(&raw).to_string()
        } else {
            raw
        };
        if raw.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&raw).map_err(|err| {
            AppError::malformed(path, format!("parsing JSON on line {line_number}: {err}"))
        })?;
        values.push((line_number, value));
    }

    Ok(values)
}

pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
