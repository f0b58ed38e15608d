use std::{fs, path::Path};

use common::error::AppError;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tracing::info;

use crate::reader::read_json;

/// Concatenates the JSON arrays stored in `inputs` and writes them to `output`
/// as one array (four-space indent, non-ASCII kept as-is). Returns the number
/// of merged elements.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize, AppError> {
    let mut merged: Vec<Value> = Vec::new();
    for input in inputs {
        let items = read_json(input.as_ref())?;
        info!(path = %input.as_ref().display(), records = items.len(), "Merging file");
        merged.extend(items);
    }

    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    merged.serialize(&mut serializer)?;
    fs::write(output, buffer)?;

    info!(path = %output.display(), records = merged.len(), "Wrote merged file");
    Ok(merged.len())
}
