use std::path::Path;

use common::{
    error::AppError,
    types::{Example, RecordPosition},
};
use serde_json::{Map, Value};

use crate::reader::json_kind;

/// A text field as it appears on disk: either a plain string or a list of
/// candidates. Only the first candidate of a list is ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<Value>),
}

impl FieldValue {
    fn decode(
        field: &'static str,
        path: &Path,
        at: RecordPosition,
        value: Value,
    ) -> Result<Self, AppError> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Array(items) => Ok(Self::List(items)),
            other => Err(unsupported(field, path, at, &other)),
        }
    }

    /// Resolves a list to its first element. Later elements are never inspected.
    fn into_first(
        self,
        field: &'static str,
        path: &Path,
        at: RecordPosition,
    ) -> Result<String, AppError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::List(items) => match items.into_iter().next() {
                Some(Value::String(text)) => Ok(text),
                Some(other) => Err(unsupported(field, path, at, &other)),
                None => Err(AppError::malformed(
                    path,
                    format!("{at} has an empty list for '{field}'"),
                )),
            },
        }
    }
}

/// One decoded record of a split file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub query: FieldValue,
    pub document: FieldValue,
    pub hard_negative: Option<FieldValue>,
}

impl RawRecord {
    /// Decodes the record found at `at` in `path`. Unknown keys are ignored and
    /// a `null` hard negative counts as absent.
    pub fn decode(path: &Path, at: RecordPosition, value: Value) -> Result<Self, AppError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(AppError::malformed(
                    path,
                    format!("{at} is {}, expected an object", json_kind(&other)),
                ))
            }
        };

        let query = take_required(&mut map, "query", path, at)?;
        let document = take_required(&mut map, "document", path, at)?;
        let hard_negative = match map.remove("hard_negative") {
            None | Some(Value::Null) => None,
            Some(value) => Some(FieldValue::decode("hard_negative", path, at, value)?),
        };

        Ok(Self {
            query,
            document,
            hard_negative,
        })
    }

    /// Collapses every field to a single string, producing an unformatted example.
    pub fn into_example(self, path: &Path, at: RecordPosition) -> Result<Example, AppError> {
        let query = self.query.into_first("query", path, at)?;
        let document = self.document.into_first("document", path, at)?;
        let hard_negative = self
            .hard_negative
            .map(|value| value.into_first("hard_negative", path, at))
            .transpose()?;

        Ok(Example::new(query, document, hard_negative))
    }
}

fn take_required(
    map: &mut Map<String, Value>,
    field: &'static str,
    path: &Path,
    at: RecordPosition,
) -> Result<FieldValue, AppError> {
    let value = map
        .remove(field)
        .ok_or_else(|| AppError::malformed(path, format!("{at} is missing required key '{field}'")))?;
    FieldValue::decode(field, path, at, value)
}

fn unsupported(field: &'static str, path: &Path, at: RecordPosition, value: &Value) -> AppError {
    AppError::UnsupportedFieldType {
        path: path.to_path_buf(),
        at,
        field,
        found: json_kind(value),
    }
}
