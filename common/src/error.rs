use std::path::PathBuf;

use thiserror::Error;

use crate::types::RecordPosition;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No {split}.json or {split}.jsonl found in {}", dir.display())]
    MissingFile { dir: PathBuf, split: String },
    #[error("Malformed input in {}: {message}", path.display())]
    MalformedInput { path: PathBuf, message: String },
    #[error("Unsupported type for field '{field}' at {at} of {}: expected a string or a list starting with a string, found {found}", path.display())]
    UnsupportedFieldType {
        path: PathBuf,
        at: RecordPosition,
        field: &'static str,
        found: &'static str,
    },
    #[error("No instruction config for task {task_name} with type {task_type}")]
    UnknownTask {
        task_name: String,
        task_type: String,
    },
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    #[error("Shape error: {0}")]
    Shape(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<ndarray::ShapeError> for AppError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}
