use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A query paired with its positive passage and an optional hard negative.
///
/// Fields are private so an example can only be replaced, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    query: String,
    positive_passage: String,
    negative_passage: Option<String>,
}

impl Example {
    pub fn new(
        query: impl Into<String>,
        positive_passage: impl Into<String>,
        negative_passage: Option<String>,
    ) -> Self {
        Self {
            query: query.into(),
            positive_passage: positive_passage.into(),
            negative_passage,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn positive_passage(&self) -> &str {
        &self.positive_passage
    }

    pub fn negative_passage(&self) -> Option<&str> {
        self.negative_passage.as_deref()
    }

    /// Pretty JSON (two-space indent) terminated by a newline.
    pub fn to_json_string(&self) -> Result<String, AppError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
