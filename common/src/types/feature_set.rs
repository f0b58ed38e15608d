use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Column names, in the order [`FeatureSet::columns`] yields them.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "query_input_ids",
    "query_attention_mask",
    "document_input_ids",
    "document_attention_mask",
    "hard_negative_input_ids",
    "hard_negative_attention_mask",
];

/// Fixed-length token ids and attention masks for one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub query_input_ids: Vec<u32>,
    pub query_attention_mask: Vec<u32>,
    pub document_input_ids: Vec<u32>,
    pub document_attention_mask: Vec<u32>,
    pub hard_negative_input_ids: Vec<u32>,
    pub hard_negative_attention_mask: Vec<u32>,
}

impl FeatureSet {
    pub fn columns(&self) -> [(&'static str, &[u32]); 6] {
        let [q_ids, q_mask, d_ids, d_mask, n_ids, n_mask] = FEATURE_COLUMNS;
        [
            (q_ids, &self.query_input_ids),
            (q_mask, &self.query_attention_mask),
            (d_ids, &self.document_input_ids),
            (d_mask, &self.document_attention_mask),
            (n_ids, &self.hard_negative_input_ids),
            (n_mask, &self.hard_negative_attention_mask),
        ]
    }

    /// Compact single-line JSON terminated by a newline.
    pub fn to_json_string(&self) -> Result<String, AppError> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}
