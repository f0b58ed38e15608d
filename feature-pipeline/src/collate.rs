use common::{
    error::AppError,
    types::{feature_set::FEATURE_COLUMNS, FeatureSet},
};
use ndarray::Array2;

use crate::batch::rows_to_tensor;

/// The six [`FeatureSet`] columns stacked into `[batch, seq_len]` tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensors {
    pub query_input_ids: Array2<i64>,
    pub query_attention_mask: Array2<i64>,
    pub document_input_ids: Array2<i64>,
    pub document_attention_mask: Array2<i64>,
    pub hard_negative_input_ids: Array2<i64>,
    pub hard_negative_attention_mask: Array2<i64>,
}

impl FeatureTensors {
    pub fn batch_size(&self) -> usize {
        self.query_input_ids.nrows()
    }

    /// Applies `f` to every tensor, e.g. to hand them to a device-specific backend.
    #[must_use]
    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(&'static str, Array2<i64>) -> Array2<i64>,
    {
        let [q_ids, q_mask, d_ids, d_mask, n_ids, n_mask] = FEATURE_COLUMNS;
        Self {
            query_input_ids: f(q_ids, self.query_input_ids),
            query_attention_mask: f(q_mask, self.query_attention_mask),
            document_input_ids: f(d_ids, self.document_input_ids),
            document_attention_mask: f(d_mask, self.document_attention_mask),
            hard_negative_input_ids: f(n_ids, self.hard_negative_input_ids),
            hard_negative_attention_mask: f(n_mask, self.hard_negative_attention_mask),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Array2<i64>)> {
        FEATURE_COLUMNS.into_iter().zip([
            &self.query_input_ids,
            &self.query_attention_mask,
            &self.document_input_ids,
            &self.document_attention_mask,
            &self.hard_negative_input_ids,
            &self.hard_negative_attention_mask,
        ])
    }
}

/// Stacks `features` into tensors. All rows of a column must share one length.
pub fn collate(features: &[FeatureSet]) -> Result<FeatureTensors, AppError> {
    let column = |idx: usize| rows_to_tensor(features.iter().map(|feature| feature.columns()[idx].1));

    Ok(FeatureTensors {
        query_input_ids: column(0)?,
        query_attention_mask: column(1)?,
        document_input_ids: column(2)?,
        document_attention_mask: column(3)?,
        hard_negative_input_ids: column(4)?,
        hard_negative_attention_mask: column(5)?,
    })
}
