use std::collections::BTreeMap;

use common::{error::AppError, types::Example};
use ndarray::Array2;

use crate::tokenizer::{BatchTokenizer, EncodeOptions};

pub const TRIPLET_MAX_LENGTH: usize = 512;

/// Named `[batch, seq_len]` tensors.
pub type TensorDict = BTreeMap<String, Array2<i64>>;

/// Tokenizes each triplet column padded to its own longest row (capped at
/// 512 tokens) and returns `{column}_input_ids` / `{column}_attention_mask`
/// tensors for `query`, `document` and `hard_negative`.
pub fn tokenize<T>(examples: &[Example], tokenizer: &T) -> Result<TensorDict, AppError>
where
    T: BatchTokenizer + ?Sized,
{
    let options = EncodeOptions::longest(TRIPLET_MAX_LENGTH);
    let columns: [(&str, Vec<&str>); 3] = [
        ("query", examples.iter().map(Example::query).collect()),
        (
            "document",
            examples.iter().map(Example::positive_passage).collect(),
        ),
        (
            "hard_negative",
            examples
                .iter()
                .map(|example| example.negative_passage().unwrap_or_default())
                .collect(),
        ),
    ];

    let mut tensors = TensorDict::new();
    for (key, texts) in columns {
        let (input_ids, attention_mask) = tokenizer.encode_batch(&texts, &options)?.to_tensors()?;
        tensors.insert(format!("{key}_input_ids"), input_ids);
        tensors.insert(format!("{key}_attention_mask"), attention_mask);
    }

    Ok(tensors)
}
