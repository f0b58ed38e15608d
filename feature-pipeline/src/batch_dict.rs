use common::error::AppError;

use crate::{
    batch::BatchEncoding,
    tokenizer::{BatchTokenizer, EncodeOptions},
};

pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const PAD_TO_MULTIPLE_OF: usize = 8;

/// Tokenizes `texts` into a batch padded to the longest row, rounded up to a
/// multiple of 8.
///
/// With `always_add_eos`, rows are truncated one token short of `max_length`
/// and the tokenizer's EOS id is appended to every row before padding, so the
/// last real token of each row is always EOS.
pub fn create_batch_dict<T>(
    tokenizer: &T,
    texts: &[&str],
    always_add_eos: bool,
    max_length: usize,
) -> Result<BatchEncoding, AppError>
where
    T: BatchTokenizer + ?Sized,
{
    if !always_add_eos {
        let options = EncodeOptions::longest(max_length).with_pad_to_multiple_of(PAD_TO_MULTIPLE_OF);
        return tokenizer.encode_batch(texts, &options);
    }

    let eos_id = tokenizer
        .eos_token_id()
        .ok_or_else(|| AppError::Tokenizer("tokenizer has no EOS token to append".into()))?;

    let options = EncodeOptions::unpadded(max_length.saturating_sub(1).max(1));
    let mut batch = tokenizer.encode_batch(texts, &options)?;
    for ids in &mut batch.input_ids {
        ids.push(eos_id);
    }

    Ok(batch.pad(
        tokenizer.pad_token_id(),
        Some(PAD_TO_MULTIPLE_OF),
        tokenizer.padding_direction(),
    ))
}
