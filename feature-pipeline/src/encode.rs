use common::{
    error::AppError,
    types::{Example, FeatureSet},
};
use tracing::{debug, info};

use crate::{
    batch::BatchEncoding,
    progress::progress_bar,
    tokenizer::{BatchTokenizer, EncodeOptions},
};

const LOGGED_EXAMPLES: usize = 3;

/// Tokenizes the query, positive and negative columns of `examples` and zips
/// the rows into one [`FeatureSet`] per example, in input order.
///
/// Every sequence is padded and truncated to `max_length`, which defaults to
/// the tokenizer's model maximum. Examples without a hard negative are encoded
/// with an empty negative passage.
pub fn encode<T>(
    examples: &[Example],
    tokenizer: &T,
    max_length: Option<usize>,
) -> Result<Vec<FeatureSet>, AppError>
where
    T: BatchTokenizer + ?Sized,
{
    if examples.is_empty() {
        return Ok(Vec::new());
    }

    let max_length = max_length.unwrap_or_else(|| tokenizer.model_max_length());
    let options = EncodeOptions::fixed(max_length);

    let queries: Vec<&str> = examples.iter().map(Example::query).collect();
    let documents: Vec<&str> = examples.iter().map(Example::positive_passage).collect();
    let negatives: Vec<&str> = examples
        .iter()
        .map(|example| example.negative_passage().unwrap_or_default())
        .collect();

    let missing_negatives = examples
        .iter()
        .filter(|example| example.negative_passage().is_none())
        .count();
    if missing_negatives > 0 {
        debug!(
            missing_negatives,
            "Encoding examples without a hard negative as empty passages"
        );
    }

    let query_batch = encode_column("query", &queries, tokenizer, &options)?;
    let document_batch = encode_column("document", &documents, tokenizer, &options)?;
    let negative_batch = encode_column("hard_negative", &negatives, tokenizer, &options)?;

    let progress = progress_bar(examples.len(), "Converting examples to features...");
    let mut features = Vec::with_capacity(examples.len());
    for (((query_ids, query_mask), (document_ids, document_mask)), (negative_ids, negative_mask)) in
        query_batch
            .into_rows()
            .zip(document_batch.into_rows())
            .zip(negative_batch.into_rows())
    {
        features.push(FeatureSet {
            query_input_ids: query_ids,
            query_attention_mask: query_mask,
            document_input_ids: document_ids,
            document_attention_mask: document_mask,
            hard_negative_input_ids: negative_ids,
            hard_negative_attention_mask: negative_mask,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    for feature in features.iter().take(LOGGED_EXAMPLES) {
        info!("*** Example ***");
        info!(features = ?feature, "Encoded features");
    }

    Ok(features)
}

fn encode_column<T>(
    column: &str,
    texts: &[&str],
    tokenizer: &T,
    options: &EncodeOptions,
) -> Result<BatchEncoding, AppError>
where
    T: BatchTokenizer + ?Sized,
{
    let batch = tokenizer.encode_batch(texts, options)?;
    if batch.len() != texts.len() {
        return Err(AppError::Tokenizer(format!(
            "{column} column returned {} rows for {} texts",
            batch.len(),
            texts.len()
        )));
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::word_level_tokenizer;

    fn examples() -> Vec<Example> {
        vec![
            Example::new(
                "query: what is rust",
                "passage: rust is a systems language",
                Some("passage: seoul is the capital of korea".into()),
            ),
            Example::new("query: capital of korea", "passage: seoul", None),
            Example::new(
                "query: busan",
                "passage: busan is a port .",
                Some("passage: rust".into()),
            ),
        ]
    }

    #[test]
    fn every_sequence_has_the_requested_length() {
        let tokenizer = word_level_tokenizer();
        let features = encode(&examples(), &tokenizer, Some(6)).unwrap();

        assert_eq!(features.len(), 3);
        for feature in &features {
            for (name, column) in feature.columns() {
                assert_eq!(column.len(), 6, "{name} has the wrong length");
            }
        }
    }

    #[test]
    fn defaults_to_model_max_length() {
        let tokenizer = word_level_tokenizer();
        let features = encode(&examples(), &tokenizer, None).unwrap();

        assert!(features
            .iter()
            .all(|feature| feature.query_input_ids.len() == tokenizer.model_max_length()));
    }

    #[test]
    fn preserves_order_and_round_trips_queries() {
        let tokenizer = word_level_tokenizer();
        let examples = examples();
        let features = encode(&examples, &tokenizer, Some(12)).unwrap();

        let expected = ["query : what is rust", "query : capital of korea", "query : busan"];
        for (feature, expected) in features.iter().zip(expected) {
            let real: Vec<u32> = feature
                .query_input_ids
                .iter()
                .zip(&feature.query_attention_mask)
                .filter(|(_, mask)| **mask == 1)
                .map(|(id, _)| *id)
                .collect();
            assert_eq!(tokenizer.decode(&real, true).unwrap(), expected);
        }
    }

    #[test]
    fn missing_negative_encodes_as_padding_only() {
        let tokenizer = word_level_tokenizer();
        let features = encode(&examples(), &tokenizer, Some(8)).unwrap();

        let negative = &features[1];
        assert!(negative.hard_negative_attention_mask.iter().all(|m| *m == 0));
        assert!(negative
            .hard_negative_input_ids
            .iter()
            .all(|id| *id == tokenizer.pad_token_id()));
        assert_eq!(features[2].hard_negative_attention_mask[..3], [1, 1, 1]);
    }

    #[test]
    fn over_long_text_is_truncated() {
        let tokenizer = word_level_tokenizer();
        let features = encode(&examples(), &tokenizer, Some(2)).unwrap();

        assert_eq!(features[0].document_input_ids, vec![4, 5]);
        assert_eq!(features[0].document_attention_mask, vec![1, 1]);
    }

    #[test]
    fn empty_input_yields_no_features() {
        let tokenizer = word_level_tokenizer();
        assert!(encode(&[], &tokenizer, Some(4)).unwrap().is_empty());
    }
}
