use common::error::AppError;
use ndarray::Array2;
use tokenizers::{Encoding, PaddingDirection};

/// Token ids and attention masks for a batch of texts, one row per text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchEncoding {
    pub input_ids: Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
}

impl BatchEncoding {
    pub fn from_encodings(encodings: &[Encoding]) -> Self {
        let (input_ids, attention_mask) = encodings
            .iter()
            .map(|encoding| {
                (
                    encoding.get_ids().to_vec(),
                    encoding.get_attention_mask().to_vec(),
                )
            })
            .unzip();
        Self {
            input_ids,
            attention_mask,
        }
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    pub fn into_rows(self) -> impl Iterator<Item = (Vec<u32>, Vec<u32>)> {
        self.input_ids.into_iter().zip(self.attention_mask)
    }

    /// Pads every row to the longest one, rounded up to `pad_to_multiple_of`
    /// when given, on the side named by `direction`. Masks are rebuilt from row
    /// lengths.
    pub fn pad(
        self,
        pad_id: u32,
        pad_to_multiple_of: Option<usize>,
        direction: PaddingDirection,
    ) -> Self {
        let longest = self.input_ids.iter().map(Vec::len).max().unwrap_or(0);
        let width = match pad_to_multiple_of {
            Some(multiple) if multiple > 0 => longest.next_multiple_of(multiple),
            _ => longest,
        };

        let (input_ids, attention_mask) = self
            .input_ids
            .into_iter()
            .map(|ids| {
                let real = ids.len();
                let fill = width.saturating_sub(real);
                match direction {
                    PaddingDirection::Right => {
                        let mut ids = ids;
                        ids.resize(width, pad_id);
                        let mut mask = vec![1u32; real];
                        mask.resize(width, 0);
                        (ids, mask)
                    }
                    PaddingDirection::Left => {
                        let mut padded = vec![pad_id; fill];
                        padded.extend(ids);
                        let mut mask = vec![0u32; fill];
                        mask.resize(width, 1);
                        (padded, mask)
                    }
                }
            })
            .unzip();

        Self {
            input_ids,
            attention_mask,
        }
    }

    /// `[batch, seq_len]` tensors of ids and masks. Fails on ragged rows.
    pub fn to_tensors(&self) -> Result<(Array2<i64>, Array2<i64>), AppError> {
        Ok((
            rows_to_tensor(self.input_ids.iter().map(Vec::as_slice))?,
            rows_to_tensor(self.attention_mask.iter().map(Vec::as_slice))?,
        ))
    }
}

pub(crate) fn rows_to_tensor<'a, I>(rows: I) -> Result<Array2<i64>, AppError>
where
    I: IntoIterator<Item = &'a [u32]>,
{
    let mut flat = Vec::new();
    let mut width = None;
    let mut count = 0usize;

    for (idx, row) in rows.into_iter().enumerate() {
        let expected = *width.get_or_insert(row.len());
        if row.len() != expected {
            return Err(AppError::Shape(format!(
                "ragged batch: row {idx} has {} tokens, expected {expected}",
                row.len()
            )));
        }
        flat.extend(row.iter().map(|&value| i64::from(value)));
        count += 1;
    }

    Ok(Array2::from_shape_vec((count, width.unwrap_or(0)), flat)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_multiple_and_rebuilds_masks() {
        let batch = BatchEncoding {
            input_ids: vec![vec![5, 6, 7], vec![8]],
            attention_mask: vec![vec![1, 1, 1], vec![1]],
        }
        .pad(0, Some(8), PaddingDirection::Right);

        assert_eq!(batch.input_ids[0], vec![5, 6, 7, 0, 0, 0, 0, 0]);
        assert_eq!(batch.input_ids[1], vec![8, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(batch.attention_mask[1], vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn left_padding_keeps_tokens_at_the_end() {
        let batch = BatchEncoding {
            input_ids: vec![vec![5, 6, 7], vec![8]],
            attention_mask: vec![vec![1, 1, 1], vec![1]],
        }
        .pad(0, Some(4), PaddingDirection::Left);

        assert_eq!(batch.input_ids[0], vec![0, 5, 6, 7]);
        assert_eq!(batch.input_ids[1], vec![0, 0, 0, 8]);
        assert_eq!(batch.attention_mask[0], vec![0, 1, 1, 1]);
        assert_eq!(batch.attention_mask[1], vec![0, 0, 0, 1]);
    }

    #[test]
    fn converts_rectangular_batches_to_tensors() {
        let batch = BatchEncoding {
            input_ids: vec![vec![1, 2], vec![3, 0]],
            attention_mask: vec![vec![1, 1], vec![1, 0]],
        };

        let (ids, mask) = batch.to_tensors().unwrap();
        assert_eq!(ids.dim(), (2, 2));
        assert_eq!(ids[[1, 0]], 3);
        assert_eq!(mask[[1, 1]], 0);
    }

    #[test]
    fn rejects_ragged_rows() {
        let batch = BatchEncoding {
            input_ids: vec![vec![1, 2], vec![3]],
            attention_mask: vec![vec![1, 1], vec![1]],
        };

        let err = batch.to_tensors().unwrap_err();
        assert!(matches!(err, AppError::Shape(_)));
    }
}
