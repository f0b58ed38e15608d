use common::error::AppError;
use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

/// Masked mean over the sequence axis.
///
/// `last_hidden_states` is `[batch, seq_len, hidden]` and `attention_mask` is
/// `[batch, seq_len]`; the result is `[batch, hidden]`. Positions with a zero
/// mask are ignored. A row with no unmasked positions pools to zeros.
pub fn average_pool(
    last_hidden_states: ArrayView3<'_, f32>,
    attention_mask: ArrayView2<'_, i64>,
) -> Result<Array2<f32>, AppError> {
    let (batch, seq_len, _) = last_hidden_states.dim();
    if attention_mask.dim() != (batch, seq_len) {
        return Err(AppError::Shape(format!(
            "attention mask {:?} does not match hidden states {:?}",
            attention_mask.dim(),
            last_hidden_states.dim()
        )));
    }

    let mask = attention_mask.mapv(|value| if value == 0 { 0.0f32 } else { 1.0 });
    let counts = mask.sum_axis(Axis(1)).mapv(|count| count.max(1.0));

    let masked = &last_hidden_states * &mask.view().insert_axis(Axis(2));
    let summed = masked.sum_axis(Axis(1));

    Ok(summed / &counts.insert_axis(Axis(1)))
}
