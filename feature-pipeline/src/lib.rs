#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod batch;
pub mod batch_dict;
pub mod collate;
pub mod encode;
pub mod pooling;
mod progress;
pub mod tokenizer;
pub mod triplets;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::BatchEncoding;
pub use batch_dict::create_batch_dict;
pub use collate::{collate, FeatureTensors};
pub use encode::encode;
pub use pooling::average_pool;
pub use tokenizer::{BatchTokenizer, EncodeOptions, Padding, PretrainedTokenizer};
pub use triplets::{tokenize, TensorDict};
