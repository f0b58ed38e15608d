#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod e5;
pub mod examples;
pub mod merge;
pub mod reader;
pub mod record;
pub mod split;

pub use e5::format_as_e5;
pub use examples::{build_examples, dev_examples, test_examples, train_examples};
pub use merge::merge_files;
pub use record::{FieldValue, RawRecord};
pub use split::{Split, SplitFile};
