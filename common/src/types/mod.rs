pub mod example;
pub mod feature_set;
pub mod record_position;

pub use example::Example;
pub use feature_set::FeatureSet;
pub use record_position::RecordPosition;
