use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use common::types::FeatureSet;
use dataset_pipeline::build_examples;
use feature_pipeline::{encode, PretrainedTokenizer};
use tracing::info;

use crate::args::PrepareSettings;

/// Builds examples for one split, encodes them and writes JSON-lines features.
pub fn run(settings: &PrepareSettings) -> Result<PathBuf> {
    let examples = build_examples(&settings.data_dir, settings.split).with_context(|| {
        format!(
            "building {} examples from {}",
            settings.split,
            settings.data_dir.display()
        )
    })?;

    let tokenizer = PretrainedTokenizer::load(&settings.tokenizer, settings.model_max_length)
        .with_context(|| format!("loading tokenizer {}", settings.tokenizer))?;

    let features = encode(&examples, &tokenizer, settings.max_length)
        .with_context(|| format!("encoding {} examples", examples.len()))?;

    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "creating output directory {}",
            settings.output_dir.display()
        )
    })?;
    let output = settings
        .output_dir
        .join(format!("{}.features.jsonl", settings.split));
    write_features(&features, &output)
        .with_context(|| format!("writing features to {}", output.display()))?;

    info!(
        split = settings.split.id(),
        features = features.len(),
        path = %output.display(),
        "Features written"
    );
    Ok(output)
}

fn write_features(features: &[FeatureSet], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for feature in features {
        writer.write_all(feature.to_json_string()?.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
