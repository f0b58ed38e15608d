use std::{
    fs,
    path::{Path, PathBuf},
};

use common::error::AppError;
use serde::Deserialize;
use tokenizers::{PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::batch::BatchEncoding;

const PAD_CANDIDATES: [&str; 3] = ["[PAD]", "<pad>", "<|pad|>"];
const EOS_CANDIDATES: [&str; 4] = ["</s>", "<|endoftext|>", "<eos>", "<|im_end|>"];

/// HF stores "unbounded" as a huge sentinel; anything above this is ignored.
const MAX_SANE_MODEL_LENGTH: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    None,
    Longest,
    MaxLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Falls back to the tokenizer's model maximum when unset.
    pub max_length: Option<usize>,
    pub padding: Padding,
    pub truncation: bool,
    pub pad_to_multiple_of: Option<usize>,
    pub add_special_tokens: bool,
}

impl EncodeOptions {
    /// Pad and truncate every row to exactly `max_length` tokens.
    pub const fn fixed(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            padding: Padding::MaxLength,
            truncation: true,
            pad_to_multiple_of: None,
            add_special_tokens: true,
        }
    }

    /// Pad to the longest row of the batch, truncating at `max_length`.
    pub const fn longest(max_length: usize) -> Self {
        Self {
            padding: Padding::Longest,
            ..Self::fixed(max_length)
        }
    }

    /// Truncate at `max_length` but leave rows at their natural length.
    pub const fn unpadded(max_length: usize) -> Self {
        Self {
            padding: Padding::None,
            ..Self::fixed(max_length)
        }
    }

    pub const fn with_pad_to_multiple_of(mut self, multiple: usize) -> Self {
        self.pad_to_multiple_of = Some(multiple);
        self
    }
}

/// The tokenizer capability the feature pipeline depends on.
pub trait BatchTokenizer {
    fn encode_batch(&self, texts: &[&str], options: &EncodeOptions)
        -> Result<BatchEncoding, AppError>;

    fn model_max_length(&self) -> usize;

    fn pad_token_id(&self) -> u32;

    fn eos_token_id(&self) -> Option<u32>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Right
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpecialToken {
    Text(String),
    Added { content: String },
}

impl SpecialToken {
    fn content(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Added { content } => content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenizerConfigFile {
    #[serde(default)]
    model_max_length: Option<f64>,
    #[serde(default)]
    eos_token: Option<SpecialToken>,
}

/// A `tokenizers::Tokenizer` plus the metadata HF keeps in `tokenizer_config.json`.
#[derive(Clone, Debug)]
pub struct PretrainedTokenizer {
    inner: Tokenizer,
    model_max_length: usize,
    pad_id: u32,
    pad_token: String,
    eos_id: Option<u32>,
}

impl PretrainedTokenizer {
    pub fn new(inner: Tokenizer, model_max_length: usize) -> Self {
        let (pad_id, pad_token) = resolve_pad(&inner);
        let eos_id = EOS_CANDIDATES
            .iter()
            .find_map(|candidate| inner.token_to_id(candidate));
        Self {
            inner,
            model_max_length,
            pad_id,
            pad_token,
            eos_id,
        }
    }

    /// Loads from a local `tokenizer.json`, a model directory, or a hub identifier.
    pub fn load(source: &str, fallback_max_length: usize) -> Result<Self, AppError> {
        let path = Path::new(source);
        if path.is_dir() {
            Self::from_dir(path, fallback_max_length)
        } else if path.is_file() {
            Self::from_file(path, fallback_max_length)
        } else {
            Self::from_pretrained(source, fallback_max_length)
        }
    }

    pub fn from_file(path: &Path, fallback_max_length: usize) -> Result<Self, AppError> {
        let inner = Tokenizer::from_file(path).map_err(|err| {
            AppError::Tokenizer(format!("loading {}: {err}", path.display()))
        })?;
        let model_max_length = truncation_length(&inner).unwrap_or(fallback_max_length);
        info!(path = %path.display(), model_max_length, "Loaded tokenizer");
        Ok(Self::new(inner, model_max_length))
    }

    /// Reads `tokenizer.json` and, when present, `tokenizer_config.json` from `dir`.
    pub fn from_dir(dir: &Path, fallback_max_length: usize) -> Result<Self, AppError> {
        let mut tokenizer = Self::from_file(&dir.join("tokenizer.json"), fallback_max_length)?;

        let config_path: PathBuf = dir.join("tokenizer_config.json");
        if !config_path.is_file() {
            return Ok(tokenizer);
        }
        let config: TokenizerConfigFile = serde_json::from_str(&fs::read_to_string(&config_path)?)
            .map_err(|err| AppError::malformed(&config_path, err.to_string()))?;

        if let Some(length) = config.model_max_length.and_then(sane_model_length) {
            tokenizer.model_max_length = length;
        }
        if let Some(eos) = config.eos_token {
            if let Some(id) = tokenizer.inner.token_to_id(eos.content()) {
                tokenizer.eos_id = Some(id);
            }
        }
        debug!(
            path = %config_path.display(),
            model_max_length = tokenizer.model_max_length,
            eos_id = ?tokenizer.eos_id,
            "Applied tokenizer config"
        );
        Ok(tokenizer)
    }

    pub fn from_pretrained(identifier: &str, fallback_max_length: usize) -> Result<Self, AppError> {
        let inner = Tokenizer::from_pretrained(identifier, None).map_err(|err| {
            AppError::Tokenizer(format!("fetching tokenizer '{identifier}': {err}"))
        })?;
        let model_max_length = truncation_length(&inner).unwrap_or(fallback_max_length);
        info!(identifier, model_max_length, "Loaded pretrained tokenizer");
        Ok(Self::new(inner, model_max_length))
    }

    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, AppError> {
        self.inner
            .decode(ids, skip_special_tokens)
            .map_err(|err| AppError::Tokenizer(err.to_string()))
    }
}

impl BatchTokenizer for PretrainedTokenizer {
    fn encode_batch(
        &self,
        texts: &[&str],
        options: &EncodeOptions,
    ) -> Result<BatchEncoding, AppError> {
        let max_length = options.max_length.unwrap_or(self.model_max_length);

        // Per-call settings go on a copy so the shared tokenizer stays untouched.
        let mut tokenizer = self.inner.clone();
        let truncation = options.truncation.then(|| TruncationParams {
            max_length,
            ..TruncationParams::default()
        });
        tokenizer
            .with_truncation(truncation)
            .map_err(|err| AppError::Tokenizer(err.to_string()))?;

        let strategy = match options.padding {
            Padding::None => None,
            Padding::Longest => Some(PaddingStrategy::BatchLongest),
            Padding::MaxLength => Some(PaddingStrategy::Fixed(max_length)),
        };
        tokenizer.with_padding(strategy.map(|strategy| PaddingParams {
            strategy,
            pad_to_multiple_of: options.pad_to_multiple_of,
            pad_id: self.pad_id,
            pad_token: self.pad_token.clone(),
            ..self.inner.get_padding().cloned().unwrap_or_default()
        }));

        let encodings = tokenizer
            .encode_batch(texts.to_vec(), options.add_special_tokens)
            .map_err(|err| AppError::Tokenizer(err.to_string()))?;

        Ok(BatchEncoding::from_encodings(&encodings))
    }

    fn model_max_length(&self) -> usize {
        self.model_max_length
    }

    fn pad_token_id(&self) -> u32 {
        self.pad_id
    }

    fn eos_token_id(&self) -> Option<u32> {
        self.eos_id
    }

    fn padding_direction(&self) -> PaddingDirection {
        self.inner
            .get_padding()
            .map_or(PaddingDirection::Right, |params| params.direction)
    }
}

fn resolve_pad(inner: &Tokenizer) -> (u32, String) {
    if let Some(params) = inner.get_padding() {
        return (params.pad_id, params.pad_token.clone());
    }
    PAD_CANDIDATES
        .iter()
        .find_map(|candidate| {
            inner
                .token_to_id(candidate)
                .map(|id| (id, (*candidate).to_string()))
        })
        .unwrap_or_else(|| (0, "[PAD]".to_string()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sane_model_length(length: f64) -> Option<usize> {
    (length >= 1.0 && length < MAX_SANE_MODEL_LENGTH).then(|| length as usize)
}

fn truncation_length(inner: &Tokenizer) -> Option<usize> {
    inner.get_truncation().map(|params| params.max_length)
}
