use std::str::FromStr;

use tokenizers::Tokenizer;

use crate::tokenizer::PretrainedTokenizer;

/// Whitespace-split word-level tokenizer with no post-processing.
pub(crate) const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [
    {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 2, "content": "</s>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
  ],
  "normalizer": null,
  "pre_tokenizer": {"type": "Whitespace"},
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {
      "[PAD]": 0, "[UNK]": 1, "</s>": 2,
      "query": 3, "passage": 4, ":": 5,
      "what": 6, "is": 7, "rust": 8, "a": 9, "systems": 10, "language": 11, "for": 12,
      "seoul": 13, "capital": 14, "of": 15, "korea": 16, "the": 17, "busan": 18, "port": 19, ".": 20
    },
    "unk_token": "[UNK]"
  }
}"#;

pub(crate) fn word_level_tokenizer() -> PretrainedTokenizer {
    let inner = Tokenizer::from_str(TOKENIZER_JSON).expect("fixture tokenizer parses");
    PretrainedTokenizer::new(inner, 16)
}
