use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Path to a `tokenizer.json`, a model directory, or a hub identifier.
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,
    /// Fallback when the tokenizer files do not declare a maximum length.
    #[serde(default = "default_model_max_length")]
    pub model_max_length: usize,
    #[serde(default)]
    pub max_length: Option<usize>,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_output_dir() -> String {
    "./features".to_string()
}

fn default_tokenizer() -> String {
    "intfloat/multilingual-e5-base".to_string()
}

const fn default_model_max_length() -> usize {
    512
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default());

    build_config(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    builder.build()?.try_deserialize()
}
