use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::utils::config::AppConfig;
use dataset_pipeline::Split;

#[derive(Debug, Parser)]
#[command(
    name = "koe5-prep",
    version,
    about = "Prepare E5 retrieval training data: examples, features and task instructions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build E5 examples from a split file and encode them into features
    Prepare(PrepareArgs),
    /// Concatenate JSON array files into one
    Merge(MergeArgs),
    /// Print the instruction for an MTEB task
    Instruct(InstructArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PrepareArgs {
    /// Directory holding <split>.json or <split>.jsonl
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Which split to prepare
    #[arg(long, default_value = "train")]
    pub split: Split,

    /// tokenizer.json path, model directory, or hub identifier
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Pad and truncate every sequence to this many tokens
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Directory for the <split>.features.jsonl output
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Settings for a `prepare` run after layering CLI flags over the config.
#[derive(Debug, Clone)]
pub struct PrepareSettings {
    pub data_dir: PathBuf,
    pub split: Split,
    pub tokenizer: String,
    pub model_max_length: usize,
    pub max_length: Option<usize>,
    pub output_dir: PathBuf,
}

impl PrepareArgs {
    pub fn resolve(self, config: &AppConfig) -> PrepareSettings {
        PrepareSettings {
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(&config.data_dir)),
            split: self.split,
            tokenizer: self.tokenizer.unwrap_or_else(|| config.tokenizer.clone()),
            model_max_length: config.model_max_length,
            max_length: self.max_length.or(config.max_length),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(&config.output_dir)),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// JSON array files, merged in the given order
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the merged array
    #[arg(long, short)]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct InstructArgs {
    #[arg(long)]
    pub task_name: String,

    /// STS, Summarization, BitextMining, Classification, Clustering,
    /// Reranking, PairClassification or Retrieval
    #[arg(long)]
    pub task_type: String,

    /// Print the full "Instruct: ...\nQuery: " prefix
    #[arg(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
    pub detailed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn config() -> AppConfig {
        AppConfig {
            data_dir: "./data".into(),
            output_dir: "./features".into(),
            tokenizer: "intfloat/multilingual-e5-base".into(),
            model_max_length: 512,
            max_length: Some(256),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "koe5-prep",
            "prepare",
            "--data-dir",
            "/srv/koe5",
            "--split",
            "dev",
            "--max-length",
            "128",
        ]);
        let Command::Prepare(args) = cli.command else {
            panic!("expected prepare subcommand");
        };

        let settings = args.resolve(&config());
        assert_eq!(settings.data_dir, PathBuf::from("/srv/koe5"));
        assert_eq!(settings.split, Split::Dev);
        assert_eq!(settings.max_length, Some(128));
        assert_eq!(settings.tokenizer, "intfloat/multilingual-e5-base");
        assert_eq!(settings.output_dir, PathBuf::from("./features"));
    }

    #[test]
    fn config_fills_missing_flags() {
        let cli = Cli::parse_from(["koe5-prep", "prepare"]);
        let Command::Prepare(args) = cli.command else {
            panic!("expected prepare subcommand");
        };

        let settings = args.resolve(&config());
        assert_eq!(settings.split, Split::Train);
        assert_eq!(settings.max_length, Some(256));
    }

    #[test]
    fn merge_requires_inputs() {
        assert!(Cli::try_parse_from(["koe5-prep", "merge", "--output", "out.json"]).is_err());
        let cli = Cli::parse_from(["koe5-prep", "merge", "a.json", "b.json", "-o", "out.json"]);
        let Command::Merge(args) = cli.command else {
            panic!("expected merge subcommand");
        };
        assert_eq!(args.inputs.len(), 2);
    }
}
