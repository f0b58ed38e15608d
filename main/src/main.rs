mod args;
mod prepare;

use anyhow::Context;
use clap::Parser;
use common::utils::config::get_config;
use dataset_pipeline::merge_files;
use instructions::{detailed_instruct, task_instruction};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Cli, Command};

fn main() -> anyhow::Result<()> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Prepare(args) => {
            let config = get_config().context("loading configuration")?;
            let settings = args.resolve(&config);
            info!(
                data_dir = %settings.data_dir.display(),
                split = settings.split.id(),
                tokenizer = %settings.tokenizer,
                max_length = ?settings.max_length,
                "Preparing features"
            );
            let output = prepare::run(&settings)?;
            println!("Features written to {}", output.display());
        }
        Command::Merge(args) => {
            let merged = merge_files(&args.inputs, &args.output).with_context(|| {
                format!("merging {} files into {}", args.inputs.len(), args.output.display())
            })?;
            println!("Merged {merged} records into {}", args.output.display());
        }
        Command::Instruct(args) => {
            let instruction = task_instruction(&args.task_name, &args.task_type)?;
            if args.detailed {
                println!("{}", detailed_instruct(instruction));
            } else {
                println!("{instruction}");
            }
        }
    }

    Ok(())
}
