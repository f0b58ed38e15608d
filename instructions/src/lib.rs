#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

mod tables;

use std::str::FromStr;

use common::error::AppError;
use tracing::debug;

use tables::{
    CLASSIFICATION, CLUSTERING, CQADUPSTACK_INSTRUCTION, MIRACL_INSTRUCTION, RERANKING,
    RETRIEVAL, RETRIEVAL_ALIASES,
};

/// MTEB task categories that carry an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Sts,
    Summarization,
    BitextMining,
    Classification,
    Clustering,
    Reranking,
    PairClassification,
    Retrieval,
}

impl FromStr for TaskType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STS" => Ok(Self::Sts),
            "Summarization" => Ok(Self::Summarization),
            "BitextMining" => Ok(Self::BitextMining),
            "Classification" => Ok(Self::Classification),
            "Clustering" => Ok(Self::Clustering),
            "Reranking" => Ok(Self::Reranking),
            "PairClassification" => Ok(Self::PairClassification),
            "Retrieval" => Ok(Self::Retrieval),
            _ => Err(()),
        }
    }
}

/// Returns the instruction used for `task_name` of category `task_type`.
pub fn task_instruction(task_name: &str, task_type: &str) -> Result<&'static str, AppError> {
    let unknown = || AppError::UnknownTask {
        task_name: task_name.to_string(),
        task_type: task_type.to_string(),
    };

    let kind = TaskType::from_str(task_type).map_err(|()| unknown())?;
    let instruction = match kind {
        TaskType::Sts => Some("Retrieve semantically similar text."),
        TaskType::Summarization => {
            Some("Given a news summary, retrieve other semantically similar summaries")
        }
        TaskType::BitextMining => Some("Retrieve parallel sentences."),
        TaskType::Classification => lookup(CLASSIFICATION, task_name),
        TaskType::Clustering => lookup(CLUSTERING, task_name),
        TaskType::Reranking | TaskType::PairClassification => lookup(RERANKING, task_name),
        TaskType::Retrieval => retrieval_instruction(task_name),
    };

    let instruction = instruction.ok_or_else(unknown)?;
    debug!(task_name, task_type, "Resolved task instruction");
    Ok(instruction)
}

/// Formats a task description as an instruction-tuned query prefix.
pub fn detailed_instruct(task_description: &str) -> String {
    if task_description.is_empty() {
        return String::new();
    }
    format!("Instruct: {task_description}\nQuery: ")
}

fn lookup(table: &[(&str, &'static str)], task_name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == task_name)
        .map(|(_, instruction)| *instruction)
}

/// BEIR-style names resolve through lower-cased keys and a few aliases.
fn retrieval_instruction(task_name: &str) -> Option<&'static str> {
    if task_name.to_lowercase().starts_with("cqadupstack") {
        return Some(CQADUPSTACK_INSTRUCTION);
    }
    if task_name == "miracl" {
        return Some(MIRACL_INSTRUCTION);
    }

    lookup(RETRIEVAL, task_name)
        .or_else(|| {
            RETRIEVAL
                .iter()
                .find(|(name, _)| name.to_lowercase() == task_name)
                .map(|(_, instruction)| *instruction)
        })
        .or_else(|| {
            RETRIEVAL_ALIASES
                .iter()
                .find(|(alias, _)| *alias == task_name)
                .and_then(|(_, canonical)| lookup(RETRIEVAL, canonical))
        })
}
