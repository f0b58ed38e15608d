use std::path::Path;

use common::{
    error::AppError,
    types::{Example, RecordPosition},
};
use serde_json::Value;
use tracing::info;

use crate::{
    e5::format_as_e5,
    reader::{read_json, read_jsonl},
    record::RawRecord,
    split::{resolve_split_file, Split, SplitFile},
};

/// Loads `<split>.json` (or `<split>.jsonl`) from `dir` and returns one E5
/// formatted example per record, in file order.
pub fn build_examples(dir: &Path, split: Split) -> Result<Vec<Example>, AppError> {
    let source = resolve_split_file(dir, split)?;
    let values: Vec<(RecordPosition, Value)> = match &source {
        SplitFile::Json(path) => read_json(path)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| (RecordPosition::Index(index), value))
            .collect(),
        SplitFile::JsonLines(path) => read_jsonl(path)?
            .into_iter()
            .map(|(line, value)| (RecordPosition::Line(line), value))
            .collect(),
    };

    let examples = create_examples(source.path(), values)?;
    info!(
        split = split.id(),
        path = %source.path().display(),
        examples = examples.len(),
        "Built examples"
    );
    Ok(examples)
}

pub fn train_examples(dir: &Path) -> Result<Vec<Example>, AppError> {
    build_examples(dir, Split::Train)
}

pub fn dev_examples(dir: &Path) -> Result<Vec<Example>, AppError> {
    build_examples(dir, Split::Dev)
}

pub fn test_examples(dir: &Path) -> Result<Vec<Example>, AppError> {
    build_examples(dir, Split::Test)
}

fn create_examples(
    path: &Path,
    values: Vec<(RecordPosition, Value)>,
) -> Result<Vec<Example>, AppError> {
    values
        .into_iter()
        .map(|(at, value)| {
            let example = RawRecord::decode(path, at, value)?.into_example(path, at)?;
            Ok(format_as_e5(&example))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builds_examples_in_file_order() {
        let dir = tempdir().unwrap();
        let records = r#"[
            {"query": "q0", "document": "d0", "hard_negative": "n0"},
            {"query": ["q1", "q1-alt"], "document": ["d1"]},
            {"query": "q2", "document": "d2", "hard_negative": ["n2", "n2-alt"]}
        ]"#;
        fs::write(dir.path().join("train.json"), records).unwrap();

        let examples = train_examples(dir.path()).unwrap();

        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].query(), "query: q0");
        assert_eq!(examples[0].negative_passage(), Some("passage: n0"));
        assert_eq!(examples[1].query(), "query: q1");
        assert_eq!(examples[1].positive_passage(), "passage: d1");
        assert_eq!(examples[1].negative_passage(), None);
        assert_eq!(examples[2].negative_passage(), Some("passage: n2"));
        for example in &examples {
            assert!(example.query().starts_with("query: "));
            assert!(example.positive_passage().starts_with("passage: "));
        }
    }

    #[test]
    fn json_takes_priority_over_jsonl() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("train.json"),
            r#"[{"query": "from json", "document": "d"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("train.jsonl"),
            "{\"query\": \"from jsonl\", \"document\": \"d\"}\n{\"query\": \"x\", \"document\": \"y\"}\n",
        )
        .unwrap();

        let examples = build_examples(dir.path(), Split::Train).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].query(), "query: from json");
    }

    #[test]
    fn reads_jsonl_when_json_is_absent() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("test.jsonl"),
            "{\"query\": \"질문\", \"document\": \"문서\"}\n{\"query\": \"q\", \"document\": \"d\"}\n",
        )
        .unwrap();

        let examples = test_examples(dir.path()).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].query(), "query: 질문");
        assert_eq!(examples[0].positive_passage(), "passage: 문서");
    }

    #[test]
    fn missing_split_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("train.json"), "[]").unwrap();

        let err = dev_examples(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::MissingFile { .. }));
    }

    #[test]
    fn malformed_record_aborts_the_build() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("dev.json"),
            r#"[{"query": "q", "document": "d"}, {"query": "q"}]"#,
        )
        .unwrap();

        let err = dev_examples(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dev.json"), "unexpected error: {message}");
        assert!(message.contains("record 1"), "unexpected error: {message}");
    }

    #[test]
    fn jsonl_errors_point_at_the_source_line() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("train.jsonl"),
            "{\"query\": \"q\", \"document\": \"d\"}\n\n{\"query\": \"q\"}\n",
        )
        .unwrap();

        let err = train_examples(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("train.jsonl"), "unexpected error: {message}");
        assert!(message.contains("line 3"), "unexpected error: {message}");
    }

    #[test]
    fn later_list_elements_do_not_fail_the_build() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("train.json"),
            r#"[{"query": ["q1", 7], "document": "d", "hard_negative": ["n1", null]}]"#,
        )
        .unwrap();

        let examples = train_examples(dir.path()).unwrap();
        assert_eq!(examples[0].query(), "query: q1");
        assert_eq!(examples[0].negative_passage(), Some("passage: n1"));
    }
}
