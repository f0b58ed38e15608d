use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "dev" | "validation" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "unknown split '{other}'. Expected 'train', 'dev', or 'test'."
            )),
        }
    }
}

/// The on-disk file backing a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitFile {
    Json(PathBuf),
    JsonLines(PathBuf),
}

impl SplitFile {
    pub fn path(&self) -> &Path {
        match self {
            Self::Json(path) | Self::JsonLines(path) => path,
        }
    }
}

/// `<split>.json` wins over `<split>.jsonl` when both are present.
pub fn resolve_split_file(dir: &Path, split: Split) -> Result<SplitFile, AppError> {
    let json = dir.join(format!("{split}.json"));
    if json.is_file() {
        return Ok(SplitFile::Json(json));
    }

    let jsonl = dir.join(format!("{split}.jsonl"));
    if jsonl.is_file() {
        return Ok(SplitFile::JsonLines(jsonl));
    }

    Err(AppError::MissingFile {
        dir: dir.to_path_buf(),
        split: split.id().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn prefers_json_over_jsonl() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("train.json"), "[]").unwrap();
        fs::write(dir.path().join("train.jsonl"), "").unwrap();

        let resolved = resolve_split_file(dir.path(), Split::Train).unwrap();
        assert_eq!(resolved, SplitFile::Json(dir.path().join("train.json")));
    }

    #[test]
    fn falls_back_to_jsonl() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("test.jsonl"), "").unwrap();

        let resolved = resolve_split_file(dir.path(), Split::Test).unwrap();
        assert_eq!(resolved, SplitFile::JsonLines(dir.path().join("test.jsonl")));
    }

    #[test]
    fn reports_missing_split() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("train.json"), "[]").unwrap();

        let err = resolve_split_file(dir.path(), Split::Dev).unwrap_err();
        assert!(matches!(err, AppError::MissingFile { ref split, .. } if split == "dev"));
    }

    #[test]
    fn parses_split_names() {
        assert_eq!("Train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!("validation".parse::<Split>().unwrap(), Split::Dev);
        assert!("holdout".parse::<Split>().is_err());
    }
}
