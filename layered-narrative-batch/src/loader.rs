//! Document discovery and loading.
//!
//! Every `<stem>.tokens.json` file in the input directory is one document.
//! Its alias file is `<character_dir>/<stem>.chars` and its optional chapter
//! structure is `<input_dir>/<stem>.chapter.json`.

use std::fs;
use std::path::{Path, PathBuf};

use layered_narrative::TaggedToken;
use layered_quote_features::ChapterInput;

use crate::config::BatchConfig;
use crate::document::DocumentInput;
use crate::errors::{BatchError, BatchResult};

const TOKENS_SUFFIX: &str = ".tokens.json";
const CHAPTER_SUFFIX: &str = ".chapter.json";
const ALIAS_EXTENSION: &str = "chars";

/// File locations of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub name: String,
    pub tokens_path: PathBuf,
    pub alias_path: PathBuf,
    pub chapter_path: PathBuf,
}

impl DocumentSource {
    pub fn new(name: impl Into<String>, config: &BatchConfig) -> Self {
        let name = name.into();
        Self {
            tokens_path: config.input_dir.join(format!("{}{}", name, TOKENS_SUFFIX)),
            alias_path: config
                .character_dir
                .join(format!("{}.{}", name, ALIAS_EXTENSION)),
            chapter_path: config.input_dir.join(format!("{}{}", name, CHAPTER_SUFFIX)),
            name,
        }
    }
}

/// List documents in the input directory, sorted by name.
pub fn discover_documents(config: &BatchConfig) -> BatchResult<Vec<DocumentSource>> {
    let dir = &config.input_dir;
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BatchError::io(dir, e))? {
        let entry = entry.map_err(|e| BatchError::io(dir, e))?;
        let file_name = entry.file_name();
        if let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(TOKENS_SUFFIX)) {
            if entry.path().is_file() && !stem.is_empty() {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names
        .into_iter()
        .map(|name| DocumentSource::new(name, config))
        .collect())
}

/// Read a document's tokens, alias file and chapter structure.
///
/// A missing alias or chapter file is not an error; unreadable or
/// malformed files are.
pub fn load_document(source: &DocumentSource) -> BatchResult<DocumentInput> {
    let tokens: Vec<TaggedToken> = read_json(&source.tokens_path)?;
    let mut input = DocumentInput::new(source.name.clone(), tokens);

    if let Some(aliases) = read_optional(&source.alias_path)? {
        input = input.with_aliases(aliases);
    }
    if source.chapter_path.is_file() {
        let chapter: ChapterInput = read_json(&source.chapter_path)?;
        input = input.with_chapter(chapter);
    }
    Ok(input)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> BatchResult<T> {
    let content = fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| BatchError::json(path, e))
}

fn read_optional(path: &Path) -> BatchResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BatchError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> BatchConfig {
        BatchConfig::with_dirs(root.join("in"), root.join("chars"), root.join("out"))
    }

    #[test]
    fn source_paths_follow_naming_convention() {
        let config = BatchConfig::with_dirs("in", "chars", "out");
        let source = DocumentSource::new("123_4", &config);
        assert_eq!(source.tokens_path, PathBuf::from("in/123_4.tokens.json"));
        assert_eq!(source.alias_path, PathBuf::from("chars/123_4.chars"));
        assert_eq!(source.chapter_path, PathBuf::from("in/123_4.chapter.json"));
    }

    #[test]
    fn discovers_only_token_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        fs::write(config.input_dir.join("b_1.tokens.json"), "[]").unwrap();
        fs::write(config.input_dir.join("a_1.tokens.json"), "[]").unwrap();
        fs::write(config.input_dir.join("a_1.chapter.json"), "{}").unwrap();
        fs::write(config.input_dir.join("notes.txt"), "").unwrap();

        let names: Vec<_> = discover_documents(&config)
            .unwrap()
            .into_iter()
            .map(|source| source.name)
            .collect();
        assert_eq!(names, vec!["a_1", "b_1"]);
    }

    #[test]
    fn loads_tokens_aliases_and_chapter() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        fs::create_dir_all(&config.character_dir).unwrap();
        let source = DocumentSource::new("a_1", &config);
        fs::write(&source.tokens_path, r#"[{"text": "Kate", "pos": "PROPN"}]"#).unwrap();
        fs::write(&source.alias_path, "($_Kate)\n").unwrap();
        fs::write(
            &source.chapter_path,
            r#"{"paragraph_has_quote": [true], "paragraph_quote_token_ids": [[0, 3]], "character_mentions": {"($_Kate)": [0]}}"#,
        )
        .unwrap();

        let input = load_document(&source).unwrap();
        assert_eq!(input.tokens.len(), 1);
        assert_eq!(input.aliases.as_deref(), Some("($_Kate)\n"));
        assert_eq!(input.chapter.unwrap().paragraph_num(), 1);
    }

    #[test]
    fn missing_alias_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        let source = DocumentSource::new("a_1", &config);
        fs::write(&source.tokens_path, "[]").unwrap();

        let input = load_document(&source).unwrap();
        assert!(input.aliases.is_none());
        assert!(input.chapter.is_none());
    }

    #[test]
    fn malformed_tokens_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        let source = DocumentSource::new("a_1", &config);
        fs::write(&source.tokens_path, "not json").unwrap();

        assert!(matches!(load_document(&source), Err(BatchError::Json { .. })));
    }
}
