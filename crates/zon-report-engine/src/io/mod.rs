pub mod corpus;

pub use corpus::{
    BuildReport, BuiltPage, Corpus, CorpusEntry, DuplicateDocumentId, FailedDocument,
    build_corpus,
};

use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static SCRIPT_WRAPPER_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document directory: {0}")]
    InvalidDocumentDir(String),
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Document id `{0}` cannot be used as a file name")]
    UnsafeId(String),
}

/// Parse document text, accepting bare JSON or the producer's script form
/// `window.<name> = { ... };`.
pub fn parse_document_text(content: &str) -> Result<Value, serde_json::Error> {
    let wrapper = SCRIPT_WRAPPER_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(?:window\.[A-Za-z_$][\w$]*|(?:var|let|const)\s+[A-Za-z_$][\w$]*)\s*=")
            .expect("Invalid script wrapper regex")
    });

    let body = match wrapper.find(content) {
        Some(m) => {
            let rest = content[m.end()..].trim_end();
            rest.strip_suffix(';').unwrap_or(rest)
        }
        None => content,
    };
    serde_json::from_str(body)
}

/// Read and parse one document file.
pub fn load_document(path: &Path) -> Result<Value, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_document_text(&content).map_err(|source| IoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether a path looks like a document file (`*.json` or `*.data.js`).
pub fn is_document_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") || name.ends_with(".data.js")
}

/// Recursively find document files, sorted by path.
pub fn scan_documents(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_document_dir(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if is_document_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

pub fn validate_document_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocumentDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

/// Whether a document id can be used directly as a file stem.
pub fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
}

/// Write `<out_dir>/<id>.html`, creating the directory if needed.
pub fn write_page(out_dir: &Path, id: &str, html: &str) -> Result<PathBuf, IoError> {
    if !is_safe_file_stem(id) {
        return Err(IoError::UnsafeId(id.to_string()));
    }
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{id}.html"));
    fs::write(&path, html)?;
    Ok(path)
}

/// Write `<out_dir>/<name>.html` as a redirect to `target`, the entry point
/// that always opens the newest document.
pub fn write_latest_redirect(
    out_dir: &Path,
    name: &str,
    target: &str,
    lang: &str,
) -> Result<PathBuf, IoError> {
    write_page(out_dir, name, &crate::page::render_redirect(target, lang))
}
