//! A directory of documents rendered together into a static site.

use super::{
    IoError, is_safe_file_stem, load_document, scan_documents, write_latest_redirect, write_page,
};
use crate::page::{self, IndexEntry};
use crate::pipeline::{RenderError, RenderMode, Renderer, Warning};
use crate::schema;
use relative_path::RelativePathBuf;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// One file found in the corpus.
#[derive(Debug)]
pub struct CorpusEntry {
    pub path: RelativePathBuf,
    pub source: Result<Value, IoError>,
}

impl CorpusEntry {
    /// `meta.id` of the raw document, if it has one.
    pub fn document_id(&self) -> Option<&str> {
        self.source
            .as_ref()
            .ok()?
            .pointer("/meta/id")
            .and_then(Value::as_str)
    }
}

/// A `meta.id` shared by more than one document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDocumentId {
    pub id: String,
    pub paths: Vec<RelativePathBuf>,
}

#[derive(Debug)]
pub struct Corpus {
    root: PathBuf,
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Load every document under `root`. Unreadable files are kept as
    /// entries carrying their error rather than failing the whole corpus.
    pub fn load(root: &Path) -> Result<Self, IoError> {
        let files = scan_documents(root)?;
        let entries = files
            .into_iter()
            .map(|file| {
                let path = relative_to(root, &file);
                let source = load_document(&file);
                if let Err(e) = &source {
                    log::warn!("skipping {path}: {e}");
                }
                CorpusEntry { path, source }
            })
            .collect();
        let corpus = Self {
            root: root.to_path_buf(),
            entries,
        };
        for duplicate in corpus.duplicate_ids() {
            log::warn!(
                "document id `{}` is used by {} files",
                duplicate.id,
                duplicate.paths.len()
            );
        }
        Ok(corpus)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Document ids used by more than one file. Uniqueness is the producer's
    /// job; this only reports collisions.
    pub fn duplicate_ids(&self) -> Vec<DuplicateDocumentId> {
        let mut by_id: BTreeMap<&str, Vec<RelativePathBuf>> = BTreeMap::new();
        for entry in &self.entries {
            if let Some(id) = entry.document_id() {
                by_id.entry(id).or_default().push(entry.path.clone());
            }
        }
        by_id
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(id, paths)| DuplicateDocumentId {
                id: id.to_string(),
                paths,
            })
            .collect()
    }
}

fn relative_to(root: &Path, file: &Path) -> RelativePathBuf {
    let stripped = file.strip_prefix(root).unwrap_or(file);
    RelativePathBuf::from_path(stripped).unwrap_or_else(|_| {
        RelativePathBuf::from(stripped.to_string_lossy().replace('\\', "/"))
    })
}

/// A page written by [`build_corpus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPage {
    pub source: RelativePathBuf,
    pub id: String,
    pub output: PathBuf,
    pub warnings: Vec<Warning>,
}

/// A document that could not be rendered.
#[derive(Debug)]
pub struct FailedDocument {
    pub source: RelativePathBuf,
    pub reason: String,
    /// Diagnostic page written in best-effort mode
    pub diagnostic: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<BuiltPage>,
    pub failed: Vec<FailedDocument>,
    pub duplicate_ids: Vec<DuplicateDocumentId>,
    pub index: Option<PathBuf>,
    pub latest: Option<PathBuf>,
}

/// Render every document of `corpus` into `out_dir`.
///
/// Pages are keyed by `meta.id`; a colliding id gets a `-2`, `-3`, ...
/// suffix. A document whose id cannot be a file name is recorded as failed
/// like any other. Writes `index.html` and a `latest.html` redirect to the
/// newest document.
pub fn build_corpus(
    corpus: &Corpus,
    renderer: &Renderer,
    out_dir: &Path,
) -> Result<BuildReport, IoError> {
    fs::create_dir_all(out_dir)?;
    let lang = renderer.options().lang.as_str();
    let mut report = BuildReport {
        duplicate_ids: corpus.duplicate_ids(),
        ..BuildReport::default()
    };
    let mut used_stems = HashSet::new();
    let mut index = Vec::new();

    for entry in corpus.entries() {
        let raw = match &entry.source {
            Ok(raw) => raw,
            Err(e) => {
                report.failed.push(FailedDocument {
                    source: entry.path.clone(),
                    reason: e.to_string(),
                    diagnostic: None,
                });
                continue;
            }
        };

        let rendered = schema::validate(raw)
            .map_err(RenderError::from)
            .and_then(|doc| renderer.render_document(&doc).map(|rendered| (doc, rendered)));

        let (reason, diagnostic_html) = match rendered {
            Ok((doc, rendered)) => match unique_stem(&doc.meta.id, &mut used_stems) {
                Some(stem) => {
                    let output = write_page(out_dir, &stem, &rendered.html)?;
                    index.push(IndexEntry::from_meta(&doc.meta, format!("{stem}.html")));
                    report.pages.push(BuiltPage {
                        source: entry.path.clone(),
                        id: doc.meta.id.clone(),
                        output,
                        warnings: rendered.warnings,
                    });
                    continue;
                }
                None => {
                    let reason = IoError::UnsafeId(doc.meta.id.clone()).to_string();
                    log::warn!("{} skipped: {reason}", entry.path);
                    let html = page::render_failure_page(&reason, lang);
                    (reason, html)
                }
            },
            Err(e) => {
                log::warn!("{} failed to render: {e}", entry.path);
                (e.to_string(), page::render_diagnostic_page(&e, lang))
            }
        };

        let diagnostic = match renderer.options().mode {
            RenderMode::BestEffort => {
                let stem = unique_stem(&failure_stem(&entry.path), &mut used_stems);
                match stem {
                    Some(stem) => Some(write_page(out_dir, &stem, &diagnostic_html)?),
                    None => None,
                }
            }
            RenderMode::Strict => None,
        };
        report.failed.push(FailedDocument {
            source: entry.path.clone(),
            reason,
            diagnostic,
        });
    }

    page::sort_newest_first(&mut index);
    let index_path = out_dir.join("index.html");
    fs::write(&index_path, page::render_index("Documents", &index, lang))?;
    report.index = Some(index_path);

    if let Some(newest) = index.first() {
        report.latest = Some(write_latest_redirect(out_dir, "latest", &newest.href, lang)?);
    }

    log::info!(
        "built {} pages ({} failed) into {}",
        report.pages.len(),
        report.failed.len(),
        out_dir.display()
    );
    Ok(report)
}

/// Pick `stem`, or `stem-2`, `stem-3`, ... if already taken. Reserved names
/// (`index`, `latest`) are never handed out.
fn unique_stem(stem: &str, used: &mut HashSet<String>) -> Option<String> {
    if !is_safe_file_stem(stem) {
        return None;
    }
    let reserved = |s: &str| s == "index" || s == "latest";
    let mut candidate = stem.to_string();
    let mut n = 2;
    while reserved(&candidate) || used.contains(&candidate) {
        candidate = format!("{stem}-{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    Some(candidate)
}

/// File stem for a diagnostic page, derived from the source file name.
fn failure_stem(path: &RelativePathBuf) -> String {
    let name = path.file_name().unwrap_or("document");
    let stem = name
        .strip_suffix(".data.js")
        .or_else(|| name.strip_suffix(".json"))
        .unwrap_or(name);
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("{}.error", cleaned.trim_start_matches('.'))
}
