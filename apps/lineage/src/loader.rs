//! # Corpus Loader
//!
//! Walks the configured roots of an input directory, parses every `*.json`
//! profile and feeds the records to the core in a stable order.
//!
//! Entries are visited sorted by file name, so the first profile to claim a
//! display name (and therefore its bare store key) is the same on every run
//! and every platform.

use crate::config::LineageConfig;
use lineage_core::primitives::MAX_DOCUMENT_SIZE;
use lineage_core::{Category, Explorer, LineageError, ProfileRecord};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Result of loading a profile tree.
#[derive(Debug)]
pub struct LoadedCorpus {
    pub explorer: Explorer,
    /// Number of `*.json` files found.
    pub files_seen: usize,
    /// Files that were not ingested, with their origin and reason.
    pub skipped: Vec<(String, LineageError)>,
    /// Valid profiles left out by the category filter.
    pub filtered: usize,
}

/// Load every profile under `input_dir` according to `config`.
///
/// Fails only if `input_dir` itself is not a directory. Unreadable or
/// malformed files are logged and reported in `LoadedCorpus::skipped`.
pub fn load_corpus(
    input_dir: &Path,
    config: &LineageConfig,
    categories: Option<&BTreeSet<Category>>,
) -> Result<LoadedCorpus, LineageError> {
    if !input_dir.is_dir() {
        return Err(LineageError::IoError(format!(
            "Input directory '{}' does not exist or is not a directory",
            input_dir.display()
        )));
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut files_seen = 0usize;

    let roots: Vec<&str> = if config.corpus.roots.is_empty() {
        vec![""]
    } else {
        config.corpus.roots.iter().map(String::as_str).collect()
    };

    for root in roots {
        let dir = input_dir.join(root);
        if !dir.is_dir() {
            tracing::warn!("Skipping missing corpus root {}", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_json(path) {
                continue;
            }
            files_seen += 1;

            let origin = origin_of(path, input_dir);
            match read_record(path, &origin) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!("Skipping {}: {}", origin, err);
                    skipped.push((origin, err));
                }
            }
        }
    }

    let (explorer, report) = Explorer::from_records(
        records,
        categories,
        config.resolver.clone(),
        config.settings.clone(),
    );
    for (origin, err) in &report.rejected {
        tracing::warn!("Skipping {}: {}", origin, err);
    }
    skipped.extend(report.rejected);

    tracing::info!(
        profiles = explorer.store().len(),
        files = files_seen,
        skipped = skipped.len(),
        filtered = report.filtered,
        "Loaded profile corpus from {}",
        input_dir.display()
    );

    Ok(LoadedCorpus {
        explorer,
        files_seen,
        skipped,
        filtered: report.filtered,
    })
}

/// Read and parse one profile document.
pub fn read_record(path: &Path, origin: &str) -> Result<ProfileRecord, LineageError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| LineageError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_DOCUMENT_SIZE {
        return Err(LineageError::DocumentTooLarge {
            origin: origin.to_string(),
            size: metadata.len(),
            limit: MAX_DOCUMENT_SIZE,
        });
    }

    let contents = std::fs::read(path)
        .map_err(|e| LineageError::IoError(format!("Read file: {}", e)))?;
    let value: serde_json::Value = serde_json::from_slice(&contents)
        .map_err(|e| LineageError::ParseError(format!("{}: {}", origin, e)))?;

    ProfileRecord::from_value(value, origin)
}

/// `/`-separated path of `path` relative to `base`.
///
/// Falls back to the full path if `path` is not under `base`.
pub fn origin_of(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
