//! Case directories
//!
//! A case directory is a flat folder of `*.json` files, one clinical case per
//! file. [`CaseIndex::load`] reads every file in sorted order and indexes the
//! cases by their `case_id`. Files that cannot be read or parsed are kept in
//! [`CaseIndex::skipped`] rather than aborting the whole directory.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One indexed case file.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseEntry {
    pub case_id: String,
    pub title: Option<String>,
    pub path: PathBuf,
}

impl CaseEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A file that was left out of the index, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CaseIndex {
    cases: BTreeMap<String, CaseEntry>,
    pub skipped: Vec<SkippedFile>,
}

impl CaseIndex {
    /// Index every `*.json` file in `dir`.
    ///
    /// A missing directory yields an empty index. Cases without a string
    /// `case_id` are indexed under the file stem; when two files share an id
    /// the later one (in file name order) wins.
    pub fn load(dir: &Path) -> io::Result<Self> {
        let mut index = CaseIndex::default();
        if !dir.exists() {
            return Ok(index);
        }

        for path in json_files(dir)? {
            match read_case(&path) {
                Ok(entry) => {
                    if let Some(previous) = index.cases.insert(entry.case_id.clone(), entry) {
                        warn!(
                            case_id = %previous.case_id,
                            replaced = %previous.path.display(),
                            "duplicate case_id"
                        );
                    }
                }
                Err(reason) => {
                    debug!(path = %path.display(), %reason, "skipping case file");
                    index.skipped.push(SkippedFile { path, reason });
                }
            }
        }

        Ok(index)
    }

    pub fn get(&self, case_id: &str) -> Option<&CaseEntry> {
        self.cases.get(case_id)
    }

    /// Cases ordered by `case_id`.
    pub fn cases(&self) -> impl Iterator<Item = &CaseEntry> {
        self.cases.values()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// The `*.json` files directly inside `dir`, sorted by path.
pub fn json_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_case(path: &Path) -> Result<CaseEntry, String> {
    let source = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let value: Value = serde_json::from_str(&source).map_err(|err| err.to_string())?;
    let Value::Object(map) = value else {
        return Err("top-level value is not an object".to_string());
    };

    let case_id = match map.get("case_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => file_stem(path),
    };
    let title = map
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(CaseEntry {
        case_id,
        title,
        path: path.to_path_buf(),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
