//! One-line summary of a finished build pass.
//!
//! [`summarize`] classifies the pass's files into copied, compiled, cached,
//! removed and generated buckets and renders a line such as
//! `"compiled main.js and 12 cached files into app.js, copied logo.png in 0.4 sec"`.
//! The wording and pluralization are relied on by anything that scrapes
//! build output, so they are covered case by case in the tests.

mod classify;
mod render;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub use classify::{PassClassification, classify};
pub use render::format_elapsed;

/// A static file copied into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub path: PathBuf,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub copy_time: DateTime<Utc>,
}

/// A source file and when it was last compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: PathBuf,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub compilation_time: DateTime<Utc>,
}

/// An output bundle and the ordered sources that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub path: PathBuf,
    #[serde(default)]
    pub source_files: Vec<SourceFile>,
}

/// Bundles and sources removed during the pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposedFiles {
    /// Paths of generated files that were disposed.
    #[serde(default)]
    pub generated: IndexSet<PathBuf>,
    #[serde(default)]
    pub source_paths: IndexSet<PathBuf>,
}

/// Final state of a pass, as handed over by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSnapshot {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub generated_files: Vec<GeneratedFile>,
    #[serde(default)]
    pub disposed: DisposedFiles,
}

impl PassSnapshot {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            assets: Vec::new(),
            generated_files: Vec::new(),
            disposed: DisposedFiles::default(),
        }
    }
}

/// Render the summary line for `snapshot`, measuring elapsed time up to now.
pub fn summarize(snapshot: &PassSnapshot) -> String {
    summarize_at(snapshot, Utc::now())
}

/// Render the summary line with an explicit clock reading.
pub fn summarize_at(snapshot: &PassSnapshot, now: DateTime<Utc>) -> String {
    let main = classify(snapshot).render();
    let elapsed = (now - snapshot.start_time).num_milliseconds();
    format!("{} in {}", main, format_elapsed(elapsed))
}

pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
