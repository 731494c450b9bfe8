use indexmap::IndexSet;

use super::{GeneratedFile, PassSnapshot, base_name};

/// Files of a pass sorted into the buckets the summary line reports.
///
/// Names are base names in first-seen order; `removed` holds full paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassClassification {
    pub copied: Vec<String>,
    pub generated: Vec<String>,
    pub compiled: Vec<String>,
    pub cached: usize,
    pub removed: Vec<String>,
}

/// Sort the files of `snapshot` into buckets.
///
/// - an asset counts as copied when copied strictly after the pass started
/// - a source counts as compiled when compiled at or after the pass start
/// - a generated file is changed when any of its sources was compiled this
///   pass or it was disposed; unchanged generated files contribute nothing
/// - cached sources are the uncompiled sources of changed generated files
pub fn classify(snapshot: &PassSnapshot) -> PassClassification {
    let start = snapshot.start_time;

    let copied = snapshot
        .assets
        .iter()
        .filter(|asset| asset.copy_time > start)
        .map(|asset| base_name(&asset.path))
        .collect();

    let mut generated = Vec::new();
    let mut compiled: IndexSet<String> = IndexSet::new();
    let mut cached = 0;

    for file in &snapshot.generated_files {
        let fresh: Vec<String> = file
            .source_files
            .iter()
            .filter(|source| source.compilation_time >= start)
            .map(|source| base_name(&source.path))
            .collect();

        if fresh.is_empty() && !is_disposed(snapshot, file) {
            continue;
        }

        generated.push(base_name(&file.path));
        cached += file.source_files.len() - fresh.len();
        compiled.extend(fresh);
    }

    PassClassification {
        copied,
        generated,
        compiled: compiled.into_iter().collect(),
        cached,
        removed: snapshot
            .disposed
            .source_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    }
}

fn is_disposed(snapshot: &PassSnapshot, file: &GeneratedFile) -> bool {
    snapshot.disposed.generated.contains(&file.path)
}
