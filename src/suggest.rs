//! Discovery of edge-list files for the projects in a source tree.
//!
//! The metadata extractor writes one `<Assembly>.edges.json` file per built
//! module. [`suggest_inputs`] walks a directory, collects every `*.csproj`
//! project file and pairs it with each edge list named after the project,
//! so the results can be passed to `add` directly.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extension of the project files that name the modules to look for.
pub const PROJECT_EXTENSION: &str = "csproj";

/// File name suffix of edge-list files.
pub const EDGE_LIST_SUFFIX: &str = ".edges.json";

/// An edge-list file matched to the project it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub project_name: String,
    pub input_path: PathBuf,
}

/// Pairs every project file under `dir` with the matching edge-list files.
///
/// Names are compared case-insensitively. Suggestions are ordered by
/// project, then by path; a project with several builds (for example
/// `Debug` and `Release`) yields one suggestion per edge list.
pub fn suggest_inputs(dir: &Path) -> Result<Vec<Suggestion>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }
    let root = fs::canonicalize(dir)?;

    let mut projects = Vec::new();
    let mut edge_lists = Vec::new();
    for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(project) = project_name(path) {
            projects.push(project);
        } else if let Some(module) = module_name(path) {
            edge_lists.push((module, path.to_path_buf()));
        }
    }
    tracing::debug!(
        root = %root.display(),
        projects = projects.len(),
        edge_lists = edge_lists.len(),
        "scanned directory"
    );

    let mut suggestions = Vec::new();
    for project in projects {
        for (module, path) in &edge_lists {
            if module.eq_ignore_ascii_case(&project) {
                suggestions.push(Suggestion {
                    project_name: project.clone(),
                    input_path: path.clone(),
                });
            }
        }
    }
    Ok(suggestions)
}

fn project_name(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case(PROJECT_EXTENSION) {
        return None;
    }
    Some(path.file_stem()?.to_str()?.to_string())
}

fn module_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let split = file_name.len().checked_sub(EDGE_LIST_SUFFIX.len())?;
    let suffix = file_name.get(split..)?;
    if split == 0 || !suffix.eq_ignore_ascii_case(EDGE_LIST_SUFFIX) {
        return None;
    }
    Some(file_name[..split].to_string())
}

/// Version control and IDE state never holds build output.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(name.as_ref(), ".git" | ".vs" | ".idea")
}
