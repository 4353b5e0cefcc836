//! Loading submissions and assessment definitions from JSON files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use certscore_core::{Assessment, Submission};

/// An assessment definition file: either a full submission or the bare
/// assessment.
#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Submission(Submission),
    Assessment(Assessment),
}

fn parse_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse one submission file.
pub fn load_submission(path: &Path) -> Result<Submission> {
    parse_json_file(path)
}

/// Parse one assessment definition file.
pub fn load_assessment(path: &Path) -> Result<Assessment> {
    Ok(match parse_json_file::<DefinitionFile>(path)? {
        DefinitionFile::Submission(s) => s.assessment_data,
        DefinitionFile::Assessment(a) => a,
    })
}

/// Load a single file, or every `.json` file under a directory.
///
/// Inside a directory, files that fail to parse are skipped with a warning;
/// a single explicit file that fails is an error.
pub fn load_tree<T, F>(path: &Path, load: F) -> Result<Vec<(PathBuf, T)>>
where
    F: Fn(&Path) -> Result<T> + Copy,
{
    if path.is_dir() {
        let mut items = Vec::new();
        load_directory(path, load, &mut items)?;
        items.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(items)
    } else {
        Ok(vec![(path.to_path_buf(), load(path)?)])
    }
}

fn load_directory<T, F>(dir: &Path, load: F, items: &mut Vec<(PathBuf, T)>) -> Result<()>
where
    F: Fn(&Path) -> Result<T> + Copy,
{
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            load_directory(&path, load, items)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load(&path) {
                Ok(item) => items.push((path, item)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}
