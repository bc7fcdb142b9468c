use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::analysis::AllocationPlan;
use crate::error::IoError;

/// What an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// All records of one category
    Branch,
    /// One round-robin group
    RoundRobinGroup,
    /// One uniform group
    UniformGroup,
    /// Category-count-by-group summary
    Stats,
}

/// A named CSV table ready to be handed out or written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub contents: String,
}

/// Summary of a run, written next to the artifacts as `manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub generated_at: String,
    pub group_count: usize,
    pub group_size: usize,
    pub total_records: usize,
    pub categories: Vec<CategoryEntry>,
    pub round_robin_group_sizes: Vec<usize>,
    pub uniform_group_sizes: Vec<usize>,
    pub uniform_plan: AllocationPlan,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub code: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestFile {
    pub name: String,
    pub kind: ArtifactKind,
}

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// An artifact name must land directly inside the output directory.
///
/// Category codes come straight from the input, so a code like `/x` would
/// otherwise point the file into a subdirectory.
fn check_artifact_name(name: &str) -> Result<(), IoError> {
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\']);

    if plain {
        Ok(())
    } else {
        Err(IoError::InvalidArtifactName {
            name: name.to_string(),
        })
    }
}

/// Write one file through a temporary sibling so a reader never sees it half-written
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|source| IoError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Write every artifact, then the manifest, into `output_dir`.
///
/// All contents are already rendered in memory and every name is checked
/// before the first write, so a bad name leaves the filesystem untouched.
/// Creates `output_dir` if needed and overwrites files with the same names.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` with the written paths, manifest last
/// * `Err(IoError::InvalidArtifactName)` if a name is not a plain file name
/// * `Err(IoError)` on the first filesystem failure
pub fn write_artifacts(
    output_dir: &Path,
    artifacts: &[Artifact],
    manifest: &Manifest,
) -> Result<Vec<PathBuf>, IoError> {
    for artifact in artifacts {
        check_artifact_name(&artifact.name)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;

    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(artifacts.len() + 1);
    for artifact in artifacts {
        let path = output_dir.join(&artifact.name);
        write_atomic(&path, artifact.contents.as_bytes())?;
        debug!("Wrote {:?} ({} bytes)", path, artifact.contents.len());
        written.push(path);
    }

    let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
    write_atomic(&manifest_path, json.as_bytes())?;
    written.push(manifest_path);

    info!(
        "Wrote {} artifacts and manifest to {:?}",
        artifacts.len(),
        output_dir
    );
    Ok(written)
}
