// src/archive/mod.rs

//! Directory-backed output archive
//!
//! Writes each artifact as a file below an output directory and the table
//! of contents as `toc.json` next to them. Artifacts carry the fragment
//! encoded as JSON; the packaged container format belongs to a different
//! writer.

pub mod paths;

pub use paths::StandardPathAssigner;

use crate::error::{Error, Result};
use crate::hooks::ArchiveWriter;
use crate::model::{ArchivePath, ArtifactDescriptor, ArtifactKind, Fragment};
use crate::toc::TableOfContents;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// File name of the table of contents inside the archive
pub const TOC_FILE: &str = "toc.json";

/// Location the single universal standalone is written to
pub const UNIVERSAL_PATH: &str = "universal.apk";

/// Archive writer storing artifacts in a directory tree
pub struct DirectoryArchive {
    root: PathBuf,
    written: Mutex<HashSet<ArchivePath>>,
}

impl DirectoryArchive {
    /// Create the output directory if needed and open it as an archive
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("Opened directory archive at {}", root.display());

        Ok(Self {
            root,
            written: Mutex::new(HashSet::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read back a table of contents written by `set_table_of_contents`
    pub fn read_table_of_contents(root: impl AsRef<Path>) -> Result<TableOfContents> {
        let file = File::open(root.as_ref().join(TOC_FILE))?;
        Ok(serde_json::from_reader(file)?)
    }

    fn reserve(&self, path: &ArchivePath) -> Result<()> {
        let mut written = self.written.lock().map_err(|_| Error::SerializationError {
            path: path.to_string(),
            message: "archive state poisoned by a failed writer".to_string(),
        })?;

        if !written.insert(path.clone()) {
            return Err(Error::SerializationError {
                path: path.to_string(),
                message: "path already written".to_string(),
            });
        }
        Ok(())
    }

    fn write_artifact(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
        kind: ArtifactKind,
    ) -> Result<ArtifactDescriptor> {
        check_relative(path)?;
        self.reserve(path)?;

        let payload = serde_json::to_vec(fragment)?;
        let dest = self.root.join(path.as_str());
        write_atomically(&dest, &payload).map_err(|e| Error::SerializationError {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let sha256 = format!("{:x}", Sha256::digest(&payload));
        debug!("Wrote {} ({} bytes, sha256 {})", path, payload.len(), sha256);

        Ok(ArtifactDescriptor {
            path: path.clone(),
            kind,
            targeting: fragment.targeting.clone(),
            split_id: fragment.manifest.split_id.clone(),
            is_master_split: fragment.is_master,
            size: payload.len() as u64,
            sha256,
        })
    }
}

/// Artifact paths must stay below the archive root
fn check_relative(path: &ArchivePath) -> Result<()> {
    let escapes = Path::new(path.as_str())
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));

    if escapes || path.as_str().is_empty() {
        return Err(Error::SerializationError {
            path: path.to_string(),
            message: "artifact path must be relative and stay inside the archive".to_string(),
        });
    }
    Ok(())
}

/// Write to a temporary file first, then rename into place
fn write_atomically(dest: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = dest.with_extension("tmp");
    let result = File::create(&temp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&temp_path, dest)
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

impl ArchiveWriter for DirectoryArchive {
    fn add_split(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::Split)
    }

    fn add_instant(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::Instant)
    }

    fn add_system(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::System)
    }

    fn add_standalone(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::Standalone)
    }

    fn add_standalone_universal(&self, fragment: &Fragment) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, &ArchivePath::new(UNIVERSAL_PATH), ArtifactKind::Universal)
    }

    fn add_asset_slice(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::AssetSlice)
    }

    fn add_hibernated(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor> {
        self.write_artifact(fragment, path, ArtifactKind::Hibernated)
    }

    fn set_table_of_contents(&self, toc: &TableOfContents) -> Result<()> {
        let payload = serde_json::to_vec_pretty(toc)?;
        write_atomically(&self.root.join(TOC_FILE), &payload)?;
        info!("Table of contents written to {}", self.root.join(TOC_FILE).display());
        Ok(())
    }
}
