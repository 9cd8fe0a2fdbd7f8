// src/hooks.rs

//! Collaborator interfaces the serializer is wired with
//!
//! The archive writer, path policy, manifest modifier and finalization
//! listener are injected by the caller. Modifier and listener have no-op
//! defaults.

use crate::error::Result;
use crate::model::{
    ArchivePath, ArtifactDescriptor, DeviceTargeting, Fragment, Manifest, VariantTargeting,
};
use crate::toc::TableOfContents;
use serde::{Deserialize, Serialize};

/// Writes fragments into the output archive
///
/// Implementations are called concurrently from worker threads and must
/// serialize access to shared state themselves.
pub trait ArchiveWriter: Send + Sync {
    fn add_split(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor>;

    fn add_instant(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor>;

    fn add_system(&self, fragment: &Fragment, path: &ArchivePath) -> Result<ArtifactDescriptor>;

    fn add_standalone(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor>;

    /// Universal builds have a single standalone whose location the writer picks
    fn add_standalone_universal(&self, fragment: &Fragment) -> Result<ArtifactDescriptor>;

    fn add_asset_slice(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor>;

    fn add_hibernated(
        &self,
        fragment: &Fragment,
        path: &ArchivePath,
    ) -> Result<ArtifactDescriptor>;

    /// Persist the final table of contents
    fn set_table_of_contents(&self, toc: &TableOfContents) -> Result<()>;
}

/// Decides where in the archive a fragment is written
///
/// Within one run, the same fragment must always get the same path.
pub trait PathAssigner: Send + Sync {
    /// Called once at the start of every run
    fn start_run(&self) {}

    fn path(&self, fragment: &Fragment) -> ArchivePath;
}

/// Artifact type as seen by manifest modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactType {
    Standalone,
    MasterSplit,
    ConfigSplit,
}

/// What a manifest modifier is told about the fragment it edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationDescriptor {
    pub is_base: bool,
    pub artifact_type: ArtifactType,
    pub variant_number: u32,
    pub variant_targeting: VariantTargeting,
    pub targeting: DeviceTargeting,
}

/// Rewrites a fragment's manifest before it is written
pub trait ManifestModifier: Send + Sync {
    fn modify_manifest(
        &self,
        manifest: Manifest,
        descriptor: &ModificationDescriptor,
    ) -> Result<Manifest>;
}

/// Modifier that returns the manifest untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpModifier;

impl ManifestModifier for NoOpModifier {
    fn modify_manifest(
        &self,
        manifest: Manifest,
        _descriptor: &ModificationDescriptor,
    ) -> Result<Manifest> {
        Ok(manifest)
    }
}

/// Notified after each artifact is written
///
/// Errors are logged by the serializer and never fail the write.
pub trait FinalizationListener: Send + Sync {
    fn on_finalized(&self, descriptor: &ArtifactDescriptor) -> Result<()>;
}

/// Listener that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl FinalizationListener for NoOpListener {
    fn on_finalized(&self, _descriptor: &ArtifactDescriptor) -> Result<()> {
        Ok(())
    }
}
