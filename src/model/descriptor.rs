// src/model/descriptor.rs

//! Records of physically written artifacts

use super::targeting::DeviceTargeting;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of an artifact inside the output archive
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchivePath(String);

impl ArchivePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an artifact was added to the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactKind {
    Split,
    Instant,
    Standalone,
    Universal,
    System,
    AssetSlice,
    Hibernated,
}

/// Where and how a fragment was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub path: ArchivePath,
    pub kind: ArtifactKind,
    #[serde(default)]
    pub targeting: DeviceTargeting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_id: Option<String>,
    #[serde(default)]
    pub is_master_split: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha256: String,
}
