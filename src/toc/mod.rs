// src/toc/mod.rs

//! Table of contents of a produced archive
//!
//! This structure is the compatibility surface of the archive: consumers
//! parse it to enumerate installable variants and asset slices. Artifact
//! descriptors are shared: every variant that needs a deduplicated fragment
//! holds the same `Arc`.

pub mod assembler;

pub use assembler::{assemble, asset_modules_info, default_targeting_values, tool_version};

use crate::config::OptimizationDimension;
use crate::model::{ArtifactDescriptor, ModuleMetadata, VariantTargeting};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// How an asset module reaches the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    InstallTime,
    OnDemand,
    FastFollow,
}

/// Artifacts of one module within a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub module_metadata: ModuleMetadata,
    pub descriptors: Vec<Arc<ArtifactDescriptor>>,
}

/// A set of artifacts installed together on matching devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub number: u32,
    pub targeting: VariantTargeting,
    pub artifact_sets: Vec<ArtifactSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantMetadata {
    pub is_instant: bool,
    /// Only set for instant-enabled modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<DeliveryType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetModuleMetadata {
    pub name: String,
    pub delivery_type: DeliveryType,
    pub instant_metadata: InstantMetadata,
}

/// Slices of one asset module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSliceSet {
    pub metadata: AssetModuleMetadata,
    pub descriptors: Vec<Arc<ArtifactDescriptor>>,
}

/// Value assumed for devices that do not report a split dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultTargetingValue {
    pub dimension: OptimizationDimension,
    pub default_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetModulesInfo {
    pub app_versions: Vec<i64>,
    pub asset_version_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTestingInfo {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub local_testing_path: String,
}

/// Final manifest of the archive, written once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub package_name: String,
    pub tool_version: semver::Version,
    pub variants: Vec<Variant>,
    pub asset_slice_sets: Vec<AssetSliceSet>,
    pub default_targeting_values: Vec<DefaultTargetingValue>,
    pub permanently_fused_modules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_modules_info: Option<AssetModulesInfo>,
    #[serde(default)]
    pub local_testing_info: LocalTestingInfo,
}

impl TableOfContents {
    /// Number of distinct artifacts referenced by the variants
    pub fn distinct_variant_artifacts(&self) -> usize {
        self.variants
            .iter()
            .flat_map(|v| &v.artifact_sets)
            .flat_map(|set| &set.descriptors)
            .map(|d| &d.path)
            .collect::<HashSet<_>>()
            .len()
    }
}
