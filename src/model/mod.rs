// src/model/mod.rs

//! Data model shared by the serializer pipelines
//!
//! Fragments arrive from upstream generation and are never mutated in place:
//! every transform consumes a fragment and returns a new value.

pub mod bundle;
pub mod descriptor;
pub mod fragment;
pub mod manifest;
pub mod targeting;

pub use bundle::{Bundle, BundleModule, ModuleMetadata, ModuleType};
pub use descriptor::{ArchivePath, ArtifactDescriptor, ArtifactKind};
pub use fragment::{
    Fragment, FragmentCategory, FragmentEntry, GeneratedAssetSlices, GeneratedFragments,
    VariantKey,
};
pub use manifest::{DeliveryElement, Manifest};
pub use targeting::{DeviceTargeting, VariantTargeting};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a bundle module ("base", "feature1", "assets_pack"...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the base module
    pub fn is_base(&self) -> bool {
        self.0 == "base"
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
