// src/config.rs

//! Build configuration and serializer options
//!
//! `BuildConfig` is the slice of the bundle configuration the serializer
//! reads: split dimensions with their suffix stripping settings, and the
//! optional asset-modules configuration. It is plain serde data so build
//! plans can carry it as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Dimension along which splits are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationDimension {
    Abi,
    ScreenDensity,
    Language,
    TextureCompressionFormat,
    DeviceTier,
    CountrySet,
}

impl OptimizationDimension {
    pub fn as_str(&self) -> &str {
        match self {
            OptimizationDimension::Abi => "ABI",
            OptimizationDimension::ScreenDensity => "SCREEN_DENSITY",
            OptimizationDimension::Language => "LANGUAGE",
            OptimizationDimension::TextureCompressionFormat => "TEXTURE_COMPRESSION_FORMAT",
            OptimizationDimension::DeviceTier => "DEVICE_TIER",
            OptimizationDimension::CountrySet => "COUNTRY_SET",
        }
    }
}

/// Suffix stripping settings of a split dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixStripping {
    #[serde(default)]
    pub enabled: bool,
    /// Value assumed for devices that do not report this dimension
    #[serde(default)]
    pub default_suffix: String,
}

/// One configured split dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDimension {
    pub dimension: OptimizationDimension,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub suffix_stripping: Option<SuffixStripping>,
}

/// Asset module versioning configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetModulesConfig {
    #[serde(default)]
    pub app_versions: Vec<i64>,
    #[serde(default)]
    pub asset_version_tag: String,
}

/// Build configuration consumed by the serializer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub split_dimensions: Vec<SplitDimension>,
    #[serde(default)]
    pub asset_modules: Option<AssetModulesConfig>,
}

impl BuildConfig {
    /// Enabled suffix strippings keyed by dimension
    ///
    /// Negated dimensions are not split on, so they have nothing to strip.
    pub fn suffix_strippings(&self) -> BTreeMap<OptimizationDimension, SuffixStripping> {
        self.split_dimensions
            .iter()
            .filter(|dim| !dim.negate)
            .filter_map(|dim| match &dim.suffix_stripping {
                Some(stripping) if stripping.enabled => Some((dim.dimension, stripping.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Mode the fragments were generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildMode {
    #[default]
    Default,
    Universal,
    System,
    Persistent,
    Instant,
    Archive,
}

impl BuildMode {
    pub fn as_str(&self) -> &str {
        match self {
            BuildMode::Default => "default",
            BuildMode::Universal => "universal",
            BuildMode::System => "system",
            BuildMode::Persistent => "persistent",
            BuildMode::Instant => "instant",
            BuildMode::Archive => "archive",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(BuildMode::Default),
            "universal" => Ok(BuildMode::Universal),
            "system" => Ok(BuildMode::System),
            "persistent" => Ok(BuildMode::Persistent),
            "instant" => Ok(BuildMode::Instant),
            "archive" => Ok(BuildMode::Archive),
            _ => Err(format!("Invalid build mode: {}", s)),
        }
    }
}

/// Knobs of a serializer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Number given to the first variant
    pub first_variant_number: u32,
    /// Log every written artifact at info level
    pub verbose: bool,
    /// Worker threads used for serialization
    pub workers: usize,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            first_variant_number: 0,
            verbose: false,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}
