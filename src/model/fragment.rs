// src/model/fragment.rs

//! Fragments ("module splits") and the generated collections that hold them

use super::ModuleName;
use super::manifest::Manifest;
use super::targeting::{DeviceTargeting, VariantTargeting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of fragment produced by upstream generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FragmentCategory {
    Split,
    Instant,
    Standalone,
    System,
    AssetSlice,
    Hibernation,
}

impl FragmentCategory {
    pub fn as_str(&self) -> &str {
        match self {
            FragmentCategory::Split => "split",
            FragmentCategory::Instant => "instant",
            FragmentCategory::Standalone => "standalone",
            FragmentCategory::System => "system",
            FragmentCategory::AssetSlice => "asset_slice",
            FragmentCategory::Hibernation => "hibernation",
        }
    }
}

impl fmt::Display for FragmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FragmentCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "split" => Ok(FragmentCategory::Split),
            "instant" => Ok(FragmentCategory::Instant),
            "standalone" => Ok(FragmentCategory::Standalone),
            "system" => Ok(FragmentCategory::System),
            "asset_slice" => Ok(FragmentCategory::AssetSlice),
            "hibernation" => Ok(FragmentCategory::Hibernation),
            _ => Err(format!("Invalid fragment category: {}", s)),
        }
    }
}

/// A file inside a fragment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FragmentEntry {
    pub path: String,
    #[serde(default)]
    pub content: Vec<u8>,
}

/// A logical package or asset piece
///
/// Equality and hashing are structural over every field, which is what
/// deduplication relies on once variant targeting has been cleared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub module: ModuleName,
    pub category: FragmentCategory,
    #[serde(default)]
    pub variant_targeting: VariantTargeting,
    #[serde(default)]
    pub targeting: DeviceTargeting,
    #[serde(default)]
    pub is_base_module: bool,
    #[serde(default)]
    pub is_master: bool,
    pub manifest: Manifest,
    #[serde(default)]
    pub entries: Vec<FragmentEntry>,
}

impl Fragment {
    /// Create an untargeted fragment of the given module
    pub fn new(module: ModuleName, category: FragmentCategory, manifest: Manifest) -> Self {
        Self {
            is_base_module: module.is_base(),
            module,
            category,
            variant_targeting: VariantTargeting::default(),
            targeting: DeviceTargeting::default(),
            is_master: false,
            manifest,
            entries: Vec::new(),
        }
    }

    /// Key of the variant this fragment belongs to
    pub fn variant_key(&self) -> VariantKey {
        VariantKey {
            category: self.category,
            targeting: self.variant_targeting.clone(),
        }
    }

    /// Same fragment carrying a different manifest
    pub fn with_manifest(self, manifest: Manifest) -> Self {
        Self { manifest, ..self }
    }

    /// Canonical form used for deduplication
    pub fn without_variant_targeting(self) -> Self {
        Self {
            variant_targeting: VariantTargeting::default(),
            ..self
        }
    }
}

/// Grouping key of an installable variant
///
/// Ordered by category first, then by targeting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub category: FragmentCategory,
    pub targeting: VariantTargeting,
}

/// Fragments generated for one run, across all categories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedFragments {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl GeneratedFragments {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Whether any fragment of the category was generated
    pub fn has(&self, category: FragmentCategory) -> bool {
        self.fragments.iter().any(|f| f.category == category)
    }

    /// All fragments grouped by variant key, keys in their total order and
    /// fragments in input order
    pub fn grouped_by_variant(&self) -> BTreeMap<VariantKey, Vec<Fragment>> {
        let mut groups: BTreeMap<VariantKey, Vec<Fragment>> = BTreeMap::new();
        for fragment in &self.fragments {
            groups
                .entry(fragment.variant_key())
                .or_default()
                .push(fragment.clone());
        }
        groups
    }
}

/// Standalone asset slices generated for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedAssetSlices {
    #[serde(default)]
    pub slices: Vec<Fragment>,
}

impl GeneratedAssetSlices {
    pub fn new(slices: Vec<Fragment>) -> Self {
        Self { slices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(module: &str, sdk: u32) -> Fragment {
        let mut fragment = Fragment::new(
            ModuleName::from(module),
            FragmentCategory::Split,
            Manifest::new("com.example.app"),
        );
        fragment.variant_targeting = VariantTargeting::sdk(sdk);
        fragment
    }

    #[test]
    fn test_canonical_form_ignores_variant_targeting() {
        let a = split("base", 21).without_variant_targeting();
        let b = split("base", 26).without_variant_targeting();
        assert_eq!(a, b);
        assert_ne!(split("base", 21), split("base", 26));
    }

    #[test]
    fn test_grouped_by_variant_is_ordered() {
        let generated = GeneratedFragments::new(vec![
            split("base", 26),
            split("feature", 21),
            split("base", 21),
        ]);

        let groups = generated.grouped_by_variant();
        let keys: Vec<_> = groups.keys().map(|k| k.targeting.min_sdk).collect();
        assert_eq!(keys, vec![Some(21), Some(26)]);

        let sdk21 = &groups[&split("base", 21).variant_key()];
        let modules: Vec<_> = sdk21.iter().map(|f| f.module.as_str()).collect();
        assert_eq!(modules, vec!["feature", "base"]);
    }

    #[test]
    fn test_base_module_flag_follows_name() {
        assert!(split("base", 21).is_base_module);
        assert!(!split("feature", 21).is_base_module);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "asset_slice".parse::<FragmentCategory>().unwrap(),
            FragmentCategory::AssetSlice
        );
        assert!("apk".parse::<FragmentCategory>().is_err());
    }
}
