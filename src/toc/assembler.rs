// src/toc/assembler.rs

//! Aggregates pipeline results into the table of contents

use super::{
    AssetModulesInfo, AssetSliceSet, DefaultTargetingValue, LocalTestingInfo, TableOfContents,
    Variant,
};
use crate::config::{AssetModulesConfig, BuildConfig};
use crate::error::{Error, Result};
use crate::model::{Bundle, ModuleName};

/// Version of this tool as recorded in tables of contents
pub fn tool_version() -> Result<semver::Version> {
    semver::Version::parse(env!("CARGO_PKG_VERSION"))
        .map_err(|e| Error::InvariantViolation(format!("Invalid tool version: {}", e)))
}

/// One entry per split dimension declaring suffix stripping, in config order
pub fn default_targeting_values(config: &BuildConfig) -> Vec<DefaultTargetingValue> {
    config
        .split_dimensions
        .iter()
        .filter_map(|dim| {
            dim.suffix_stripping
                .as_ref()
                .map(|stripping| DefaultTargetingValue {
                    dimension: dim.dimension,
                    default_value: stripping.default_suffix.clone(),
                })
        })
        .collect()
}

pub fn asset_modules_info(config: &AssetModulesConfig) -> AssetModulesInfo {
    AssetModulesInfo {
        app_versions: config.app_versions.clone(),
        asset_version_tag: config.asset_version_tag.clone(),
    }
}

/// Build the table of contents from already-serialized variants and slices
pub fn assemble(
    bundle: &Bundle,
    variants: Vec<Variant>,
    asset_slice_sets: Vec<AssetSliceSet>,
    permanently_fused_modules: &[ModuleName],
    local_testing_info: LocalTestingInfo,
) -> Result<TableOfContents> {
    Ok(TableOfContents {
        package_name: bundle.package_name.clone(),
        tool_version: tool_version()?,
        variants,
        asset_slice_sets,
        default_targeting_values: default_targeting_values(&bundle.config),
        permanently_fused_modules: permanently_fused_modules
            .iter()
            .map(|m| m.to_string())
            .collect(),
        asset_modules_info: bundle.config.asset_modules.as_ref().map(asset_modules_info),
        local_testing_info,
    })
}
