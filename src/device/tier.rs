// src/device/tier.rs

//! Device tier defaulting

use super::DeviceSpec;
use crate::config::{OptimizationDimension, SuffixStripping};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Fill in the configured default device tier when the device reports none
///
/// A device that already has a tier, or a build without device tier suffix
/// stripping, is returned unchanged. An empty default suffix means tier 0.
pub fn with_default_device_tier(
    device: DeviceSpec,
    suffix_strippings: &BTreeMap<OptimizationDimension, SuffixStripping>,
) -> Result<DeviceSpec> {
    if device.device_tier.is_some() {
        return Ok(device);
    }

    let Some(stripping) = suffix_strippings.get(&OptimizationDimension::DeviceTier) else {
        return Ok(device);
    };

    let tier = if stripping.default_suffix.is_empty() {
        0
    } else {
        stripping.default_suffix.parse::<i32>().map_err(|e| {
            Error::ConfigError(format!(
                "Invalid default device tier '{}': {}",
                stripping.default_suffix, e
            ))
        })?
    };

    Ok(DeviceSpec {
        device_tier: Some(tier),
        ..device
    })
}
