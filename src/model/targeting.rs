// src/model/targeting.rs

//! Targeting axes of a fragment
//!
//! `VariantTargeting` selects the variant a fragment is installed in;
//! `DeviceTargeting` selects which devices within a variant receive it.

use serde::{Deserialize, Serialize};

/// Variant-level targeting, the grouping key for installable variants
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantTargeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abis: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screen_densities: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texture_formats: Vec<String>,
}

impl VariantTargeting {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Targeting of a variant bounded only by a minimum SDK
    pub fn sdk(min_sdk: u32) -> Self {
        Self {
            min_sdk: Some(min_sdk),
            ..Self::default()
        }
    }
}

/// Device-dimension targeting of a single fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceTargeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_density: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_tier: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_set: Option<String>,
}

impl DeviceTargeting {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// File name suffix describing this targeting, e.g. `arm64_v8a_xhdpi`
    ///
    /// Returns `None` when no dimension is targeted.
    pub fn suffix(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(abi) = &self.abi {
            parts.push(abi.replace('-', "_"));
        }
        if let Some(density) = self.screen_density {
            parts.push(density_name(density));
        }
        if let Some(language) = &self.language {
            parts.push(language.clone());
        }
        if let Some(format) = &self.texture_format {
            parts.push(format.clone());
        }
        if let Some(tier) = self.device_tier {
            parts.push(format!("tier_{}", tier));
        }
        if let Some(country_set) = &self.country_set {
            parts.push(format!("countries_{}", country_set));
        }
        if let Some(sdk) = self.min_sdk {
            parts.push(format!("sdk{}", sdk));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("_"))
        }
    }
}

/// Conventional bucket name of a screen density in dpi
fn density_name(dpi: u32) -> String {
    match dpi {
        120 => "ldpi".to_string(),
        160 => "mdpi".to_string(),
        213 => "tvdpi".to_string(),
        240 => "hdpi".to_string(),
        320 => "xhdpi".to_string(),
        480 => "xxhdpi".to_string(),
        640 => "xxxhdpi".to_string(),
        other => format!("{}dpi", other),
    }
}
