// src/device/mod.rs

//! Device descriptors and device-targeted filtering
//!
//! Matching a fragment against a device is delegated to a `DeviceMatcher`
//! supplied by the caller; this module only decides when the matcher is
//! consulted and with which (tier-defaulted) descriptor.

pub mod filter;
pub mod tier;

pub use filter::DeviceFilter;
pub use tier::with_default_device_tier;

use crate::error::Result;
use crate::model::Fragment;
use serde::{Deserialize, Serialize};

/// Capabilities of one concrete device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    #[serde(default)]
    pub sdk_version: u32,
    #[serde(default)]
    pub abis: Vec<String>,
    #[serde(default)]
    pub screen_density: u32,
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default)]
    pub texture_formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_tier: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_set: Option<String>,
}

/// Decides whether a fragment should be delivered to a device
pub trait DeviceMatcher: Send + Sync {
    fn matches(&self, fragment: &Fragment, device: &DeviceSpec) -> Result<bool>;
}

/// Matcher that accepts every fragment
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DeviceMatcher for AcceptAll {
    fn matches(&self, _fragment: &Fragment, _device: &DeviceSpec) -> Result<bool> {
        Ok(true)
    }
}
