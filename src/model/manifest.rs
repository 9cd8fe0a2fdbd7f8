// src/model/manifest.rs

//! Embedded package manifest carried by each fragment

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A `<dist:delivery>`-style declaration of how a module is delivered
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeliveryElement {
    #[serde(default)]
    pub install_time: bool,
    #[serde(default)]
    pub on_demand: bool,
    #[serde(default)]
    pub fast_follow: bool,
}

impl DeliveryElement {
    pub fn on_demand() -> Self {
        Self {
            on_demand: true,
            ..Self::default()
        }
    }

    pub fn fast_follow() -> Self {
        Self {
            fast_follow: true,
            ..Self::default()
        }
    }

    pub fn install_time() -> Self {
        Self {
            install_time: true,
            ..Self::default()
        }
    }
}

/// Manifest of a fragment or module
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Manifest {
    pub package_name: String,
    #[serde(default)]
    pub version_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_id: Option<String>,
    /// The `instant` attribute of the module declaration
    #[serde(default)]
    pub instant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant_delivery: Option<DeliveryElement>,
    /// Free-form attributes, the surface manifest modifiers usually edit
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            ..Self::default()
        }
    }
}
