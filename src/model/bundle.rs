// src/model/bundle.rs

//! The bundle the fragments were generated from

use super::ModuleName;
use super::manifest::Manifest;
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kind of bundle module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    #[default]
    Feature,
    Asset,
}

/// Module description recorded next to each module's artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    pub module_type: ModuleType,
    pub is_instant: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// A module of the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleModule {
    pub name: ModuleName,
    #[serde(default)]
    pub module_type: ModuleType,
    pub manifest: Manifest,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl BundleModule {
    pub fn new(name: ModuleName, module_type: ModuleType, manifest: Manifest) -> Self {
        Self {
            name,
            module_type,
            manifest,
            dependencies: Vec::new(),
        }
    }

    /// Instant if the manifest sets the instant attribute or declares
    /// instant delivery
    pub fn is_instant(&self) -> bool {
        self.manifest.instant || self.manifest.instant_delivery.is_some()
    }

    pub fn metadata(&self) -> ModuleMetadata {
        ModuleMetadata {
            name: self.name.to_string(),
            module_type: self.module_type,
            is_instant: self.is_instant(),
            dependencies: self.dependencies.clone(),
        }
    }
}

/// Application bundle: package name, modules and build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub package_name: String,
    #[serde(default)]
    pub modules: Vec<BundleModule>,
    #[serde(default)]
    pub config: BuildConfig,
}

impl Bundle {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            modules: Vec::new(),
            config: BuildConfig::default(),
        }
    }

    /// Look up a module that fragments refer to
    pub fn module(&self, name: &ModuleName) -> Result<&BundleModule> {
        self.modules
            .iter()
            .find(|m| &m.name == name)
            .ok_or_else(|| {
                Error::InvariantViolation(format!("Module '{}' is not part of the bundle", name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliveryElement;

    #[test]
    fn test_instant_from_attribute_or_element() {
        let mut module = BundleModule::new(
            ModuleName::from("assets"),
            ModuleType::Asset,
            Manifest::new("com.example.app"),
        );
        assert!(!module.is_instant());

        module.manifest.instant = true;
        assert!(module.is_instant());

        module.manifest.instant = false;
        module.manifest.instant_delivery = Some(DeliveryElement::install_time());
        assert!(module.is_instant());
        assert!(module.metadata().is_instant);
    }

    #[test]
    fn test_unknown_module_is_invariant_violation() {
        let bundle = Bundle::new("com.example.app");
        let result = bundle.module(&ModuleName::from("missing"));
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }
}
