// src/device/filter.rs

//! Pass/fail predicate over fragments for an optional target device

use super::{DeviceMatcher, DeviceSpec, with_default_device_tier};
use crate::config::{BuildMode, OptimizationDimension, SuffixStripping};
use crate::error::Result;
use crate::model::Fragment;
use std::collections::BTreeMap;

/// Predicate deciding which fragments exist for this run
pub struct DeviceFilter<'a> {
    target: Option<(&'a dyn DeviceMatcher, DeviceSpec)>,
}

impl<'a> DeviceFilter<'a> {
    /// Filter that accepts every fragment
    pub fn accept_all() -> Self {
        Self { target: None }
    }

    /// Filter for ordinary fragments
    ///
    /// System builds produce a fused artifact plus language splits that
    /// must survive even when they do not match, so they are never filtered.
    pub fn for_fragments(
        device: Option<&DeviceSpec>,
        mode: BuildMode,
        matcher: &'a dyn DeviceMatcher,
        suffix_strippings: &BTreeMap<OptimizationDimension, SuffixStripping>,
    ) -> Result<Self> {
        match device {
            Some(device) if mode != BuildMode::System => {
                Self::for_device(device, matcher, suffix_strippings)
            }
            _ => Ok(Self::accept_all()),
        }
    }

    /// Filter for asset slices; any supplied device always filters
    pub fn for_asset_slices(
        device: Option<&DeviceSpec>,
        matcher: &'a dyn DeviceMatcher,
        suffix_strippings: &BTreeMap<OptimizationDimension, SuffixStripping>,
    ) -> Result<Self> {
        match device {
            Some(device) => Self::for_device(device, matcher, suffix_strippings),
            None => Ok(Self::accept_all()),
        }
    }

    fn for_device(
        device: &DeviceSpec,
        matcher: &'a dyn DeviceMatcher,
        suffix_strippings: &BTreeMap<OptimizationDimension, SuffixStripping>,
    ) -> Result<Self> {
        let device = with_default_device_tier(device.clone(), suffix_strippings)?;
        Ok(Self {
            target: Some((matcher, device)),
        })
    }

    /// Device the matcher is consulted with, after tier defaulting
    pub fn device(&self) -> Option<&DeviceSpec> {
        self.target.as_ref().map(|(_, device)| device)
    }

    pub fn test(&self, fragment: &Fragment) -> Result<bool> {
        match &self.target {
            Some((matcher, device)) => matcher.matches(fragment, device),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{FragmentCategory, Manifest, ModuleName};

    struct RejectAll;

    impl DeviceMatcher for RejectAll {
        fn matches(&self, _fragment: &Fragment, _device: &DeviceSpec) -> Result<bool> {
            Ok(false)
        }
    }

    struct Broken;

    impl DeviceMatcher for Broken {
        fn matches(&self, fragment: &Fragment, _device: &DeviceSpec) -> Result<bool> {
            Err(Error::MatcherError(format!("cannot match {}", fragment.module)))
        }
    }

    fn fragment() -> Fragment {
        Fragment::new(
            ModuleName::from("base"),
            FragmentCategory::Split,
            Manifest::new("com.example.app"),
        )
    }

    #[test]
    fn test_no_device_accepts_everything() {
        let filter =
            DeviceFilter::for_fragments(None, BuildMode::Default, &RejectAll, &BTreeMap::new())
                .unwrap();
        assert!(filter.test(&fragment()).unwrap());
        assert!(filter.device().is_none());
    }

    #[test]
    fn test_system_mode_bypasses_device() {
        let device = DeviceSpec::default();
        let filter = DeviceFilter::for_fragments(
            Some(&device),
            BuildMode::System,
            &RejectAll,
            &BTreeMap::new(),
        )
        .unwrap();
        assert!(filter.test(&fragment()).unwrap());
    }

    #[test]
    fn test_asset_slices_filtered_regardless_of_mode() {
        let device = DeviceSpec::default();
        let filter =
            DeviceFilter::for_asset_slices(Some(&device), &RejectAll, &BTreeMap::new()).unwrap();
        assert!(!filter.test(&fragment()).unwrap());
    }

    #[test]
    fn test_device_is_tier_defaulted() {
        let strippings = BTreeMap::from([(
            OptimizationDimension::DeviceTier,
            SuffixStripping {
                enabled: true,
                default_suffix: "2".to_string(),
            },
        )]);
        let device = DeviceSpec::default();
        let filter = DeviceFilter::for_fragments(
            Some(&device),
            BuildMode::Default,
            &RejectAll,
            &strippings,
        )
        .unwrap();
        assert_eq!(filter.device().unwrap().device_tier, Some(2));
    }

    #[test]
    fn test_matcher_errors_propagate() {
        let device = DeviceSpec::default();
        let filter =
            DeviceFilter::for_fragments(Some(&device), BuildMode::Default, &Broken, &BTreeMap::new())
                .unwrap();
        assert!(matches!(
            filter.test(&fragment()),
            Err(Error::MatcherError(_))
        ));
    }
}
