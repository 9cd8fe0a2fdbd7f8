// src/serializer/variants.rs

//! Variant numbering and the per-fragment transform pipeline

use crate::device::DeviceFilter;
use crate::error::{Error, Result};
use crate::hooks::{ArtifactType, ManifestModifier, ModificationDescriptor};
use crate::model::{Fragment, FragmentCategory, VariantKey};
use std::collections::{BTreeMap, HashSet};

/// Number every variant key consecutively from `first`, in key order
///
/// Numbers cover `[first, first + count)`; a range past `u32::MAX` is a
/// configuration error.
pub fn assign_variant_numbers<'k, I>(keys: I, first: u32) -> Result<BTreeMap<VariantKey, u32>>
where
    I: IntoIterator<Item = &'k VariantKey>,
{
    let mut sorted: Vec<&VariantKey> = keys.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    u32::try_from(sorted.len())
        .ok()
        .and_then(|count| first.checked_add(count))
        .ok_or_else(|| {
            Error::ConfigError(format!(
                "{} variants numbered from {} exceed the variant number range",
                sorted.len(),
                first
            ))
        })?;

    Ok(sorted
        .into_iter()
        .zip(0u32..)
        .map(|(key, offset)| (key.clone(), first + offset))
        .collect())
}

pub fn artifact_type(fragment: &Fragment) -> ArtifactType {
    if fragment.category == FragmentCategory::Standalone {
        ArtifactType::Standalone
    } else if fragment.is_master {
        ArtifactType::MasterSplit
    } else {
        ArtifactType::ConfigSplit
    }
}

pub fn modification_descriptor(fragment: &Fragment, variant_number: u32) -> ModificationDescriptor {
    ModificationDescriptor {
        is_base: fragment.is_base_module,
        artifact_type: artifact_type(fragment),
        variant_number,
        variant_targeting: fragment.variant_targeting.clone(),
        targeting: fragment.targeting.clone(),
    }
}

/// Apply the manifest modifier, then clear variant targeting
pub fn canonicalize(
    fragment: Fragment,
    variant_number: u32,
    modifier: &dyn ManifestModifier,
) -> Result<Fragment> {
    let descriptor = modification_descriptor(&fragment, variant_number);
    let manifest = modifier.modify_manifest(fragment.manifest.clone(), &descriptor)?;
    Ok(fragment.with_manifest(manifest).without_variant_targeting())
}

/// Filter and canonicalize every fragment, keeping the variant grouping
///
/// Variants whose fragments were all filtered out are dropped. Modifier and
/// matcher errors abort the whole pipeline.
pub fn canonical_fragments(
    by_variant: &BTreeMap<VariantKey, Vec<Fragment>>,
    numbers: &BTreeMap<VariantKey, u32>,
    filter: &DeviceFilter<'_>,
    modifier: &dyn ManifestModifier,
) -> Result<BTreeMap<VariantKey, Vec<Fragment>>> {
    let mut canonical: BTreeMap<VariantKey, Vec<Fragment>> = BTreeMap::new();

    for (key, fragments) in by_variant {
        let number = *numbers.get(key).ok_or_else(|| {
            Error::InvariantViolation(format!("No variant number assigned to {:?}", key))
        })?;

        for fragment in fragments {
            if !filter.test(fragment)? {
                continue;
            }
            canonical
                .entry(key.clone())
                .or_default()
                .push(canonicalize(fragment.clone(), number, modifier)?);
        }
    }

    Ok(canonical)
}

/// Distinct fragments across all variants, in first-occurrence order
pub fn distinct_fragments<'f, I>(fragments: I) -> Vec<&'f Fragment>
where
    I: IntoIterator<Item = &'f Fragment>,
{
    let mut seen = HashSet::new();
    fragments
        .into_iter()
        .filter(|fragment| seen.insert(*fragment))
        .collect()
}
