// src/serializer/assets.rs

//! Asset module metadata and per-module grouping of asset slices

use crate::model::{ArtifactDescriptor, BundleModule, DeliveryElement, ModuleName};
use crate::toc::{AssetModuleMetadata, DeliveryType, InstantMetadata};
use std::sync::Arc;

/// Delivery type declared by a delivery element
///
/// On-demand wins over fast-follow; anything else is install-time.
pub fn delivery_type(element: &DeliveryElement) -> DeliveryType {
    if element.on_demand {
        DeliveryType::OnDemand
    } else if element.fast_follow {
        DeliveryType::FastFollow
    } else {
        DeliveryType::InstallTime
    }
}

/// Delivery metadata of an asset module, derived from its manifest
pub fn asset_module_metadata(module: &BundleModule) -> AssetModuleMetadata {
    let manifest = &module.manifest;
    let is_instant = module.is_instant();

    // Instant modules without an explicit instant delivery are on-demand
    let instant_delivery = is_instant.then(|| {
        manifest
            .instant_delivery
            .as_ref()
            .map(delivery_type)
            .unwrap_or(DeliveryType::OnDemand)
    });

    AssetModuleMetadata {
        name: module.name.to_string(),
        delivery_type: manifest
            .delivery
            .as_ref()
            .map(delivery_type)
            .unwrap_or(DeliveryType::InstallTime),
        instant_metadata: InstantMetadata {
            is_instant,
            delivery_type: instant_delivery,
        },
    }
}

/// Group descriptors by owning module, modules in first-encounter order
pub fn group_by_module<'m, I>(written: I) -> Vec<(ModuleName, Vec<Arc<ArtifactDescriptor>>)>
where
    I: IntoIterator<Item = (&'m ModuleName, Arc<ArtifactDescriptor>)>,
{
    let mut groups: Vec<(ModuleName, Vec<Arc<ArtifactDescriptor>>)> = Vec::new();
    for (module, descriptor) in written {
        match groups.iter_mut().find(|(name, _)| name == module) {
            Some((_, descriptors)) => descriptors.push(descriptor),
            None => groups.push((module.clone(), vec![descriptor])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArchivePath, ArtifactKind, Manifest, ModuleType};

    fn asset_module(manifest: Manifest) -> BundleModule {
        BundleModule::new(ModuleName::from("textures"), ModuleType::Asset, manifest)
    }

    fn descriptor(path: &str) -> Arc<ArtifactDescriptor> {
        Arc::new(ArtifactDescriptor {
            path: ArchivePath::new(path),
            kind: ArtifactKind::AssetSlice,
            targeting: Default::default(),
            split_id: None,
            is_master_split: false,
            size: 0,
            sha256: String::new(),
        })
    }

    #[test]
    fn test_delivery_type_precedence() {
        assert_eq!(delivery_type(&DeliveryElement::default()), DeliveryType::InstallTime);
        assert_eq!(delivery_type(&DeliveryElement::fast_follow()), DeliveryType::FastFollow);
        let both = DeliveryElement {
            on_demand: true,
            fast_follow: true,
            install_time: false,
        };
        assert_eq!(delivery_type(&both), DeliveryType::OnDemand);
    }

    #[test]
    fn test_on_demand_instant_module_without_instant_element() {
        let mut manifest = Manifest::new("com.example.app");
        manifest.delivery = Some(DeliveryElement::on_demand());
        manifest.instant = true;

        let metadata = asset_module_metadata(&asset_module(manifest));

        assert_eq!(metadata.name, "textures");
        assert_eq!(metadata.delivery_type, DeliveryType::OnDemand);
        assert!(metadata.instant_metadata.is_instant);
        assert_eq!(
            metadata.instant_metadata.delivery_type,
            Some(DeliveryType::OnDemand)
        );
    }

    #[test]
    fn test_module_without_delivery_is_install_time() {
        let metadata = asset_module_metadata(&asset_module(Manifest::new("com.example.app")));
        assert_eq!(metadata.delivery_type, DeliveryType::InstallTime);
        assert!(!metadata.instant_metadata.is_instant);
        assert_eq!(metadata.instant_metadata.delivery_type, None);
    }

    #[test]
    fn test_explicit_instant_delivery_is_used() {
        let mut manifest = Manifest::new("com.example.app");
        manifest.delivery = Some(DeliveryElement::fast_follow());
        manifest.instant_delivery = Some(DeliveryElement::install_time());

        let metadata = asset_module_metadata(&asset_module(manifest));

        assert_eq!(metadata.delivery_type, DeliveryType::FastFollow);
        assert!(metadata.instant_metadata.is_instant);
        assert_eq!(
            metadata.instant_metadata.delivery_type,
            Some(DeliveryType::InstallTime)
        );
    }

    #[test]
    fn test_group_by_module_keeps_encounter_order() {
        let textures = ModuleName::from("textures");
        let sounds = ModuleName::from("sounds");
        let groups = group_by_module(vec![
            (&textures, descriptor("a")),
            (&sounds, descriptor("b")),
            (&textures, descriptor("c")),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, textures);
        let paths: Vec<_> = groups[0].1.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "c"]);
        assert_eq!(groups[1].0, sounds);
    }
}
