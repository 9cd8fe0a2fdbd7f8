// src/serializer/mod.rs

//! Serializes generated fragments into an archive and builds its table of contents
//!
//! A run goes through these steps:
//! - Validate fragment categories against the build mode
//! - Number variants in variant-key order, before any parallel work
//! - Filter, modify and canonicalize fragments on the calling thread
//! - Write each distinct canonical fragment once, on the worker pool
//! - Re-key results from the input structure and assemble the table of contents
//!
//! The table of contents is only handed to the archive writer after every
//! write has succeeded.

pub mod assets;
pub mod pool;
pub mod validate;
pub mod variants;

pub use pool::WorkerPool;
pub use validate::validate_input;

use crate::config::{BuildMode, SerializerOptions};
use crate::device::{AcceptAll, DeviceFilter, DeviceMatcher, DeviceSpec};
use crate::error::{Error, Result};
use crate::hooks::{
    ArchiveWriter, FinalizationListener, ManifestModifier, NoOpListener, NoOpModifier,
    PathAssigner,
};
use crate::model::{
    ArchivePath, ArtifactDescriptor, Bundle, Fragment, FragmentCategory, GeneratedAssetSlices,
    GeneratedFragments, ModuleName,
};
use crate::toc::{self, ArtifactSet, AssetSliceSet, LocalTestingInfo, TableOfContents, Variant};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one run of the serializer consumes
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub fragments: GeneratedFragments,
    pub asset_slices: GeneratedAssetSlices,
    pub mode: BuildMode,
    /// Concrete device to build for; `None` builds for the whole fleet
    pub device: Option<DeviceSpec>,
    pub local_testing_info: LocalTestingInfo,
    pub permanently_fused_modules: Vec<ModuleName>,
}

/// Serializer for one bundle, wired with its collaborators
pub struct SerializerManager {
    bundle: Bundle,
    options: SerializerOptions,
    paths: Box<dyn PathAssigner>,
    modifier: Box<dyn ManifestModifier>,
    listener: Box<dyn FinalizationListener>,
    matcher: Box<dyn DeviceMatcher>,
    pool: WorkerPool,
}

impl SerializerManager {
    /// Create a manager with no-op modifier and listener and a pass-all matcher
    pub fn new(
        bundle: Bundle,
        options: SerializerOptions,
        paths: impl PathAssigner + 'static,
    ) -> Result<Self> {
        let pool = WorkerPool::new(options.workers)?;
        debug!(
            "Created serializer for {} with {} workers",
            bundle.package_name,
            pool.workers()
        );

        Ok(Self {
            bundle,
            options,
            paths: Box::new(paths),
            modifier: Box::new(NoOpModifier),
            listener: Box::new(NoOpListener),
            matcher: Box::new(AcceptAll),
            pool,
        })
    }

    pub fn with_modifier(mut self, modifier: impl ManifestModifier + 'static) -> Self {
        self.modifier = Box::new(modifier);
        self
    }

    pub fn with_listener(mut self, listener: impl FinalizationListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn with_matcher(mut self, matcher: impl DeviceMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Write every needed artifact and then the table of contents
    ///
    /// Any failure aborts the run before the table of contents is written.
    pub fn populate(
        &self,
        writer: &dyn ArchiveWriter,
        request: &BuildRequest,
    ) -> Result<TableOfContents> {
        info!(
            "Serializing {} fragments and {} asset slices for {} ({} mode)",
            request.fragments.fragments.len(),
            request.asset_slices.slices.len(),
            self.bundle.package_name,
            request.mode
        );

        self.paths.start_run();
        let variants = self.serialize_fragments(
            writer,
            &request.fragments,
            request.mode,
            request.device.as_ref(),
        )?;
        let asset_slice_sets = self.serialize_asset_slices(
            writer,
            &request.asset_slices,
            request.device.as_ref(),
            request.mode,
        )?;

        let toc = toc::assemble(
            &self.bundle,
            variants,
            asset_slice_sets,
            &request.permanently_fused_modules,
            request.local_testing_info.clone(),
        )?;
        writer.set_table_of_contents(&toc)?;

        info!(
            "Wrote table of contents with {} variants and {} asset slice sets",
            toc.variants.len(),
            toc.asset_slice_sets.len()
        );
        Ok(toc)
    }

    /// Serialize ordinary fragments, returning one entry per surviving variant
    pub fn serialize_fragments(
        &self,
        writer: &dyn ArchiveWriter,
        generated: &GeneratedFragments,
        mode: BuildMode,
        device: Option<&DeviceSpec>,
    ) -> Result<Vec<Variant>> {
        validate_input(generated, mode)?;

        let strippings = self.bundle.config.suffix_strippings();
        let filter =
            DeviceFilter::for_fragments(device, mode, self.matcher.as_ref(), &strippings)?;

        let by_variant = generated.grouped_by_variant();
        let numbers =
            variants::assign_variant_numbers(by_variant.keys(), self.options.first_variant_number)?;

        let canonical = variants::canonical_fragments(
            &by_variant,
            &numbers,
            &filter,
            self.modifier.as_ref(),
        )?;

        // Variants can share canonical fragments; each is written once
        let distinct = variants::distinct_fragments(canonical.values().flatten());
        debug!(
            "{} fragments in {} variants reduce to {} distinct artifacts",
            canonical.values().map(Vec::len).sum::<usize>(),
            canonical.len(),
            distinct.len()
        );

        let jobs: Vec<(&Fragment, ArchivePath)> = distinct
            .into_iter()
            .map(|fragment| (fragment, self.paths.path(fragment)))
            .collect();
        let written = self
            .pool
            .join_all(&jobs, |(fragment, path)| self.write(writer, fragment, path, mode))?;

        let descriptors: HashMap<&Fragment, Arc<ArtifactDescriptor>> = jobs
            .iter()
            .map(|(fragment, _)| *fragment)
            .zip(written.into_iter().map(Arc::new))
            .collect();

        let mut result = Vec::with_capacity(canonical.len());
        for (key, fragments) in &canonical {
            let number = numbers.get(key).copied().ok_or_else(|| {
                Error::InvariantViolation(format!("No variant number assigned to {:?}", key))
            })?;

            let mut by_module: BTreeMap<&ModuleName, Vec<Arc<ArtifactDescriptor>>> =
                BTreeMap::new();
            for fragment in fragments {
                let descriptor = descriptors.get(fragment).cloned().ok_or_else(|| {
                    Error::InvariantViolation(format!(
                        "No artifact was written for a fragment of module '{}'",
                        fragment.module
                    ))
                })?;
                by_module.entry(&fragment.module).or_default().push(descriptor);
            }

            let artifact_sets = by_module
                .into_iter()
                .map(|(module, descriptors)| {
                    Ok(ArtifactSet {
                        module_metadata: self.bundle.module(module)?.metadata(),
                        descriptors,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            result.push(Variant {
                number,
                targeting: key.targeting.clone(),
                artifact_sets,
            });
        }

        Ok(result)
    }

    /// Serialize standalone asset slices, one set per asset module
    pub fn serialize_asset_slices(
        &self,
        writer: &dyn ArchiveWriter,
        generated: &GeneratedAssetSlices,
        device: Option<&DeviceSpec>,
        mode: BuildMode,
    ) -> Result<Vec<AssetSliceSet>> {
        let strippings = self.bundle.config.suffix_strippings();
        let filter = DeviceFilter::for_asset_slices(device, self.matcher.as_ref(), &strippings)?;

        let mut jobs: Vec<(&Fragment, ArchivePath)> = Vec::new();
        for slice in &generated.slices {
            if slice.category != FragmentCategory::AssetSlice {
                return Err(Error::InvariantViolation(format!(
                    "Unexpected {} fragment of module '{}' among asset slices",
                    slice.category, slice.module
                )));
            }
            if !filter.test(slice)? {
                continue;
            }
            jobs.push((slice, self.paths.path(slice)));
        }

        let written = self
            .pool
            .join_all(&jobs, |(slice, path)| self.write(writer, slice, path, mode))?;

        assets::group_by_module(
            jobs.iter()
                .map(|(slice, _)| &slice.module)
                .zip(written.into_iter().map(Arc::new)),
        )
        .into_iter()
        .map(|(module, descriptors)| {
            Ok(AssetSliceSet {
                metadata: assets::asset_module_metadata(self.bundle.module(&module)?),
                descriptors,
            })
        })
        .collect()
    }

    /// Write one fragment through the archive operation for its category
    fn write(
        &self,
        writer: &dyn ArchiveWriter,
        fragment: &Fragment,
        path: &ArchivePath,
        mode: BuildMode,
    ) -> Result<ArtifactDescriptor> {
        let written = match fragment.category {
            FragmentCategory::Instant => writer.add_instant(fragment, path),
            FragmentCategory::Split => writer.add_split(fragment, path),
            FragmentCategory::System => {
                if fragment.is_base_module && fragment.is_master {
                    writer.add_system(fragment, path)
                } else {
                    writer.add_split(fragment, path)
                }
            }
            FragmentCategory::Standalone => {
                if mode == BuildMode::Universal {
                    writer.add_standalone_universal(fragment)
                } else {
                    writer.add_standalone(fragment, path)
                }
            }
            FragmentCategory::AssetSlice => writer.add_asset_slice(fragment, path),
            FragmentCategory::Hibernation => writer.add_hibernated(fragment, path),
        };

        let descriptor = written.map_err(|e| match e {
            e @ Error::SerializationError { .. } => e,
            other => Error::SerializationError {
                path: path.to_string(),
                message: other.to_string(),
            },
        })?;

        if let Err(e) = self.listener.on_finalized(&descriptor) {
            warn!("Finalization listener failed for '{}': {}", descriptor.path, e);
        }

        if self.options.verbose {
            info!(
                "'{}' of type '{}' was written",
                descriptor.path, fragment.category
            );
        } else {
            debug!(
                "'{}' of type '{}' was written",
                descriptor.path, fragment.category
            );
        }

        Ok(descriptor)
    }
}
