// src/archive/paths.rs

//! Standard naming of artifacts inside the archive

use crate::hooks::PathAssigner;
use crate::model::{ArchivePath, Fragment, FragmentCategory};
use std::collections::HashMap;
use std::sync::Mutex;

/// Names artifacts `<dir>/<module>-<suffix>.apk`
///
/// A fragment keeps its name for the whole run. Distinct fragments whose
/// names collide get `_2`, `_3`... appended in the order they are first
/// requested. The serializer requests paths on its orchestrating thread in
/// a deterministic order and starts a new run for every `populate`, so
/// names are stable across runs.
#[derive(Debug, Default)]
pub struct StandardPathAssigner {
    naming: Mutex<Naming>,
}

#[derive(Debug, Default)]
struct Naming {
    stems: HashMap<String, usize>,
    assigned: HashMap<Fragment, ArchivePath>,
}

impl StandardPathAssigner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathAssigner for StandardPathAssigner {
    fn start_run(&self) {
        let mut naming = self.naming.lock().unwrap_or_else(|e| e.into_inner());
        *naming = Naming::default();
    }

    fn path(&self, fragment: &Fragment) -> ArchivePath {
        let mut naming = self.naming.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(path) = naming.assigned.get(fragment) {
            return path.clone();
        }

        let stem = stem(fragment);
        let count = naming.stems.entry(stem.clone()).or_insert(0);
        *count += 1;

        let path = if *count == 1 {
            ArchivePath::new(format!("{}.apk", stem))
        } else {
            ArchivePath::new(format!("{}_{}.apk", stem, count))
        };
        naming.assigned.insert(fragment.clone(), path.clone());
        path
    }
}

fn stem(fragment: &Fragment) -> String {
    let module = fragment.module.as_str();
    let suffix = if fragment.is_master {
        "master".to_string()
    } else {
        fragment
            .targeting
            .suffix()
            .unwrap_or_else(|| "config".to_string())
    };

    match fragment.category {
        FragmentCategory::Split => format!("splits/{}-{}", module, suffix),
        FragmentCategory::Instant => format!("instant/instant-{}-{}", module, suffix),
        FragmentCategory::Standalone => match fragment.targeting.suffix() {
            Some(targeting) => format!("standalones/standalone-{}", targeting),
            None => "standalones/standalone".to_string(),
        },
        FragmentCategory::System if fragment.is_base_module && fragment.is_master => {
            "system/system".to_string()
        }
        FragmentCategory::System => format!("splits/{}-{}", module, suffix),
        FragmentCategory::AssetSlice => format!("asset-slices/{}-{}", module, suffix),
        FragmentCategory::Hibernation => format!("hibernation/{}-{}", module, suffix),
    }
}
