// src/serializer/validate.rs

//! Consistency of generated fragment categories with the build mode

use crate::config::BuildMode;
use crate::error::{Error, Result};
use crate::model::{FragmentCategory, GeneratedFragments};

/// Categories that must be absent for a build mode
pub fn forbidden_categories(mode: BuildMode) -> &'static [FragmentCategory] {
    use FragmentCategory::*;

    match mode {
        BuildMode::Default => &[System],
        BuildMode::Universal => &[Split, Instant, Hibernation, System],
        BuildMode::System => &[Split, Instant, Hibernation, Standalone],
        BuildMode::Persistent => &[System, Instant],
        BuildMode::Instant => &[System, Split, Standalone],
        BuildMode::Archive => &[Split, Instant, Standalone, System],
    }
}

/// Fail if fragments were generated that the build mode cannot contain
pub fn validate_input(generated: &GeneratedFragments, mode: BuildMode) -> Result<()> {
    let expectation = match mode {
        BuildMode::Default => "system fragments can only be set in system mode",
        BuildMode::Universal => "universal builds expect only standalone fragments",
        BuildMode::System => "system mode expects only system fragments",
        BuildMode::Persistent => "system and instant fragments are not expected in persistent mode",
        BuildMode::Instant => "system and persistent fragments are not expected in instant mode",
        BuildMode::Archive => "archive mode expects only hibernated fragments",
    };

    match forbidden_categories(mode)
        .iter()
        .find(|category| generated.has(**category))
    {
        Some(category) => Err(Error::InvariantViolation(format!(
            "{} (found {} fragments)",
            expectation, category
        ))),
        None => Ok(()),
    }
}
