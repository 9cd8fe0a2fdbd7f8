// src/lib.rs

//! Splitset
//!
//! Serializes already-generated application package fragments ("splits")
//! and asset slices into an output archive, and assembles the table of
//! contents describing how they combine into installable variants.
//!
//! # Architecture
//!
//! - Variant numbers are assigned in variant-key order before any parallel work
//! - Fragments are canonicalized (variant targeting cleared) and deduplicated by value
//! - Each distinct fragment is written once on a bounded worker pool
//! - Results are re-keyed from the input structure, never from completion order
//! - The table of contents is written only after every write succeeded

pub mod archive;
pub mod config;
pub mod device;
mod error;
pub mod hooks;
pub mod model;
pub mod serializer;
pub mod toc;

pub use error::{Error, Result};
pub use serializer::{BuildRequest, SerializerManager};
