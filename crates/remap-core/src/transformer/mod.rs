//! Transform catalog for converting individual field values
//!
//! The catalog is a closed set of named, pure conversions. Rules name an entry
//! by string; names outside the catalog resolve to identity.
//!
//! # Module Organization
//!
//! - [`types`] - The [`TransformKind`] enum and [`TransformationError`]
//! - [`built_in`] - The conversion functions behind each catalog entry
//!
//! # Examples
//!
//! ```
//! use remap_core::transformer::{apply_transform, TransformKind};
//! use serde_json::json;
//!
//! assert_eq!(apply_transform(&json!("Male"), "mapGender"), json!("M"));
//! assert_eq!(TransformKind::from_name("noSuchTransform"), TransformKind::Copy);
//! ```
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

// Catalog enum and error definitions
pub mod types;

// Conversion functions
pub mod built_in;

#[cfg(test)]
mod tests;


pub use types::{apply_transform, TransformKind, TransformationError};
