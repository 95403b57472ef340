#![deny(missing_docs)]

//! # OpenAPI Input Module
//!
//! - **document**: the node arena and `$ref` resolution.
//! - **formats**: closed `type` / `format` enumerations.
//! - **normalization**: dialect compatibility views over schema fragments.
//! - **ref_utils**: JSON Pointer helpers.

pub mod document;
pub mod formats;
pub mod normalization;
pub mod ref_utils;

pub use document::{Document, FragmentId, Resolved};
pub use formats::{Format, JsonType};
