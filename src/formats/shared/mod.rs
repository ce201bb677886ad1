//! Provides shared utilities for document loaders.
//!
//! This module provides common functionality used by several loaders:
//! - JSON parsing helpers and namespaced key lookup
//! - Texture decoding
//!
//! # Examples
//! ```
//! use legends_import::formats::shared::split_namespaced;
//!
//! assert_eq!(split_namespaced("minecraft:geometry"), ("minecraft", "geometry"));
//! ```

pub mod json;
pub mod texture;

pub use json::{find_by_prefix, find_namespaced, json_str_or_none, parse_document, split_namespaced};
pub use texture::decode_texture;
