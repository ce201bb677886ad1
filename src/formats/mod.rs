//! Provides the document formats of the asset graph and their common types.
//!
//! An entity document names a geometry, the geometry's model document lists
//! submeshes, and every submesh points at a meta-material document whose
//! textures are loaded asynchronously. Each document kind lives in its own
//! submodule:
//! - [`entity`]: client entity documents and [`entity::EntityComposer`]
//! - [`model`]: model documents and [`model::ModelAssembler`]
//! - [`material`]: meta-material documents and [`material::MaterialResolver`]
//! - [`shader`]: face-pose atlas tiling and vertex shader patching
//!
//! # Examples
//! ```
//! use legends_import::formats::{ImportError, MaterialKey};
//!
//! let key = MaterialKey::new("entity/pig_body");
//! assert_eq!(key.name(), "pig_body");
//!
//! let err = ImportError::Format("missing geometry".to_string());
//! assert_eq!(err.to_string(), "Invalid data: missing geometry");
//! ```

pub mod entity;
pub mod material;
pub mod model;
pub mod shader;
pub mod shared;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::source::SourceError;

// ---- Math type aliases ----
/// A 2D vector type used by document loaders.
///
/// # Examples
/// ```
/// use legends_import::formats::Vec2;
///
/// let v: Vec2 = [0.0, 1.0];
/// assert_eq!(v, [0.0, 1.0]);
/// ```
pub type Vec2 = [f32; 2];
/// A 3D vector type used by document loaders.
///
/// # Examples
/// ```
/// use legends_import::formats::Vec3;
///
/// let v: Vec3 = [1.0, 2.0, 3.0];
/// assert_eq!(v, [1.0, 2.0, 3.0]);
/// ```
pub type Vec3 = [f32; 3];

/// Sampling filter requested for a texture.
///
/// Selected by [`PipelineConfig::texture_filter`](crate::config::PipelineConfig::texture_filter).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Pixel-art textures are sampled without interpolation.
    #[default]
    Nearest,
    Linear,
}

/// Represents decoded texture data ready for upload.
///
/// # Examples
/// ```
/// use legends_import::formats::{TextureData, TextureFilter};
///
/// let tex = TextureData {
///     width: 1,
///     height: 1,
///     data: vec![255, 255, 255, 255],
///     filter: TextureFilter::Nearest,
/// };
/// assert_eq!(tex.width, 1);
/// ```
#[derive(Clone, Debug)]
pub struct TextureData {
    /// The texture width in pixels.
    pub width: u32,
    /// The texture height in pixels.
    pub height: u32,
    /// RGBA pixel data stored row-major.
    pub data: Vec<u8>,
    /// Minification and magnification filter.
    pub filter: TextureFilter,
}

/// Identifies a meta-material descriptor.
///
/// The key is the `meta_material` string of a submesh. It doubles as the
/// material cache key and as the material-group discriminator.
///
/// # Examples
/// ```
/// use legends_import::formats::MaterialKey;
///
/// let key = MaterialKey::from("pig_face");
/// assert_eq!(key.as_str(), "pig_face");
/// assert_eq!(key.name(), "pig_face");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialKey(String);

impl MaterialKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the descriptor entry name: the last path segment up to the
    /// first `.`.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::MaterialKey;
    ///
    /// assert_eq!(MaterialKey::new("mobs/pig.face").name(), "pig");
    /// ```
    pub fn name(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        file.split('.').next().unwrap_or(file)
    }
}

impl From<&str> for MaterialKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for MaterialKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result type for import operations.
///
/// # Examples
/// ```
/// use legends_import::formats::{ImportError, ImportResult};
///
/// let result: ImportResult<()> = Err(ImportError::Format("bad".to_string()));
/// assert!(result.is_err());
/// ```
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while importing the asset graph.
///
/// Errors are cheap to clone so that every caller waiting on a shared
/// material resolution receives the same failure.
///
/// # Examples
/// ```
/// use legends_import::formats::ImportError;
///
/// let err = ImportError::ResourceNotFound {
///     path: "materials/meta_materials/pig.json".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Resource not found: materials/meta_materials/pig.json"
/// );
/// ```
#[derive(Clone, Debug, Error)]
pub enum ImportError {
    /// A required key or field is missing or malformed.
    #[error("Invalid data: {0}")]
    Format(String),
    /// A descriptor (or every format of a texture) is missing.
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },
    /// The asset source failed for a reason other than a missing file.
    #[error("Source error: {0}")]
    Source(#[source] Arc<SourceError>),
    /// Texture bytes were fetched but could not be decoded.
    #[error("Failed to decode texture {path}: {source}")]
    Texture {
        path: String,
        #[source]
        source: Arc<image::ImageError>,
    },
    /// A material resolution ended without producing a result, e.g. because
    /// its task set was dropped.
    #[error("Resolution of {key} was abandoned")]
    Abandoned { key: String },
}

impl ImportError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ImportError::Format(msg.into())
    }
}

impl From<SourceError> for ImportError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound(path) => ImportError::ResourceNotFound { path },
            other => ImportError::Source(Arc::new(other)),
        }
    }
}
