//! Provides the path conventions and material rules of the import pipeline.
//!
//! The defaults match the layout of an unpacked Legends resource pack. A host
//! serving a differently laid out pack can load overrides from a JSON (or
//! JSON5) file; missing fields keep their defaults.
//!
//! # Examples
//! ```
//! use legends_import::config::PipelineConfig;
//! use legends_import::formats::MaterialKey;
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.model_path("pig"), "models/entity/pig.model.json");
//! assert_eq!(
//!     config.material_path(&MaterialKey::new("pig_body")),
//!     "materials/meta_materials/pig_body.json"
//! );
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::formats::shader::UV_VERTEX_CHUNK;
use crate::formats::shared::parse_document;
use crate::formats::{ImportError, ImportResult, MaterialKey, TextureFilter};
use crate::source::SourceError;

/// Import pipeline settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding `<geometry>.model.json` documents.
    pub model_dir: String,
    /// File name suffix appended to a geometry name.
    pub model_suffix: String,
    /// Directory holding meta-material documents.
    pub material_dir: String,
    /// File name suffix appended to a meta-material key.
    pub material_suffix: String,
    /// Extension tried first for every texture reference.
    pub texture_extension: String,
    /// Extension tried once when the primary texture fails.
    pub fallback_texture_extension: String,
    /// Sampling filter of loaded textures: `"nearest"` or `"linear"`.
    pub texture_filter: TextureFilter,
    /// Base variants whose materials sample a face-pose atlas.
    pub face_variants: Vec<String>,
    /// Vertex shader chunk the UV remap is injected after.
    pub shader_anchor: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_dir: "models/entity".to_string(),
            model_suffix: ".model.json".to_string(),
            material_dir: "materials/meta_materials".to_string(),
            material_suffix: ".json".to_string(),
            texture_extension: "png".to_string(),
            fallback_texture_extension: "hdr".to_string(),
            texture_filter: TextureFilter::Nearest,
            face_variants: vec![
                "base_entity_hero_face".to_string(),
                "base_entity_face".to_string(),
            ],
            shader_anchor: UV_VERTEX_CHUNK.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parses a config document.
    ///
    /// # Errors
    /// Returns a format error if the document is not valid JSON or JSON5.
    ///
    /// # Examples
    /// ```
    /// use legends_import::config::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_bytes(br#"{"texture_extension": "tga"}"#).unwrap();
    /// assert_eq!(config.texture_extension, "tga");
    /// assert_eq!(config.fallback_texture_extension, "hdr");
    /// ```
    pub fn from_bytes(data: &[u8]) -> ImportResult<Self> {
        parse_document(data, "pipeline config")
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    /// Returns [`ImportError::ResourceNotFound`] naming `path` if the file is
    /// missing, and another error if it cannot be read or parsed.
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| ImportError::from(SourceError::from_io(e, path.display().to_string())))?;
        Self::from_bytes(&data)
    }

    pub fn model_path(&self, geometry: &str) -> String {
        format!("{}/{}{}", self.model_dir, geometry, self.model_suffix)
    }

    pub fn material_path(&self, key: &MaterialKey) -> String {
        format!("{}/{}{}", self.material_dir, key.as_str(), self.material_suffix)
    }

    /// Returns the primary and fallback paths for a texture reference.
    ///
    /// # Examples
    /// ```
    /// use legends_import::config::PipelineConfig;
    ///
    /// let [png, hdr] = PipelineConfig::default().texture_paths("textures/pig");
    /// assert_eq!(png, "textures/pig.png");
    /// assert_eq!(hdr, "textures/pig.hdr");
    /// ```
    pub fn texture_paths(&self, reference: &str) -> [String; 2] {
        [
            format!("{reference}.{}", self.texture_extension),
            format!("{reference}.{}", self.fallback_texture_extension),
        ]
    }

    pub fn is_face_variant(&self, base_variant: &str) -> bool {
        self.face_variants.iter().any(|v| v == base_variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_variants() {
        let config = PipelineConfig::default();
        assert!(config.is_face_variant("base_entity_face"));
        assert!(config.is_face_variant("base_entity_hero_face"));
        assert!(!config.is_face_variant("base_entity"));
        assert!(!config.is_face_variant(""));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = PipelineConfig::from_bytes(
            b"{ // relocated pack\n model_dir: 'geo', face_variants: ['custom_face'] }",
        )
        .unwrap();
        assert_eq!(config.model_path("pig"), "geo/pig.model.json");
        assert!(config.is_face_variant("custom_face"));
        assert!(!config.is_face_variant("base_entity_face"));
        assert_eq!(config.material_dir, "materials/meta_materials");
    }

    #[test]
    fn test_from_path_missing() {
        let err = PipelineConfig::from_path(Path::new("does_not_exist.json")).unwrap_err();
        assert!(
            matches!(err, ImportError::ResourceNotFound { ref path } if path == "does_not_exist.json")
        );
        assert_eq!(err.to_string(), "Resource not found: does_not_exist.json");
    }

    #[test]
    fn test_texture_filter_override() {
        assert_eq!(PipelineConfig::default().texture_filter, TextureFilter::Nearest);
        let config = PipelineConfig::from_bytes(br#"{"texture_filter": "linear"}"#).unwrap();
        assert_eq!(config.texture_filter, TextureFilter::Linear);
        assert!(PipelineConfig::from_bytes(br#"{"texture_filter": "cubic"}"#).is_err());
    }
}
