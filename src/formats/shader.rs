//! Provides face-pose atlas tiling and the vertex shader UV remap.
//!
//! Face materials sample one tile of a sprite atlas holding every facial
//! expression of an entity. The atlas layout is picked from the number of
//! face poses, and the vertex stage divides `vUv` by the tile counts so the
//! mesh UVs address a single tile.
//!
//! Some layouts derive the row count from the texture height, which is only
//! known once the first texture of the material has finished loading. Until
//! then the row count falls back to 1 and the host is expected to re-patch
//! lazily. The variant cache key depends on the pose count alone.
//!
//! # Examples
//! ```
//! use legends_import::formats::shader::{AtlasTiling, ShaderPatcher};
//!
//! assert_eq!(ShaderPatcher::tile_for(18, 0), AtlasTiling { x: 9.0, y: 3.0 });
//! assert_eq!(ShaderPatcher::tile_for(2, 32), AtlasTiling { x: 2.0, y: 2.0 });
//! assert_eq!(ShaderPatcher::tile_for(7, 64), AtlasTiling { x: 1.0, y: 1.0 });
//! ```

use crate::formats::{ImportError, ImportResult};

/// The vertex shader chunk that computes `vUv`.
pub const UV_VERTEX_CHUNK: &str = "#include <uv_vertex>";

/// Columns and rows of a face-pose atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasTiling {
    pub x: f32,
    pub y: f32,
}

impl AtlasTiling {
    pub const IDENTITY: AtlasTiling = AtlasTiling { x: 1.0, y: 1.0 };
}

/// Injects the atlas UV remap into vertex shader sources.
///
/// # Examples
/// ```
/// use legends_import::formats::shader::ShaderPatcher;
///
/// let patcher = ShaderPatcher::default();
/// let patched = patcher.patch("void main() {\n#include <uv_vertex>\n}", 3.0, 4.0).unwrap();
/// assert!(patched.contains("vUv /= vec2(3.0, 4.0);"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderPatcher {
    anchor: String,
}

impl Default for ShaderPatcher {
    fn default() -> Self {
        Self::new(UV_VERTEX_CHUNK)
    }
}

impl ShaderPatcher {
    /// Creates a patcher injecting after `anchor`.
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
        }
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Returns the atlas tiling for a face-pose count.
    ///
    /// | count | x  | y           |
    /// |-------|----|-------------|
    /// | 18    | 9  | 3           |
    /// | 9     | 18 | height / 16 |
    /// | 3     | 3  | height / 12 |
    /// | 2     | 2  | height / 16 |
    /// | other | 1  | 1           |
    ///
    /// A `texture_height` of 0 means no texture has loaded yet; the
    /// height-derived row count is then 1.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::shader::{AtlasTiling, ShaderPatcher};
    ///
    /// assert_eq!(ShaderPatcher::tile_for(3, 36), AtlasTiling { x: 3.0, y: 3.0 });
    /// assert_eq!(ShaderPatcher::tile_for(3, 0), AtlasTiling { x: 3.0, y: 1.0 });
    /// ```
    pub fn tile_for(face_pose_count: usize, texture_height: u32) -> AtlasTiling {
        let rows = |divisor: f32| {
            if texture_height == 0 {
                1.0
            } else {
                texture_height as f32 / divisor
            }
        };

        match face_pose_count {
            18 => AtlasTiling { x: 9.0, y: 3.0 },
            9 => AtlasTiling {
                x: 18.0,
                y: rows(16.0),
            },
            3 => AtlasTiling {
                x: 3.0,
                y: rows(12.0),
            },
            2 => AtlasTiling {
                x: 2.0,
                y: rows(16.0),
            },
            _ => AtlasTiling::IDENTITY,
        }
    }

    /// Inserts a `vUv /= vec2(tile_x, tile_y)` remap, guarded by `USE_UV`,
    /// directly after the anchor chunk.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the source has no anchor chunk.
    pub fn patch(&self, source: &str, tile_x: f32, tile_y: f32) -> ImportResult<String> {
        let Some(pos) = source.find(&self.anchor) else {
            return Err(ImportError::format(format!(
                "vertex shader has no `{}` chunk",
                self.anchor
            )));
        };
        let split = pos + self.anchor.len();

        let remap = format!(
            "\n#ifdef USE_UV\nvUv /= vec2({:?}, {:?});\n#endif\n",
            tile_x, tile_y
        );

        let mut patched = String::with_capacity(source.len() + remap.len());
        patched.push_str(&source[..split]);
        patched.push_str(&remap);
        patched.push_str(&source[split..]);
        Ok(patched)
    }
}

/// A compiled-shader variant shared by every material with the same atlas
/// layout.
///
/// # Examples
/// ```
/// use legends_import::formats::shader::ShaderVariant;
///
/// let variant = ShaderVariant::new(18, "#include <uv_vertex>");
/// assert_eq!(variant.cache_key(), "shader_face_poses 18");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderVariant {
    face_pose_count: usize,
    cache_key: String,
    patcher: ShaderPatcher,
}

impl ShaderVariant {
    pub fn new(face_pose_count: usize, anchor: impl Into<String>) -> Self {
        Self {
            face_pose_count,
            cache_key: format!("shader_face_poses {face_pose_count}"),
            patcher: ShaderPatcher::new(anchor),
        }
    }

    /// Program cache key. Independent of texture height.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn face_pose_count(&self) -> usize {
        self.face_pose_count
    }

    pub fn tiling(&self, texture_height: u32) -> AtlasTiling {
        ShaderPatcher::tile_for(self.face_pose_count, texture_height)
    }

    /// Patches a vertex shader for the given texture height.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the source has no anchor chunk.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::shader::ShaderVariant;
    ///
    /// let variant = ShaderVariant::new(2, "#include <uv_vertex>");
    /// let patched = variant.patch_vertex("#include <uv_vertex>", 64).unwrap();
    /// assert!(patched.contains("vec2(2.0, 4.0)"));
    /// ```
    pub fn patch_vertex(&self, source: &str, texture_height: u32) -> ImportResult<String> {
        let tiling = self.tiling(texture_height);
        self.patcher.patch(source, tiling.x, tiling.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "void main() {\n#include <uv_vertex>\n#include <project_vertex>\n}";

    #[test]
    fn test_tile_for_table() {
        for height in [0, 16, 48, 1024] {
            assert_eq!(ShaderPatcher::tile_for(18, height), AtlasTiling { x: 9.0, y: 3.0 });
        }
        assert_eq!(ShaderPatcher::tile_for(9, 64), AtlasTiling { x: 18.0, y: 4.0 });
        assert_eq!(ShaderPatcher::tile_for(3, 24), AtlasTiling { x: 3.0, y: 2.0 });
        assert_eq!(ShaderPatcher::tile_for(2, 32), AtlasTiling { x: 2.0, y: 2.0 });
        assert_eq!(ShaderPatcher::tile_for(7, 32), AtlasTiling::IDENTITY);
        assert_eq!(ShaderPatcher::tile_for(0, 32), AtlasTiling::IDENTITY);
    }

    #[test]
    fn test_tile_for_before_texture_loaded() {
        assert_eq!(ShaderPatcher::tile_for(9, 0), AtlasTiling { x: 18.0, y: 1.0 });
        assert_eq!(ShaderPatcher::tile_for(2, 0), AtlasTiling { x: 2.0, y: 1.0 });
    }

    #[test]
    fn test_patch_inserts_after_anchor() {
        let patched = ShaderPatcher::default().patch(VERTEX, 9.0, 3.0).unwrap();
        let anchor = patched.find(UV_VERTEX_CHUNK).unwrap();
        let remap = patched.find("vUv /= vec2(9.0, 3.0);").unwrap();
        let next = patched.find("#include <project_vertex>").unwrap();
        assert!(anchor < remap && remap < next);
        assert!(patched.contains("#ifdef USE_UV"));
        assert_eq!(patched.matches("#endif").count(), 1);
    }

    #[test]
    fn test_patch_missing_anchor() {
        let err = ShaderPatcher::default().patch("void main() {}", 2.0, 2.0);
        assert!(matches!(err, Err(ImportError::Format(_))));
    }

    #[test]
    fn test_variant_key_ignores_height() {
        let variant = ShaderVariant::new(3, UV_VERTEX_CHUNK);
        let early = variant.patch_vertex(VERTEX, 0).unwrap();
        let late = variant.patch_vertex(VERTEX, 36).unwrap();
        assert!(early.contains("vec2(3.0, 1.0)"));
        assert!(late.contains("vec2(3.0, 3.0)"));
        assert_eq!(variant.cache_key(), "shader_face_poses 3");
    }
}
