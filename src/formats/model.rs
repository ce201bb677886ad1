//! Provides the model document loader and the submesh assembler.
//!
//! A model document is identified by its `"<namespace>:geometry"` key and
//! holds a list of geometries, each with a list of submeshes:
//!
//! ```text
//! { "minecraft:geometry": [ { "meshes": [
//!     { "meta_material": "pig_body", "positions": [[x, y, z], ...],
//!       "normal_sets": [[[x, y, z], ...]], "uv_sets": [[[u, v], ...]],
//!       "triangles": [0, 1, 2, ...], "weights": [[w0, w1], ...] }
//! ] } ] }
//! ```
//!
//! [`ModelAssembler`] merges the submeshes of the first geometry into one
//! indexed vertex buffer split into material groups. Groups are run-length
//! encoded over consecutive submeshes, so a material that reappears after a
//! different one starts a new group.
//!
//! # Examples
//! ```
//! use legends_import::formats::model::{parse_model_document, ModelAssembler};
//!
//! let doc = br#"{"minecraft:geometry": [{"meshes": [{
//!     "meta_material": "pig_body",
//!     "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
//!     "triangles": [0, 1, 2]
//! }]}]}"#;
//! let submeshes = parse_model_document(doc).unwrap();
//! let geometry = ModelAssembler.assemble(&submeshes).unwrap();
//! assert_eq!(geometry.vertices.vertex_count(), 3);
//! assert_eq!(geometry.groups.len(), 1);
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::material::{MaterialHandle, MaterialResolver};
use super::shared::{find_namespaced, parse_document};
use super::{ImportError, ImportResult, MaterialKey, Vec2, Vec3};

/// Components per position.
pub const POSITION_COMPONENTS: usize = 3;
/// Components per normal.
pub const NORMAL_COMPONENTS: usize = 3;
/// Components per texture coordinate.
pub const UV_COMPONENTS: usize = 2;
/// Bone influences per vertex.
pub const SKIN_COMPONENTS: usize = 4;

// ---- Model JSON structure ----

#[derive(Deserialize)]
#[serde(untagged)]
enum RawComponents {
    Nested(Vec<Vec<f32>>),
    Flat(Vec<f32>),
}

impl RawComponents {
    fn into_vectors<const N: usize>(self, what: &str, mesh: usize) -> ImportResult<Vec<[f32; N]>> {
        match self {
            RawComponents::Nested(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    <[f32; N]>::try_from(item.as_slice()).map_err(|_| {
                        ImportError::format(format!(
                            "mesh {mesh}: {what}[{i}] has {} components, expected {N}",
                            item.len()
                        ))
                    })
                })
                .collect(),
            RawComponents::Flat(values) => {
                if values.len() % N != 0 {
                    return Err(ImportError::format(format!(
                        "mesh {mesh}: {what} has {} values, not a multiple of {N}",
                        values.len()
                    )));
                }
                Ok(values
                    .chunks_exact(N)
                    .map(|chunk| {
                        let mut v = [0.0; N];
                        v.copy_from_slice(chunk);
                        v
                    })
                    .collect())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndices {
    Flat(Vec<u32>),
    Nested(Vec<[u32; 3]>),
}

impl RawIndices {
    fn into_flat(self) -> Vec<u32> {
        match self {
            RawIndices::Flat(indices) => indices,
            RawIndices::Nested(triangles) => triangles.into_iter().flatten().collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawMesh {
    #[serde(default)]
    meta_material: Option<String>,
    #[serde(default)]
    positions: Option<RawComponents>,
    #[serde(default)]
    normal_sets: Vec<RawComponents>,
    #[serde(default)]
    uv_sets: Vec<RawComponents>,
    #[serde(default)]
    triangles: Option<RawIndices>,
    #[serde(default)]
    weights: Option<Vec<Vec<f32>>>,
}

/// One submesh of a model document.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmeshDescriptor {
    /// The meta-material this submesh is drawn with.
    pub material: MaterialKey,
    pub positions: Vec<Vec3>,
    /// Normal sets; only the first is used.
    pub normal_sets: Vec<Vec<Vec3>>,
    /// UV sets; only the first is used.
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Triangle list indexing into this submesh's own vertices.
    pub triangles: Vec<u32>,
    /// Per-vertex bone weights.
    pub weights: Option<Vec<Vec<f32>>>,
}

impl SubmeshDescriptor {
    fn from_raw(raw: RawMesh, mesh: usize) -> ImportResult<Self> {
        let material = raw
            .meta_material
            .filter(|m| !m.is_empty())
            .map(MaterialKey::new)
            .ok_or_else(|| ImportError::format(format!("mesh {mesh}: missing meta_material")))?;

        let positions = raw
            .positions
            .ok_or_else(|| ImportError::format(format!("mesh {mesh}: missing positions")))?
            .into_vectors::<POSITION_COMPONENTS>("positions", mesh)?;

        let normal_sets = raw
            .normal_sets
            .into_iter()
            .map(|set| set.into_vectors::<NORMAL_COMPONENTS>("normal_sets", mesh))
            .collect::<ImportResult<Vec<_>>>()?;

        let uv_sets = raw
            .uv_sets
            .into_iter()
            .map(|set| set.into_vectors::<UV_COMPONENTS>("uv_sets", mesh))
            .collect::<ImportResult<Vec<_>>>()?;

        let triangles = raw
            .triangles
            .ok_or_else(|| ImportError::format(format!("mesh {mesh}: missing triangles")))?
            .into_flat();

        Ok(Self {
            material,
            positions,
            normal_sets,
            uv_sets,
            triangles,
            weights: raw.weights,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Checks that every per-vertex list matches the position count and that
    /// the triangle list only references this submesh's vertices.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] naming the first inconsistency.
    pub fn validate(&self, mesh: usize) -> ImportResult<()> {
        let count = self.vertex_count();
        let mismatch = |what: &str, len: usize| {
            ImportError::format(format!(
                "mesh {mesh}: {what} has {len} entries but there are {count} positions"
            ))
        };

        if self.material.as_str().is_empty() {
            return Err(ImportError::format(format!("mesh {mesh}: missing meta_material")));
        }
        if let Some(normals) = self.normal_sets.first() {
            if normals.len() != count {
                return Err(mismatch("normal set", normals.len()));
            }
        }
        if let Some(uvs) = self.uv_sets.first() {
            if uvs.len() != count {
                return Err(mismatch("uv set", uvs.len()));
            }
        }
        if let Some(weights) = &self.weights {
            if weights.len() != count {
                return Err(mismatch("weights", weights.len()));
            }
        }
        if self.triangles.len() % 3 != 0 {
            return Err(ImportError::format(format!(
                "mesh {mesh}: {} triangle indices is not a multiple of 3",
                self.triangles.len()
            )));
        }
        if let Some(&index) = self.triangles.iter().find(|&&i| i as usize >= count) {
            return Err(ImportError::format(format!(
                "mesh {mesh}: triangle index {index} out of range for {count} vertices"
            )));
        }
        Ok(())
    }
}

/// Parses the submeshes of the first geometry in a model document.
///
/// # Errors
/// Returns [`ImportError::Format`] if the geometry key, the meshes list, or a
/// required submesh field is missing or malformed.
pub fn parse_model_document(data: &[u8]) -> ImportResult<Vec<SubmeshDescriptor>> {
    let doc: Value = parse_document(data, "model document")?;
    let object = doc
        .as_object()
        .ok_or_else(|| ImportError::format("model document is not an object"))?;

    let (key, geometries) = find_namespaced(object, "geometry")
        .ok_or_else(|| ImportError::format("model document has no <namespace>:geometry"))?;
    let geometry = geometries
        .as_array()
        .and_then(|g| g.first())
        .ok_or_else(|| ImportError::format(format!("{key} holds no geometry")))?;
    let meshes = geometry
        .get("meshes")
        .ok_or_else(|| ImportError::format(format!("{key}[0] has no meshes")))?;

    let raw = Vec::<RawMesh>::deserialize(meshes)
        .map_err(|e| ImportError::format(format!("Failed to parse meshes: {e}")))?;
    if raw.is_empty() {
        return Err(ImportError::format(format!("{key}[0] has no meshes")));
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, mesh)| SubmeshDescriptor::from_raw(mesh, i))
        .collect()
}

// ---- Assembled buffers ----

/// Flat vertex attribute buffers plus a triangle index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffers {
    /// 3 components per vertex.
    pub positions: Vec<f32>,
    /// 3 components per vertex.
    pub normals: Vec<f32>,
    /// 2 components per vertex, V flipped.
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl VertexBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Per-vertex bone influences, 4 per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinBuffers {
    pub indices: Vec<u16>,
    pub weights: Vec<f32>,
}

/// A contiguous range of the index buffer drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialGroup {
    pub start: usize,
    pub count: usize,
    /// Index into [`AssembledGeometry::materials`].
    pub material_index: usize,
}

impl MaterialGroup {
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// All submeshes of a model merged into one indexed buffer set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssembledGeometry {
    pub vertices: VertexBuffers,
    /// Present when any submesh carries bone weights.
    pub skin: Option<SkinBuffers>,
    /// Groups in index-buffer order; they partition the index buffer.
    pub groups: Vec<MaterialGroup>,
    /// Distinct material keys in order of first appearance.
    pub materials: Vec<MaterialKey>,
}

impl AssembledGeometry {
    pub fn material_of(&self, group: &MaterialGroup) -> Option<&MaterialKey> {
        self.materials.get(group.material_index)
    }
}

/// The buffers of one submesh, unmerged.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmeshBuffers {
    pub material: MaterialKey,
    pub vertices: VertexBuffers,
    pub skin: Option<SkinBuffers>,
}

/// Merges submesh descriptors into render-ready buffers.
pub struct ModelAssembler;

impl ModelAssembler {
    /// Merges submeshes, in order, into one indexed buffer set.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if any submesh fails validation.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::model::{ModelAssembler, SubmeshDescriptor};
    /// use legends_import::formats::MaterialKey;
    ///
    /// let tri = |m: &str| SubmeshDescriptor {
    ///     material: MaterialKey::new(m),
    ///     positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ///     normal_sets: vec![],
    ///     uv_sets: vec![],
    ///     triangles: vec![0, 1, 2],
    ///     weights: None,
    /// };
    /// let geometry = ModelAssembler.assemble(&[tri("a"), tri("b"), tri("a")]).unwrap();
    /// assert_eq!(geometry.groups.len(), 3);
    /// assert_eq!(geometry.materials.len(), 2);
    /// ```
    pub fn assemble(&self, submeshes: &[SubmeshDescriptor]) -> ImportResult<AssembledGeometry> {
        let mut geometry = AssembledGeometry {
            skin: submeshes
                .iter()
                .any(|s| s.weights.is_some())
                .then(SkinBuffers::default),
            ..Default::default()
        };

        for (i, submesh) in submeshes.iter().enumerate() {
            submesh.validate(i)?;

            let start = geometry.vertices.index_count();
            append_submesh(submesh, &mut geometry.vertices, geometry.skin.as_mut());
            let count = geometry.vertices.index_count() - start;

            let material_index = match geometry
                .materials
                .iter()
                .position(|m| *m == submesh.material)
            {
                Some(index) => index,
                None => {
                    geometry.materials.push(submesh.material.clone());
                    geometry.materials.len() - 1
                }
            };

            match geometry.groups.last_mut() {
                Some(group) if group.material_index == material_index => group.count += count,
                _ => geometry.groups.push(MaterialGroup {
                    start,
                    count,
                    material_index,
                }),
            }
        }

        log::debug!(
            "assembled {} submeshes: {} vertices, {} indices, {} material groups",
            submeshes.len(),
            geometry.vertices.vertex_count(),
            geometry.vertices.index_count(),
            geometry.groups.len()
        );

        Ok(geometry)
    }

    /// Converts each submesh into its own buffer set, without merging.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if any submesh fails validation.
    pub fn assemble_separate(
        &self,
        submeshes: &[SubmeshDescriptor],
    ) -> ImportResult<Vec<SubmeshBuffers>> {
        submeshes
            .iter()
            .enumerate()
            .map(|(i, submesh)| {
                submesh.validate(i)?;
                let mut vertices = VertexBuffers::default();
                let mut skin = submesh.weights.as_ref().map(|_| SkinBuffers::default());
                append_submesh(submesh, &mut vertices, skin.as_mut());
                Ok(SubmeshBuffers {
                    material: submesh.material.clone(),
                    vertices,
                    skin,
                })
            })
            .collect()
    }
}

/// Appends a validated submesh, offsetting its indices past the vertices
/// already in `buffers`.
fn append_submesh(
    submesh: &SubmeshDescriptor,
    buffers: &mut VertexBuffers,
    skin: Option<&mut SkinBuffers>,
) {
    let offset = buffers.vertex_count() as u32;
    let count = submesh.vertex_count();

    buffers
        .indices
        .extend(submesh.triangles.iter().map(|i| i + offset));
    buffers
        .positions
        .extend(submesh.positions.iter().flatten().copied());

    match submesh.normal_sets.first() {
        Some(normals) => buffers.normals.extend(normals.iter().flatten().copied()),
        None => buffers.normals.extend(
            smooth_normals(&submesh.positions, &submesh.triangles)
                .iter()
                .flatten()
                .copied(),
        ),
    }

    match submesh.uv_sets.first() {
        Some(uvs) => buffers
            .uvs
            .extend(uvs.iter().flat_map(|uv| [uv[0], 1.0 - uv[1]])),
        None => buffers
            .uvs
            .extend(std::iter::repeat([0.0, 1.0]).take(count).flatten()),
    }

    if let Some(skin) = skin {
        // Single placeholder bone.
        skin.indices
            .extend(std::iter::repeat(0).take(count * SKIN_COMPONENTS));
        match &submesh.weights {
            Some(weights) => skin.weights.extend(weights.iter().flat_map(|w| {
                let mut padded = [0.0; SKIN_COMPONENTS];
                for (slot, value) in padded.iter_mut().zip(w) {
                    *slot = *value;
                }
                padded
            })),
            None => skin.weights.extend(
                std::iter::repeat([1.0, 0.0, 0.0, 0.0])
                    .take(count)
                    .flatten(),
            ),
        }
    }
}

/// Computes area-weighted vertex normals from a triangle list.
fn smooth_normals(positions: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut accumulated = vec![glam::Vec3::ZERO; positions.len()];

    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = glam::Vec3::from_array(positions[a]);
        let pb = glam::Vec3::from_array(positions[b]);
        let pc = glam::Vec3::from_array(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    accumulated
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

// ---- Model ----

/// A bone of the placeholder skeleton.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub bind_pose: glam::Mat4,
}

/// The skeleton a model's skin buffers bind to.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    /// A skeleton with one root bone at the identity pose.
    pub fn single_bone() -> Self {
        Self {
            bones: vec![Bone {
                name: "root".to_string(),
                parent: None,
                bind_pose: glam::Mat4::IDENTITY,
            }],
        }
    }
}

/// An assembled model with its material slots.
///
/// `materials[i]` is the handle for `geometry.materials[i]`. Handles fill in
/// as their material resolves.
#[derive(Debug)]
pub struct Model {
    pub geometry: AssembledGeometry,
    pub materials: Vec<MaterialHandle>,
    pub skeleton: Skeleton,
}

impl Model {
    pub fn material_for(&self, group: &MaterialGroup) -> Option<&MaterialHandle> {
        self.materials.get(group.material_index)
    }
}

/// Loads model documents and requests their materials.
pub struct ModelLoader {
    resolver: MaterialResolver,
}

impl ModelLoader {
    pub fn new(resolver: MaterialResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &MaterialResolver {
        &self.resolver
    }

    /// Parses and assembles a model document, then issues one material
    /// request per distinct material key without waiting for any of them.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the document is malformed.
    pub fn load_from_bytes(&self, data: &[u8]) -> ImportResult<Model> {
        let submeshes = parse_model_document(data)?;
        let geometry = ModelAssembler.assemble(&submeshes)?;
        let materials = geometry
            .materials
            .iter()
            .map(|key| self.resolver.request(key))
            .collect();

        Ok(Model {
            geometry,
            materials,
            skeleton: Skeleton::single_bone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(material: &str) -> SubmeshDescriptor {
        SubmeshDescriptor {
            material: MaterialKey::new(material),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normal_sets: vec![vec![[0.0, 0.0, 1.0]; 3]],
            uv_sets: vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.25]]],
            triangles: vec![0, 1, 2],
            weights: None,
        }
    }

    fn assert_partitioned(geometry: &AssembledGeometry) {
        let mut next = 0;
        for group in &geometry.groups {
            assert_eq!(group.start, next);
            next = group.end();
        }
        assert_eq!(next, geometry.vertices.index_count());
    }

    #[test]
    fn test_same_material_single_group() {
        let geometry = ModelAssembler
            .assemble(&[triangle("m1"), triangle("m1")])
            .unwrap();
        assert_eq!(geometry.vertices.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            geometry.groups,
            vec![MaterialGroup {
                start: 0,
                count: 6,
                material_index: 0
            }]
        );
        assert_partitioned(&geometry);
    }

    #[test]
    fn test_repeated_material_not_coalesced() {
        let geometry = ModelAssembler
            .assemble(&[triangle("a"), triangle("b"), triangle("a")])
            .unwrap();
        let slots: Vec<usize> = geometry.groups.iter().map(|g| g.material_index).collect();
        assert_eq!(slots, vec![0, 1, 0]);
        assert_eq!(geometry.materials, vec![MaterialKey::new("a"), MaterialKey::new("b")]);
        assert_partitioned(&geometry);
    }

    #[test]
    fn test_uv_flip_and_component_counts() {
        let geometry = ModelAssembler.assemble(&[triangle("a")]).unwrap();
        assert_eq!(geometry.vertices.uvs, vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.75]);
        assert_eq!(geometry.vertices.positions.len(), 9);
        assert_eq!(geometry.vertices.normals.len(), 9);
        assert!(geometry.skin.is_none());
    }

    #[test]
    fn test_skin_weights_padded_and_defaulted() {
        let mut weighted = triangle("a");
        weighted.weights = Some(vec![vec![0.5, 0.5], vec![1.0], vec![0.1, 0.2, 0.3, 0.4, 0.5]]);
        let geometry = ModelAssembler
            .assemble(&[weighted, triangle("b")])
            .unwrap();
        let skin = geometry.skin.unwrap();
        assert_eq!(skin.indices.len(), 6 * SKIN_COMPONENTS);
        assert!(skin.indices.iter().all(|&i| i == 0));
        assert_eq!(&skin.weights[0..4], &[0.5, 0.5, 0.0, 0.0]);
        assert_eq!(&skin.weights[4..8], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&skin.weights[8..12], &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(&skin.weights[12..16], &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_normals_are_computed() {
        let mut mesh = triangle("a");
        mesh.normal_sets.clear();
        let geometry = ModelAssembler.assemble(&[mesh]).unwrap();
        for normal in geometry.vertices.normals.chunks_exact(3) {
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_validation_errors() {
        let mut bad_uv = triangle("a");
        bad_uv.uv_sets[0].pop();
        assert!(matches!(ModelAssembler.assemble(&[bad_uv]), Err(ImportError::Format(_))));

        let mut bad_weights = triangle("a");
        bad_weights.weights = Some(vec![vec![1.0]]);
        assert!(matches!(
            ModelAssembler.assemble(&[bad_weights]),
            Err(ImportError::Format(_))
        ));

        let mut bad_index = triangle("a");
        bad_index.triangles = vec![0, 1, 3];
        assert!(matches!(
            ModelAssembler.assemble(&[triangle("a"), bad_index]),
            Err(ImportError::Format(ref msg)) if msg.contains("mesh 1")
        ));

        assert!(matches!(
            ModelAssembler.assemble(&[triangle("")]),
            Err(ImportError::Format(_))
        ));
    }

    #[test]
    fn test_assemble_separate_keeps_local_indices() {
        let parts = ModelAssembler
            .assemble_separate(&[triangle("a"), triangle("b")])
            .unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].vertices.indices, vec![0, 1, 2]);
        assert_eq!(parts[1].material, MaterialKey::new("b"));
    }

    #[test]
    fn test_parse_flat_and_nested() {
        let doc = br#"{"custom:geometry": [{"meshes": [
            {"meta_material": "m1", "positions": [0,0,0, 1,0,0, 0,1,0], "triangles": [[0,1,2]],
             "uv_sets": [[0,0, 1,0, 0,1]]},
            {"meta_material": "m1", "positions": [[0,0,0],[1,0,0],[0,1,0]], "triangles": [0,1,2],
             "normal_sets": [[[0,0,1],[0,0,1],[0,0,1]]]}
        ]}]}"#;
        let submeshes = parse_model_document(doc).unwrap();
        assert_eq!(submeshes.len(), 2);
        assert_eq!(submeshes[0].positions, submeshes[1].positions);
        assert_eq!(submeshes[0].triangles, vec![0, 1, 2]);
        assert_eq!(submeshes[0].uv_sets[0].len(), 3);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_model_document(br#"{"format_version": "1.0"}"#).is_err());
        assert!(parse_model_document(br#"{"minecraft:geometry": []}"#).is_err());
        assert!(parse_model_document(br#"{"minecraft:geometry": [{"meshes": []}]}"#).is_err());
        assert!(parse_model_document(
            br#"{"minecraft:geometry": [{"meshes": [{"positions": [], "triangles": []}]}]}"#
        )
        .is_err());
        assert!(parse_model_document(
            br#"{"minecraft:geometry": [{"meshes": [{"meta_material": "m", "positions": [0,0], "triangles": []}]}]}"#
        )
        .is_err());
    }
}
