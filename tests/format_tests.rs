//! Integration tests for document parsing and geometry assembly.
//!
//! Tests the model, entity, and meta-material document formats and the
//! synchronous parts of the pipeline: submesh assembly and shader patching.

use legends_import::formats::entity::EntityDescriptor;
use legends_import::formats::material::{MaterialDescriptor, TextureSlot};
use legends_import::formats::model::{parse_model_document, ModelAssembler, SubmeshDescriptor};
use legends_import::formats::shader::{AtlasTiling, ShaderPatcher, ShaderVariant, UV_VERTEX_CHUNK};
use legends_import::formats::{ImportError, MaterialKey};

/// Builds a one-triangle submesh drawn with `material`.
fn triangle(material: &str) -> SubmeshDescriptor {
    SubmeshDescriptor {
        material: MaterialKey::new(material),
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normal_sets: vec![vec![[0.0, 0.0, 1.0]; 3]],
        uv_sets: vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]],
        triangles: vec![0, 1, 2],
        weights: None,
    }
}

fn materials(submeshes: &[&str]) -> Vec<SubmeshDescriptor> {
    submeshes.iter().map(|m| triangle(m)).collect()
}

// ===========================================================================
// Geometry assembly
// ===========================================================================

#[test]
fn test_two_submeshes_same_material() {
    let geometry = ModelAssembler.assemble(&materials(&["m1", "m1"])).unwrap();

    assert_eq!(geometry.vertices.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(geometry.groups.len(), 1);
    assert_eq!(geometry.groups[0].start, 0);
    assert_eq!(geometry.groups[0].count, 6);
    assert_eq!(geometry.materials, vec![MaterialKey::new("m1")]);
}

#[test]
fn test_groups_are_run_length_encoded() {
    let geometry = ModelAssembler.assemble(&materials(&["a", "b", "a"])).unwrap();
    assert_eq!(geometry.groups.len(), 3);
    assert_eq!(geometry.materials.len(), 2);
    assert_eq!(geometry.groups[0].material_index, geometry.groups[2].material_index);

    let geometry = ModelAssembler.assemble(&materials(&["a", "a", "b", "b", "a"])).unwrap();
    let keys: Vec<&str> = geometry
        .groups
        .iter()
        .map(|g| geometry.material_of(g).unwrap().as_str())
        .collect();
    assert_eq!(keys, vec!["a", "b", "a"]);
}

#[test]
fn test_groups_partition_index_buffer() {
    let layouts: [&[&str]; 4] = [
        &["a"],
        &["a", "b"],
        &["a", "b", "b", "c", "a", "a"],
        &["x", "x", "x", "x"],
    ];
    for layout in layouts {
        let geometry = ModelAssembler.assemble(&materials(layout)).unwrap();
        let mut cursor = 0;
        for group in &geometry.groups {
            assert_eq!(group.start, cursor);
            assert!(group.count > 0);
            cursor = group.end();
        }
        assert_eq!(cursor, geometry.vertices.index_count());
        assert_eq!(geometry.vertices.vertex_count(), layout.len() * 3);
        assert!(geometry
            .vertices
            .indices
            .iter()
            .all(|&i| (i as usize) < geometry.vertices.vertex_count()));
    }
}

#[test]
fn test_parse_and_assemble_document() {
    let doc = br#"{
        "format_version": "1.16.0",
        "minecraft:geometry": [{
            "meshes": [
                {
                    "meta_material": "pig_body",
                    "positions": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0],
                    "normal_sets": [[0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1]],
                    "uv_sets": [[0, 0, 1, 0, 1, 1, 0, 1]],
                    "triangles": [[0, 1, 2], [0, 2, 3]],
                    "weights": [[1], [1], [0.5, 0.5], [0.25, 0.25, 0.25, 0.25, 0.0]]
                },
                {
                    "meta_material": "pig_face",
                    "positions": [[0, 0, 1], [1, 0, 1], [0, 1, 1]],
                    "triangles": [0, 1, 2]
                }
            ]
        }]
    }"#;
    let submeshes = parse_model_document(doc).unwrap();
    assert_eq!(submeshes.len(), 2);

    let geometry = ModelAssembler.assemble(&submeshes).unwrap();
    assert_eq!(geometry.vertices.vertex_count(), 7);
    assert_eq!(geometry.vertices.indices[6..], [4, 5, 6]);
    assert_eq!(geometry.vertices.uvs.len(), 14);
    assert_eq!(geometry.vertices.normals.len(), 21);
    // v is flipped: (0, 0) -> (0, 1)
    assert_eq!(geometry.vertices.uvs[..2], [0.0, 1.0]);

    let skin = geometry.skin.as_ref().unwrap();
    assert_eq!(skin.weights.len(), 28);
    assert_eq!(skin.indices.len(), 28);
    assert!(skin.indices.iter().all(|&i| i == 0));
    assert_eq!(skin.weights[8..12], [0.5, 0.5, 0.0, 0.0]);
    // The unweighted second submesh gets full weight on the single bone.
    assert_eq!(skin.weights[16..20], [1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_assembly_rejects_bad_submeshes() {
    let mut short_uvs = triangle("m");
    short_uvs.uv_sets[0].pop();
    assert!(matches!(
        ModelAssembler.assemble(&[short_uvs]),
        Err(ImportError::Format(_))
    ));

    let mut out_of_range = triangle("m");
    out_of_range.triangles = vec![0, 1, 3];
    assert!(matches!(
        ModelAssembler.assemble(&[triangle("m"), out_of_range]),
        Err(ImportError::Format(_))
    ));

    assert!(matches!(
        parse_model_document(br#"{"minecraft:geometry": [{"meshes": [{"positions": [], "triangles": []}]}]}"#),
        Err(ImportError::Format(_))
    ));
}

// ===========================================================================
// Shader patching
// ===========================================================================

#[test]
fn test_tiling_table() {
    for height in [0, 16, 32, 48, 1024] {
        assert_eq!(ShaderPatcher::tile_for(18, height), AtlasTiling { x: 9.0, y: 3.0 });
        assert_eq!(ShaderPatcher::tile_for(7, height), AtlasTiling::IDENTITY);
    }
    assert_eq!(ShaderPatcher::tile_for(2, 32), AtlasTiling { x: 2.0, y: 2.0 });
    assert_eq!(ShaderPatcher::tile_for(9, 32), AtlasTiling { x: 18.0, y: 2.0 });
    assert_eq!(ShaderPatcher::tile_for(3, 36), AtlasTiling { x: 3.0, y: 3.0 });
}

#[test]
fn test_variant_patch_follows_texture_height() {
    let shader = "void main() {\n#include <uv_vertex>\ngl_Position = vec4(position, 1.0);\n}";
    let variant = ShaderVariant::new(2, UV_VERTEX_CHUNK);

    let before = variant.patch_vertex(shader, 0).unwrap();
    let after = variant.patch_vertex(shader, 64).unwrap();
    assert!(before.contains("vUv /= vec2(2.0, 1.0);"));
    assert!(after.contains("vUv /= vec2(2.0, 4.0);"));
    assert!(after.ends_with("gl_Position = vec4(position, 1.0);\n}"));
    assert_eq!(variant.cache_key(), ShaderVariant::new(2, UV_VERTEX_CHUNK).cache_key());
}

// ===========================================================================
// Entity and meta-material documents
// ===========================================================================

#[test]
fn test_entity_with_face_poses() {
    let doc = br#"{"minecraft:client_entity": {"description": {
        "identifier": "legends:piglin_bruiser",
        "geometry": {"default": "geometry.piglin_bruiser"},
        "face_poses": ["a", "b", "c", "d", "e", "f", "g", "h", "i"]
    }}}"#;
    let entity = EntityDescriptor::parse(doc).unwrap();
    assert_eq!(entity.require_geometry().unwrap(), "piglin_bruiser");
    assert_eq!(entity.face_pose_count(), 9);
}

#[test]
fn test_meta_material_entry_lookup() {
    let doc = br#"{
        "pig_body:base_entity": {"textures": {"diffuseMap": "textures/pig_body"}},
        "pig_face:base_entity_hero_face": {"textures": {
            "diffuseMap": "textures/pig_face",
            "emissiveMap": "textures/pig_face_glow",
            "coeffMap": "textures/pig_face_mer"
        }}
    }"#;
    let face = MaterialDescriptor::parse(doc, "pig_face").unwrap();
    assert_eq!(face.base_variant, "base_entity_hero_face");
    assert_eq!(
        face.textures,
        vec![
            (TextureSlot::BaseColor, "textures/pig_face".to_string()),
            (TextureSlot::Emissive, "textures/pig_face_glow".to_string()),
        ]
    );

    let body = MaterialDescriptor::parse(doc, MaterialKey::new("mobs/pig_body.json").name()).unwrap();
    assert_eq!(body.base_variant, "base_entity");
}
