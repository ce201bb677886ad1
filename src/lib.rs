//! Provides an import pipeline for Legends entity assets.
//!
//! An entity is described by a chain of JSON documents: a client entity
//! document names a geometry, the geometry's model document lists submeshes,
//! and each submesh references a meta-material whose textures load in the
//! background. This crate walks that chain through an [`source::AssetSource`],
//! assembles the submeshes into one indexed vertex buffer with material
//! groups, and resolves materials into shared, lazily textured instances.
//!
//! Face materials sample a face-pose atlas; [`formats::shader`] computes the
//! atlas tiling and patches the vertex shader UV remap.
//!
//! The pipeline is single threaded. Loads must run inside a
//! `tokio::task::LocalSet` on a current-thread runtime.
//!
//! # Examples
//! ```
//! use legends_import::formats::model::{parse_model_document, ModelAssembler};
//!
//! let doc = br#"{"minecraft:geometry": [{"meshes": [{"meta_material": "pig_body",
//!     "positions": [[0,0,0],[1,0,0],[0,1,0]], "uv_sets": [[[0,0],[1,0],[0,1]]],
//!     "triangles": [0,1,2]}]}]}"#;
//! let submeshes = parse_model_document(doc).unwrap();
//! let geometry = ModelAssembler.assemble(&submeshes).unwrap();
//! assert_eq!(geometry.groups.len(), 1);
//! assert_eq!(geometry.vertices.uvs[1], 1.0);
//! ```

pub mod config;
pub mod formats;
pub mod pipeline;
pub mod source;
