//! Provides the entity import pipeline.
//!
//! [`EntityLoader`] walks the asset graph of one entity: the client entity
//! document, its model document, and every meta-material the model
//! references. Geometry is ready when `load` returns; materials resolve and
//! textures stream in afterwards on the same `LocalSet`.
//!
//! # Examples
//! ```
//! use std::rc::Rc;
//!
//! use legends_import::config::PipelineConfig;
//! use legends_import::pipeline::EntityLoader;
//! use legends_import::source::MemorySource;
//!
//! let source = MemorySource::new();
//! source.insert(
//!     "entity/pig.entity.json",
//!     br#"{"minecraft:client_entity": {"description": {"geometry": {"default": "geometry.pig"}}}}"#.to_vec(),
//! );
//! source.insert(
//!     "models/entity/pig.model.json",
//!     br#"{"minecraft:geometry": [{"meshes": [{"meta_material": "pig_body",
//!         "positions": [[0,0,0],[1,0,0],[0,1,0]], "triangles": [0,1,2]}]}]}"#.to_vec(),
//! );
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let local = tokio::task::LocalSet::new();
//! let node = local.block_on(&runtime, async {
//!     let loader = EntityLoader::new(Rc::new(source), PipelineConfig::default());
//!     loader.load("entity/pig.entity.json").await
//! });
//! assert_eq!(node.unwrap().model.geometry.vertices.vertex_count(), 3);
//! ```

use std::rc::Rc;

use crate::config::PipelineConfig;
use crate::formats::entity::{EntityComposer, EntityDescriptor, EntityNode};
use crate::formats::material::{MaterialInstance, MaterialResolver};
use crate::formats::model::{Model, ModelLoader};
use crate::formats::ImportResult;
use crate::source::AssetSource;

/// Loads entities and their asset graphs from an [`AssetSource`].
pub struct EntityLoader {
    source: Rc<dyn AssetSource>,
    config: PipelineConfig,
}

impl EntityLoader {
    pub fn new(source: Rc<dyn AssetSource>, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the entity document at `entity_path` and everything it
    /// references.
    ///
    /// Must be awaited inside a `tokio::task::LocalSet`. Materials are
    /// requested but not awaited; use [`settle`] to wait for them.
    ///
    /// # Errors
    /// Returns [`ImportError::ResourceNotFound`](crate::formats::ImportError::ResourceNotFound)
    /// if the entity or model document is missing and
    /// [`ImportError::Format`](crate::formats::ImportError::Format) if either
    /// is malformed.
    pub async fn load(&self, entity_path: &str) -> ImportResult<EntityNode> {
        log::debug!("fetching client entity {entity_path}");
        let data = self.source.fetch(entity_path).await?;
        self.load_from_bytes(&data).await
    }

    /// Loads an entity whose document is already in memory.
    ///
    /// # Errors
    /// Same as [`EntityLoader::load`].
    pub async fn load_from_bytes(&self, data: &[u8]) -> ImportResult<EntityNode> {
        let descriptor = EntityDescriptor::parse(data)?;
        let geometry = descriptor.require_geometry()?;

        let resolver = MaterialResolver::new(self.source.clone(), self.config.clone());
        if let Some(face_poses) = &descriptor.face_poses {
            resolver.set_face_poses(face_poses.clone());
        }

        let model_path = self.config.model_path(geometry);
        log::debug!("fetching model {model_path}");
        let model_data = self.source.fetch(&model_path).await?;
        let model = ModelLoader::new(resolver).load_from_bytes(&model_data)?;

        log::info!(
            "loaded {}: {} vertices, {} triangles, {} material groups, {} materials",
            descriptor.identifier.as_deref().unwrap_or(geometry),
            model.geometry.vertices.vertex_count(),
            model.geometry.vertices.index_count() / 3,
            model.geometry.groups.len(),
            model.materials.len()
        );

        EntityComposer.compose(descriptor, model)
    }
}

/// Waits for every material of `model` to resolve and finish loading its
/// textures.
///
/// Results are in material index order. A material that failed to resolve
/// yields its error; the others still settle.
pub async fn settle(model: &Model) -> Vec<ImportResult<Rc<MaterialInstance>>> {
    let mut settled = Vec::with_capacity(model.materials.len());
    for handle in &model.materials {
        let result = handle.wait().await;
        if let Ok(material) = &result {
            material.loaded().await;
        }
        settled.push(result);
    }
    settled
}
