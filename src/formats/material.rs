//! Provides the meta-material loader and the per-resolver material cache.
//!
//! A meta-material document holds one entry per material, keyed by
//! `"<name>:<base-variant>"`:
//!
//! ```text
//! { "pig_face:base_entity_face": { "textures": {
//!     "diffuseMap": "textures/entity/pig/pig_face",
//!     "coeffMap": "textures/entity/pig/pig_face_mer" } } }
//! ```
//!
//! [`MaterialResolver::resolve`] fetches the document once per key, builds a
//! [`MaterialInstance`] with fixed baseline shading, and starts one background
//! task per texture slot. The instance is returned before its textures load;
//! slots fill in as the tasks complete and [`MaterialInstance::loaded`] is
//! the join point for all of them.
//!
//! Everything runs on one thread. Texture tasks are spawned with
//! `tokio::task::spawn_local`, so resolution must happen inside a
//! `tokio::task::LocalSet`.
//!
//! # Examples
//! ```
//! use legends_import::formats::material::{MaterialDescriptor, TextureSlot};
//!
//! let doc = br#"{"pig_face:base_entity_face": {"textures": {
//!     "diffuseMap": "textures/pig_face", "coeffMap": "textures/pig_face_mer"}}}"#;
//! let descriptor = MaterialDescriptor::parse(doc, "pig_face").unwrap();
//! assert_eq!(descriptor.base_variant, "base_entity_face");
//! assert_eq!(
//!     descriptor.textures,
//!     vec![(TextureSlot::BaseColor, "textures/pig_face".to_string())]
//! );
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use super::entity::FacePoseConfig;
use super::shader::{AtlasTiling, ShaderVariant};
use super::shared::{decode_texture, find_by_prefix, json_str_or_none, parse_document, split_namespaced};
use super::{ImportError, ImportResult, MaterialKey, TextureData};
use crate::config::PipelineConfig;
use crate::source::AssetSource;

/// A texture slot of the fixed material model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    BaseColor,
    Normal,
    Emissive,
}

impl TextureSlot {
    /// Maps a descriptor texture key to its slot.
    ///
    /// `coeffMap` and unknown keys have no slot.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::material::TextureSlot;
    ///
    /// assert_eq!(TextureSlot::from_descriptor_key("diffuseMap"), Some(TextureSlot::BaseColor));
    /// assert_eq!(TextureSlot::from_descriptor_key("coeffMap"), None);
    /// ```
    pub fn from_descriptor_key(key: &str) -> Option<Self> {
        match key {
            "diffuseMap" => Some(TextureSlot::BaseColor),
            "normalMap" => Some(TextureSlot::Normal),
            "emissiveMap" => Some(TextureSlot::Emissive),
            _ => None,
        }
    }

    pub fn descriptor_key(&self) -> &'static str {
        match self {
            TextureSlot::BaseColor => "diffuseMap",
            TextureSlot::Normal => "normalMap",
            TextureSlot::Emissive => "emissiveMap",
        }
    }
}

/// How a material's alpha channel is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

/// Shading parameters of a material.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadingParams {
    /// Linear RGB base color.
    pub base_color: [f32; 3],
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
    /// Fragments with alpha below this are discarded.
    pub alpha_cutoff: f32,
}

impl Default for ShadingParams {
    /// Every meta-material shares these: pale cyan tint, blended,
    /// double sided, near-zero alpha cutoff.
    fn default() -> Self {
        Self {
            base_color: rgb_from_hex(0xaaeeff),
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            alpha_cutoff: 0.0001,
        }
    }
}

fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// The parsed entry of a meta-material document.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    /// The shading variant after the `:` of the entry key.
    pub base_variant: String,
    /// Recognized texture slots and their extension-less references.
    pub textures: Vec<(TextureSlot, String)>,
}

impl MaterialDescriptor {
    /// Parses the entry named `name` out of a meta-material document.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the document is malformed or has no
    /// entry for `name`.
    pub fn parse(data: &[u8], name: &str) -> ImportResult<Self> {
        let doc: Value = parse_document(data, &format!("meta-material {name}"))?;
        let object = doc
            .as_object()
            .ok_or_else(|| ImportError::format(format!("meta-material {name} is not an object")))?;

        let (key, entry) = find_by_prefix(object, name).ok_or_else(|| {
            ImportError::format(format!("meta-material document has no entry for {name}"))
        })?;
        let (_, base_variant) = split_namespaced(key);

        let mut textures = Vec::new();
        if let Some(slots) = entry.get("textures").and_then(Value::as_object) {
            for (slot_key, reference) in slots {
                let slot = TextureSlot::from_descriptor_key(slot_key);
                match (slot, json_str_or_none(reference)) {
                    (Some(slot), Some(reference)) => textures.push((slot, reference.to_string())),
                    _ => log::debug!("meta-material {name}: ignoring texture {slot_key}"),
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            base_variant: base_variant.to_string(),
            textures,
        })
    }
}

/// A resolved material whose textures fill in as they load.
pub struct MaterialInstance {
    key: MaterialKey,
    base_variant: String,
    params: ShadingParams,
    shader: Option<Rc<ShaderVariant>>,
    textures: RefCell<HashMap<TextureSlot, Arc<TextureData>>>,
    texture_height: Cell<u32>,
    pending: watch::Sender<usize>,
}

impl MaterialInstance {
    fn new(
        key: MaterialKey,
        descriptor: &MaterialDescriptor,
        shader: Option<Rc<ShaderVariant>>,
    ) -> Self {
        let (pending, _) = watch::channel(descriptor.textures.len());
        Self {
            key,
            base_variant: descriptor.base_variant.clone(),
            params: ShadingParams::default(),
            shader,
            textures: RefCell::new(HashMap::new()),
            texture_height: Cell::new(0),
            pending,
        }
    }

    pub fn key(&self) -> &MaterialKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn base_variant(&self) -> &str {
        &self.base_variant
    }

    pub fn params(&self) -> &ShadingParams {
        &self.params
    }

    /// The face-pose shader variant, for face materials.
    pub fn shader_variant(&self) -> Option<&ShaderVariant> {
        self.shader.as_deref()
    }

    /// Program cache key for hosts that compile patched shaders. Materials
    /// with the same atlas layout share a key.
    pub fn program_cache_key(&self) -> Option<&str> {
        self.shader.as_deref().map(ShaderVariant::cache_key)
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<Arc<TextureData>> {
        self.textures.borrow().get(&slot).cloned()
    }

    /// Slots bound so far, in slot order.
    pub fn bound_slots(&self) -> Vec<TextureSlot> {
        let mut slots: Vec<TextureSlot> = self.textures.borrow().keys().copied().collect();
        slots.sort();
        slots
    }

    /// Height of the most recently loaded texture, or 0 before any load.
    pub fn texture_height(&self) -> u32 {
        self.texture_height.get()
    }

    /// Atlas tiling at the current texture height.
    pub fn tiling(&self) -> AtlasTiling {
        self.shader
            .as_ref()
            .map_or(AtlasTiling::IDENTITY, |s| s.tiling(self.texture_height()))
    }

    /// Texture slots whose load has not settled yet.
    pub fn pending_textures(&self) -> usize {
        *self.pending.borrow()
    }

    pub fn is_loaded(&self) -> bool {
        self.pending_textures() == 0
    }

    /// Waits until every texture slot has either loaded or failed.
    pub async fn loaded(&self) {
        let mut pending = self.pending.subscribe();
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    /// Returns the vertex shader this material should compile.
    ///
    /// Face materials get the atlas UV remap for the texture height observed
    /// so far; other materials get `source` back unchanged. Hosts call this
    /// at compile time, so a height that arrives later is picked up on the
    /// next compile.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if a face material's source lacks the
    /// anchor chunk.
    pub fn vertex_shader(&self, source: &str) -> ImportResult<String> {
        match &self.shader {
            Some(variant) => variant.patch_vertex(source, self.texture_height()),
            None => Ok(source.to_string()),
        }
    }

    fn bind_texture(&self, slot: TextureSlot, texture: Arc<TextureData>) {
        self.texture_height.set(texture.height);
        self.textures.borrow_mut().insert(slot, texture);
        self.settle_slot();
    }

    fn settle_slot(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl fmt::Debug for MaterialInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialInstance")
            .field("key", &self.key)
            .field("base_variant", &self.base_variant)
            .field("shader", &self.program_cache_key())
            .field("bound_slots", &self.bound_slots())
            .field("pending_textures", &self.pending_textures())
            .finish_non_exhaustive()
    }
}

/// Result of one resolution, `None` while it is in flight.
type Outcome = Option<ImportResult<Rc<MaterialInstance>>>;

enum CacheEntry {
    Loading(watch::Receiver<Outcome>),
    Ready(Rc<MaterialInstance>),
}

struct ResolverInner {
    source: Rc<dyn AssetSource>,
    config: PipelineConfig,
    face_poses: RefCell<Option<FacePoseConfig>>,
    materials: RefCell<HashMap<MaterialKey, CacheEntry>>,
    variants: RefCell<HashMap<usize, Rc<ShaderVariant>>>,
}

impl ResolverInner {
    async fn bind_texture(&self, instance: &MaterialInstance, slot: TextureSlot, reference: &str) {
        match self.load_texture(reference).await {
            Ok(texture) => {
                log::debug!(
                    "bound {}x{} {:?} texture to {}",
                    texture.width,
                    texture.height,
                    slot,
                    instance.key()
                );
                instance.bind_texture(slot, texture);
            }
            Err(err) => {
                log::error!("{}: {:?} texture left unset: {err}", instance.key(), slot);
                instance.settle_slot();
            }
        }
    }

    async fn load_texture(&self, reference: &str) -> ImportResult<Arc<TextureData>> {
        let [primary, fallback] = self.config.texture_paths(reference);
        match self.fetch_texture(&primary).await {
            Ok(texture) => return Ok(texture),
            Err(err) => log::warn!("{err}; retrying as {fallback}"),
        }
        self.fetch_texture(&fallback).await
    }

    async fn fetch_texture(&self, path: &str) -> ImportResult<Arc<TextureData>> {
        let data = self.source.fetch(path).await?;
        decode_texture(&data, self.config.texture_filter).map_err(|source| ImportError::Texture {
            path: path.to_string(),
            source: Arc::new(source),
        })
    }
}

/// Resolves material keys into shared [`MaterialInstance`]s.
///
/// Clones share one cache. Each key is fetched at most once while the
/// resolver lives; concurrent requests for a key that is still loading wait
/// on the same in-flight resolution and receive its result, success or
/// failure. A failed resolution leaves no cache entry behind, so a request
/// made after the failure tries again.
#[derive(Clone)]
pub struct MaterialResolver {
    inner: Rc<ResolverInner>,
}

impl MaterialResolver {
    /// Creates a resolver reading descriptors and textures from `source`.
    ///
    /// # Examples
    /// ```
    /// use std::rc::Rc;
    ///
    /// use legends_import::config::PipelineConfig;
    /// use legends_import::formats::material::MaterialResolver;
    /// use legends_import::source::MemorySource;
    ///
    /// let resolver = MaterialResolver::new(Rc::new(MemorySource::new()), PipelineConfig::default());
    /// assert_eq!(resolver.resolved_count(), 0);
    /// ```
    pub fn new(source: Rc<dyn AssetSource>, config: PipelineConfig) -> Self {
        Self {
            inner: Rc::new(ResolverInner {
                source,
                config,
                face_poses: RefCell::new(None),
                materials: RefCell::new(HashMap::new()),
                variants: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Sets the face poses used for face materials resolved from now on.
    pub fn set_face_poses(&self, face_poses: FacePoseConfig) {
        *self.inner.face_poses.borrow_mut() = Some(face_poses);
    }

    pub fn face_pose_count(&self) -> usize {
        self.inner
            .face_poses
            .borrow()
            .as_ref()
            .map_or(0, FacePoseConfig::len)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Resolves `key`, fetching its descriptor on first use.
    ///
    /// The returned instance may still be loading textures. Must be awaited
    /// inside a `tokio::task::LocalSet`.
    ///
    /// # Errors
    /// Returns [`ImportError::ResourceNotFound`] if the descriptor is missing
    /// and [`ImportError::Format`] if it is malformed.
    pub async fn resolve(&self, key: &MaterialKey) -> ImportResult<Rc<MaterialInstance>> {
        wait_outcome(self.track(key), key).await
    }

    /// Starts resolving `key` in the background and returns a handle to the
    /// eventual instance. Failures are logged.
    ///
    /// Must be called inside a `tokio::task::LocalSet`.
    pub fn request(&self, key: &MaterialKey) -> MaterialHandle {
        MaterialHandle {
            key: key.clone(),
            outcome: self.track(key),
        }
    }

    /// Returns the instance for `key` if it has already resolved.
    pub fn cached(&self, key: &MaterialKey) -> Option<Rc<MaterialInstance>> {
        match self.inner.materials.borrow().get(key) {
            Some(CacheEntry::Ready(material)) => Some(material.clone()),
            _ => None,
        }
    }

    /// Number of keys that have resolved successfully.
    pub fn resolved_count(&self) -> usize {
        self.inner
            .materials
            .borrow()
            .values()
            .filter(|entry| matches!(entry, CacheEntry::Ready(_)))
            .count()
    }

    /// Returns a receiver for the outcome of resolving `key`, joining the
    /// in-flight resolution or starting one.
    fn track(&self, key: &MaterialKey) -> watch::Receiver<Outcome> {
        let mut materials = self.inner.materials.borrow_mut();
        match materials.get(key) {
            Some(CacheEntry::Ready(material)) => return watch::channel(Some(Ok(material.clone()))).1,
            // A closed channel means the resolving task was dropped; start over.
            Some(CacheEntry::Loading(outcome)) if outcome.has_changed().is_ok() => {
                return outcome.clone()
            }
            _ => {}
        }

        let (sender, outcome) = watch::channel(None);
        materials.insert(key.clone(), CacheEntry::Loading(outcome.clone()));
        drop(materials);

        let resolver = self.clone();
        let key = key.clone();
        tokio::task::spawn_local(async move {
            let result = resolver.load(&key).await;
            {
                let mut materials = resolver.inner.materials.borrow_mut();
                match &result {
                    Ok(material) => {
                        materials.insert(key.clone(), CacheEntry::Ready(material.clone()));
                    }
                    Err(err) => {
                        log::error!("failed to resolve meta-material {key}: {err}");
                        materials.remove(&key);
                    }
                }
            }
            sender.send_replace(Some(result));
        });

        outcome
    }

    async fn load(&self, key: &MaterialKey) -> ImportResult<Rc<MaterialInstance>> {
        let path = self.inner.config.material_path(key);
        log::debug!("fetching meta-material {path}");

        let data = self.inner.source.fetch(&path).await?;
        let descriptor = MaterialDescriptor::parse(&data, key.name())?;

        let shader = self
            .inner
            .config
            .is_face_variant(&descriptor.base_variant)
            .then(|| self.shader_variant());
        let instance = Rc::new(MaterialInstance::new(key.clone(), &descriptor, shader));

        for (slot, reference) in descriptor.textures {
            let inner = self.inner.clone();
            let instance = instance.clone();
            tokio::task::spawn_local(async move {
                inner.bind_texture(&instance, slot, &reference).await;
            });
        }

        Ok(instance)
    }

    fn shader_variant(&self) -> Rc<ShaderVariant> {
        let count = self.face_pose_count();
        if count == 0 {
            log::warn!("face material resolved without face poses; atlas tiling disabled");
        }
        self.inner
            .variants
            .borrow_mut()
            .entry(count)
            .or_insert_with(|| Rc::new(ShaderVariant::new(count, &self.inner.config.shader_anchor)))
            .clone()
    }
}

async fn wait_outcome(
    mut outcome: watch::Receiver<Outcome>,
    key: &MaterialKey,
) -> ImportResult<Rc<MaterialInstance>> {
    let result = match outcome.wait_for(Option::is_some).await {
        Ok(result) => (*result).clone(),
        Err(_) => None,
    };
    result.unwrap_or_else(|| {
        Err(ImportError::Abandoned {
            key: key.to_string(),
        })
    })
}

/// A material slot of a model, filled once its material resolves.
///
/// The handle keeps the outcome of the resolution it was issued for; waiting
/// on it never starts another fetch.
#[derive(Clone, Debug)]
pub struct MaterialHandle {
    key: MaterialKey,
    outcome: watch::Receiver<Outcome>,
}

impl MaterialHandle {
    pub fn key(&self) -> &MaterialKey {
        &self.key
    }

    /// The instance, if resolution has finished successfully.
    pub fn get(&self) -> Option<Rc<MaterialInstance>> {
        match &*self.outcome.borrow() {
            Some(Ok(material)) => Some(material.clone()),
            _ => None,
        }
    }

    /// Waits for the instance.
    ///
    /// # Errors
    /// Returns the resolution error if the material cannot be resolved.
    pub async fn wait(&self) -> ImportResult<Rc<MaterialInstance>> {
        wait_outcome(self.outcome.clone(), &self.key).await
    }
}
