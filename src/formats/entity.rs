//! Provides the client entity document loader and [`EntityComposer`].
//!
//! A client entity document names the geometry an entity renders with and,
//! for entities with animated faces, the list of face poses packed into the
//! face atlas:
//!
//! ```text
//! { "minecraft:client_entity": { "description": {
//!     "identifier": "minecraft:pig",
//!     "geometry": { "default": "geometry.pig" },
//!     "face_poses": ["idle", "blink"] } } }
//! ```
//!
//! # Examples
//! ```
//! use legends_import::formats::entity::EntityDescriptor;
//!
//! let doc = br#"{"minecraft:client_entity": {"description": {
//!     "identifier": "minecraft:pig",
//!     "geometry": {"default": "geometry.pig"}}}}"#;
//! let entity = EntityDescriptor::parse(doc).unwrap();
//! assert_eq!(entity.geometry_name(), Some("pig"));
//! assert!(entity.face_poses.is_none());
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::model::Model;
use super::shared::{find_namespaced, json_str_or_none, parse_document};
use super::{ImportError, ImportResult};

/// Ordered face poses of an entity.
///
/// Only the number of poses matters to rendering: it selects the atlas
/// layout of face materials. Entries are kept as raw JSON, so plain pose
/// names and pose objects are both accepted.
///
/// # Examples
/// ```
/// use legends_import::formats::entity::FacePoseConfig;
///
/// let poses = FacePoseConfig::new(["idle", "blink"]);
/// assert_eq!(poses.len(), 2);
/// assert_eq!(poses.name(1), Some("blink"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FacePoseConfig {
    poses: Vec<Value>,
}

impl FacePoseConfig {
    pub fn new<I>(poses: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            poses: poses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn poses(&self) -> &[Value] {
        &self.poses
    }

    /// Name of the pose at `index`: the entry itself when it is a string,
    /// or its `name` field when it is an object.
    pub fn name(&self, index: usize) -> Option<&str> {
        let pose = self.poses.get(index)?;
        json_str_or_none(pose).or_else(|| pose.get("name").and_then(json_str_or_none))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawDescription {
    identifier: Option<String>,
    geometry: Option<Value>,
    face_poses: Option<FacePoseConfig>,
}

/// The parsed description block of a client entity document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityDescriptor {
    pub identifier: Option<String>,
    /// The `geometry.default` reference, e.g. `geometry.pig`.
    pub geometry: Option<String>,
    pub face_poses: Option<FacePoseConfig>,
}

impl EntityDescriptor {
    /// Parses a client entity document.
    ///
    /// A missing geometry reference is not an error here; it is reported by
    /// [`EntityDescriptor::require_geometry`] when the entity is composed.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the document is malformed or has no
    /// `client_entity` block.
    pub fn parse(data: &[u8]) -> ImportResult<Self> {
        let doc: Value = parse_document(data, "client entity")?;
        let object = doc
            .as_object()
            .ok_or_else(|| ImportError::format("client entity document is not an object"))?;
        let (_, entity) = find_namespaced(object, "client_entity")
            .ok_or_else(|| ImportError::format("missing client_entity block"))?;

        let description: RawDescription = match entity.get("description") {
            Some(description) => serde_json::from_value(description.clone())
                .map_err(|e| ImportError::format(format!("client entity description: {e}")))?,
            None => RawDescription::default(),
        };

        let geometry = description
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.get("default"))
            .and_then(json_str_or_none)
            .map(str::to_string);

        Ok(Self {
            identifier: description.identifier,
            geometry,
            face_poses: description.face_poses,
        })
    }

    /// Returns the geometry name: the last `.` segment of the geometry
    /// reference.
    ///
    /// # Examples
    /// ```
    /// use legends_import::formats::entity::EntityDescriptor;
    ///
    /// let entity = EntityDescriptor {
    ///     geometry: Some("geometry.mobs.pig".to_string()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(entity.geometry_name(), Some("pig"));
    /// ```
    pub fn geometry_name(&self) -> Option<&str> {
        self.geometry
            .as_deref()
            .and_then(|geometry| geometry.rsplit('.').next())
    }

    /// Returns the geometry name or a format error.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the entity has no geometry
    /// reference.
    pub fn require_geometry(&self) -> ImportResult<&str> {
        self.geometry_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ImportError::format(format!(
                    "entity {} has no geometry reference",
                    self.identifier.as_deref().unwrap_or("<anonymous>")
                ))
            })
    }

    pub fn face_pose_count(&self) -> usize {
        self.face_poses.as_ref().map_or(0, FacePoseConfig::len)
    }
}

/// A renderable entity: its description and its assembled model.
#[derive(Debug)]
pub struct EntityNode {
    pub descriptor: EntityDescriptor,
    pub model: Model,
}

impl EntityNode {
    /// The entity identifier, or the geometry name for anonymous entities.
    pub fn name(&self) -> &str {
        self.descriptor
            .identifier
            .as_deref()
            .or_else(|| self.descriptor.geometry_name())
            .unwrap_or_default()
    }
}

/// Attaches an assembled model to an entity description.
pub struct EntityComposer;

impl EntityComposer {
    /// Composes the renderable node for `descriptor`.
    ///
    /// # Errors
    /// Returns [`ImportError::Format`] if the entity has no geometry
    /// reference.
    pub fn compose(&self, descriptor: EntityDescriptor, model: Model) -> ImportResult<EntityNode> {
        descriptor.require_geometry()?;
        Ok(EntityNode { descriptor, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_face_poses() {
        let doc = br#"{
            "format_version": "1.10.0",
            "minecraft:client_entity": {"description": {
                "identifier": "minecraft:zombie",
                "geometry": {"default": "geometry.zombie"},
                "face_poses": ["idle", "blink", "angry"]
            }}
        }"#;
        let entity = EntityDescriptor::parse(doc).unwrap();
        assert_eq!(entity.identifier.as_deref(), Some("minecraft:zombie"));
        assert_eq!(entity.require_geometry().unwrap(), "zombie");
        assert_eq!(entity.face_pose_count(), 3);
        assert_eq!(entity.face_poses.unwrap().name(1), Some("blink"));
    }

    #[test]
    fn test_parse_object_face_poses() {
        let doc = br#"{"minecraft:client_entity": {"description": {
            "geometry": {"default": "geometry.villager"},
            "face_poses": [{"name": "idle"}, {"name": "blink"}, 7]
        }}}"#;
        let entity = EntityDescriptor::parse(doc).unwrap();
        assert_eq!(entity.face_pose_count(), 3);
        let poses = entity.face_poses.unwrap();
        assert_eq!(poses.name(0), Some("idle"));
        assert_eq!(poses.name(2), None);
    }

    #[test]
    fn test_parse_json5_entity() {
        let doc = b"{ // hand edited\n 'legends:client_entity': { description: { geometry: { default: 'geometry.piglin', }, }, }, }";
        let entity = EntityDescriptor::parse(doc).unwrap();
        assert_eq!(entity.geometry_name(), Some("piglin"));
        assert!(entity.identifier.is_none());
    }

    #[test]
    fn test_missing_geometry_is_reported_on_require() {
        let doc = br#"{"minecraft:client_entity": {"description": {"identifier": "minecraft:ghost"}}}"#;
        let entity = EntityDescriptor::parse(doc).unwrap();
        assert!(entity.geometry_name().is_none());
        let err = entity.require_geometry().unwrap_err();
        assert!(err.to_string().contains("minecraft:ghost"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            EntityDescriptor::parse(br#"{"minecraft:geometry": []}"#),
            Err(ImportError::Format(_))
        ));
        assert!(matches!(
            EntityDescriptor::parse(br#"{"minecraft:client_entity": {"description": {"face_poses": 3}}}"#),
            Err(ImportError::Format(_))
        ));
        assert!(EntityDescriptor::parse(b"[]").is_err());
    }
}
