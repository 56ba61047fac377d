pub mod library;
pub mod resolver;

pub use library::MaterialLibrary;
pub use resolver::{safe_file_name, MaterialResolver};

use serde::{Deserialize, Serialize};

/// File extension of material assets created by the resolver.
pub const MATERIAL_EXTENSION: &str = "mat";

/// A live material asset known to the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub guid: String,
    pub name: String,
    pub path: String,
}

impl Material {
    /// Persistable reference to this material.
    pub fn reference(&self) -> MaterialReference {
        MaterialReference::new(Some(&self.guid), Some(&self.name))
    }
}

/// Persisted identity of a material: the asset GUID when known, plus the
/// display name as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialReference {
    #[serde(rename = "materialGuid", default, with = "empty_as_none")]
    pub guid: Option<String>,
    #[serde(rename = "materialName", default)]
    pub name: Option<String>,
}

impl MaterialReference {
    pub fn new(guid: Option<&str>, name: Option<&str>) -> Self {
        Self {
            guid: guid.filter(|guid| !guid.is_empty()).map(str::to_string),
            name: name.filter(|name| !name.is_empty()).map(str::to_string),
        }
    }

    /// Reference for an empty slot.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.guid.is_none() && self.name.is_none()
    }

    /// Same GUID when both carry one, otherwise same name.
    pub fn refers_to_same(&self, other: &MaterialReference) -> bool {
        match (&self.guid, &other.guid) {
            (Some(a), Some(b)) => a == b,
            _ => self.name.is_some() && self.name == other.name,
        }
    }
}

/// Backing asset store consulted by the [`MaterialResolver`].
pub trait AssetStore {
    fn material_by_guid(&self, guid: &str) -> Option<Material>;

    /// Every material with exactly this name, whether or not anything uses it.
    fn materials_named(&self, name: &str) -> Vec<Material>;

    fn material_at_path(&self, path: &str) -> Option<Material>;

    /// Creates and persists a new material named `name` inside `folder`.
    fn create_material(&mut self, name: &str, folder: &str) -> Result<Material, AssetError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to create material '{name}' in {folder}: {reason}")]
    CreateMaterial {
        name: String,
        folder: String,
        reason: String,
    },
    #[error("an asset already exists at {path}")]
    AlreadyExists { path: String },
    #[error("failed to access material library at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid material library JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Asset path of a material named `file_name` inside `folder`.
pub fn material_asset_path(folder: &str, file_name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        format!("{}.{}", file_name, MATERIAL_EXTENSION)
    } else {
        format!("{}/{}.{}", folder, file_name, MATERIAL_EXTENSION)
    }
}

/// GUIDs are written as empty strings when absent.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|value| !value.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::{material_asset_path, MaterialReference};

    #[test]
    fn empty_parts_are_absent() {
        let reference = MaterialReference::new(Some(""), Some(""));
        assert!(reference.is_empty());
        assert_eq!(reference, MaterialReference::none());
    }

    #[test]
    fn guid_takes_precedence_over_name() {
        let a = MaterialReference::new(Some("aa"), Some("Gold"));
        let b = MaterialReference::new(Some("bb"), Some("Gold"));
        let c = MaterialReference::new(None, Some("Gold"));
        assert!(!a.refers_to_same(&b));
        assert!(a.refers_to_same(&c));
        assert!(!MaterialReference::none().refers_to_same(&MaterialReference::none()));
    }

    #[test]
    fn persisted_form() {
        let json = serde_json::to_value(MaterialReference::none()).unwrap();
        assert_eq!(json, serde_json::json!({ "materialGuid": "", "materialName": null }));

        let parsed: MaterialReference =
            serde_json::from_str(r#"{ "materialGuid": "", "materialName": "Brass" }"#).unwrap();
        assert_eq!(parsed.guid, None);
        assert_eq!(parsed.name.as_deref(), Some("Brass"));

        let parsed: MaterialReference = serde_json::from_str(r#"{ "extra": 1 }"#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn asset_paths() {
        assert_eq!(
            material_asset_path("Assets/Materials/", "Gold"),
            "Assets/Materials/Gold.mat"
        );
        assert_eq!(material_asset_path("", "Gold"), "Gold.mat");
    }
}
