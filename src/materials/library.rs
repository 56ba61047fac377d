use std::path::Path;

use sha2::{Digest, Sha256};

use super::{material_asset_path, AssetError, AssetStore, Material};

/// In-memory material store, persisted as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    pub fn with_materials(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Registers an existing material; replaces any entry with the same GUID.
    pub fn insert(&mut self, material: Material) {
        match self.materials.iter_mut().find(|m| m.guid == material.guid) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), AssetError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl AssetStore for MaterialLibrary {
    fn material_by_guid(&self, guid: &str) -> Option<Material> {
        self.materials.iter().find(|m| m.guid == guid).cloned()
    }

    fn materials_named(&self, name: &str) -> Vec<Material> {
        self.materials
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }

    fn material_at_path(&self, path: &str) -> Option<Material> {
        self.materials.iter().find(|m| m.path == path).cloned()
    }

    fn create_material(&mut self, name: &str, folder: &str) -> Result<Material, AssetError> {
        if name.is_empty() {
            return Err(AssetError::CreateMaterial {
                name: name.to_string(),
                folder: folder.to_string(),
                reason: "empty material name".to_string(),
            });
        }
        let path = material_asset_path(folder, name);
        if self.material_at_path(&path).is_some() {
            return Err(AssetError::AlreadyExists { path });
        }

        let material = Material {
            guid: guid_for_path(&path),
            name: name.to_string(),
            path,
        };
        self.materials.push(material.clone());
        Ok(material)
    }
}

/// 32 hex digits derived from the asset path, so re-creating a material at the
/// same location yields the same GUID.
fn guid_for_path(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    digest[..16].iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::{guid_for_path, MaterialLibrary};
    use crate::materials::{AssetError, AssetStore, Material};

    #[test]
    fn created_guid_is_deterministic() {
        let a = guid_for_path("Assets/Materials/Gold.mat");
        let b = guid_for_path("Assets/Materials/Gold.mat");
        let c = guid_for_path("Assets/Materials/Silver.mat");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn create_rejects_occupied_path() {
        let mut library = MaterialLibrary::new();
        let created = library.create_material("Gold", "Assets/Materials").unwrap();
        assert_eq!(created.path, "Assets/Materials/Gold.mat");
        assert_eq!(library.material_by_guid(&created.guid), Some(created));

        let again = library.create_material("Gold", "Assets/Materials");
        assert!(matches!(again, Err(AssetError::AlreadyExists { .. })));
    }

    #[test]
    fn name_search_returns_all_matches_in_order() {
        let library = MaterialLibrary::with_materials(vec![
            Material {
                guid: "1".to_string(),
                name: "Wood".to_string(),
                path: "A/Wood.mat".to_string(),
            },
            Material {
                guid: "2".to_string(),
                name: "Wood".to_string(),
                path: "B/Wood.mat".to_string(),
            },
        ]);
        let found = library.materials_named("Wood");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].guid, "1");
        assert!(library.materials_named("wood").is_empty());
    }

    #[test]
    fn insert_replaces_same_guid() {
        let mut library = MaterialLibrary::new();
        library.insert(Material {
            guid: "1".to_string(),
            name: "Wood".to_string(),
            path: "A/Wood.mat".to_string(),
        });
        library.insert(Material {
            guid: "1".to_string(),
            name: "Oak".to_string(),
            path: "A/Oak.mat".to_string(),
        });
        assert_eq!(library.materials().len(), 1);
        assert_eq!(library.materials()[0].name, "Oak");
    }

    #[test]
    fn library_file_roundtrip() {
        let mut library = MaterialLibrary::new();
        library.create_material("Gold", "Assets/Materials").unwrap();

        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!(
            "relink_library_{}_{}.json",
            std::process::id(),
            nonce
        ));

        library.save_to_file(&path).unwrap();
        let loaded = MaterialLibrary::load_from_file(&path).unwrap();
        assert_eq!(loaded, library);

        let _ = std::fs::remove_file(path);
    }
}
