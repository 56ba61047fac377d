use super::{material_asset_path, AssetError, AssetStore, Material, MaterialReference};

/// Fallback file name for a material whose name sanitizes to nothing.
const UNNAMED_MATERIAL: &str = "Material";

/// Turns persisted [`MaterialReference`]s into live materials.
///
/// Order: GUID lookup, exact name search over the whole store, then creation
/// of a new material in the fallback folder.
pub struct MaterialResolver<'a, S: AssetStore + ?Sized> {
    store: &'a mut S,
    fallback_folder: &'a str,
}

impl<'a, S: AssetStore + ?Sized> MaterialResolver<'a, S> {
    pub fn new(store: &'a mut S, fallback_folder: &'a str) -> Self {
        Self {
            store,
            fallback_folder,
        }
    }

    /// `Ok(None)` means the slot should stay unassigned.
    pub fn resolve(&mut self, reference: &MaterialReference) -> Result<Option<Material>, AssetError> {
        if let Some(guid) = &reference.guid {
            if let Some(material) = self.store.material_by_guid(guid) {
                return Ok(Some(material));
            }
            log::debug!("Material GUID {} not found, falling back to name", guid);
        }

        let Some(name) = &reference.name else {
            return Ok(None);
        };

        if let Some(material) = self.store.materials_named(name).into_iter().next() {
            return Ok(Some(material));
        }

        let file_name = safe_file_name(name);
        let path = material_asset_path(self.fallback_folder, &file_name);
        if let Some(material) = self.store.material_at_path(&path) {
            return Ok(Some(material));
        }

        let material = self.store.create_material(&file_name, self.fallback_folder)?;
        log::warn!("Created missing material '{}' at {}", name, material.path);
        Ok(Some(material))
    }
}

/// File-system-legal form of a material name.
pub fn safe_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        UNNAMED_MATERIAL.to_string()
    } else {
        trimmed.to_string()
    }
}
