//! Versioned snapshot of a hierarchy's renderers and material assignments.
//!
//! A snapshot is captured once and later restored onto a hierarchy that is
//! structurally similar but not necessarily identical to the original.

pub mod codec;

pub use codec::{
    load_snapshot_from_file, parse, save_snapshot_to_file, serialize, SnapshotError,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::GeometrySignature;
use crate::identity::StableId;
use crate::materials::MaterialReference;
use crate::matching::path::persisted_path;
use crate::scene::{Hierarchy, RenderElement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Free-form producer version, informational only.
    #[serde(rename = "unityVersion", default)]
    pub producer_version: String,
    #[serde(rename = "datetimeIso")]
    pub captured_at: DateTime<Utc>,
    pub root_name: String,
    #[serde(default)]
    pub entries: Vec<SnapshotEntry>,
}

/// Persisted form of one renderable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    /// Normalized path from the root, root segment included.
    pub normalized_path: String,
    /// Absent when the element had no geometry; persisted as a zeroed object.
    #[serde(default, with = "mesh_sig_object")]
    pub mesh_sig: Option<MeshSig>,
    #[serde(default)]
    pub slots: Vec<MaterialReference>,
}

/// Geometry signature plus the mesh asset identity, when it had one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshSig {
    #[serde(default)]
    pub mesh_guid: String,
    #[serde(default)]
    pub mesh_local_id: i64,
    #[serde(flatten)]
    pub signature: GeometrySignature,
}

impl MeshSig {
    pub fn stable_id(&self) -> Option<StableId> {
        StableId::new(&self.mesh_guid, self.mesh_local_id)
    }

    /// Neither geometry nor asset identity.
    pub fn is_empty(&self) -> bool {
        self.signature.is_empty() && self.stable_id().is_none()
    }
}

/// `meshSig` is always written as an object. A zeroed one without identity
/// reads back as no geometry.
mod mesh_sig_object {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::MeshSig;

    pub fn serialize<S: Serializer>(value: &Option<MeshSig>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(sig) => sig.serialize(serializer),
            None => MeshSig::default().serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MeshSig>, D::Error> {
        let value = Option::<MeshSig>::deserialize(deserializer)?;
        Ok(value.filter(|sig| !sig.is_empty()))
    }
}

impl SnapshotEntry {
    pub fn from_element(element: &RenderElement) -> Self {
        let mesh_sig = element.signature.as_ref().map(|signature| MeshSig {
            mesh_guid: element
                .stable_id
                .as_ref()
                .map(|id| id.guid().to_string())
                .unwrap_or_default(),
            mesh_local_id: element.stable_id.as_ref().map_or(0, StableId::local_id),
            signature: signature.clone(),
        });

        Self {
            normalized_path: persisted_path(&element.path),
            mesh_sig,
            slots: element.material_references(),
        }
    }
}

/// Captures every renderable element of `hierarchy`, timestamped now.
pub fn capture<H: Hierarchy + ?Sized>(hierarchy: &H, producer_version: &str) -> Snapshot {
    capture_at(hierarchy, producer_version, Utc::now())
}

pub fn capture_at<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    producer_version: &str,
    captured_at: DateTime<Utc>,
) -> Snapshot {
    let entries: Vec<SnapshotEntry> = hierarchy
        .render_elements()
        .iter()
        .map(SnapshotEntry::from_element)
        .collect();

    log::info!(
        "Captured {} entries from '{}'",
        entries.len(),
        hierarchy.root_name()
    );

    Snapshot {
        producer_version: producer_version.to_string(),
        captured_at,
        root_name: hierarchy.root_name().to_string(),
        entries,
    }
}
