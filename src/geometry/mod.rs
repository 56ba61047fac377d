pub mod signature;

pub use signature::{GeometrySignature, SignatureKey, MAX_TRIANGLE_COUNTS};

use glam::Vec3;

use crate::identity::StableId;

/// Axis-aligned bounds in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

/// Geometry description as extracted from a live hierarchy.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshData {
    pub name: String,
    /// Origin asset GUID, empty when the mesh is not backed by an individual asset.
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub local_id: i64,
    pub vertex_count: u32,
    /// Triangle count of every submesh, in submesh order.
    #[serde(default)]
    pub submesh_triangles: Vec<u32>,
    #[serde(default)]
    pub bounds: Bounds,
}

impl MeshData {
    pub fn stable_id(&self) -> Option<StableId> {
        StableId::new(&self.guid, self.local_id)
    }
}

/// Computes the fingerprint of `mesh`, or `None` when there is no geometry.
pub fn build_signature(mesh: Option<&MeshData>) -> Option<GeometrySignature> {
    let mesh = mesh?;
    Some(GeometrySignature {
        name: mesh.name.clone(),
        vertex_count: mesh.vertex_count,
        submesh_count: mesh.submesh_triangles.len() as u32,
        triangle_counts: mesh
            .submesh_triangles
            .iter()
            .take(MAX_TRIANGLE_COUNTS)
            .copied()
            .collect(),
        bounds_center: mesh.bounds.center,
        bounds_extents: mesh.bounds.extents,
    })
}

#[cfg(test)]
mod tests {
    use super::{build_signature, Bounds, MeshData};
    use glam::Vec3;

    fn mesh(submesh_triangles: Vec<u32>) -> MeshData {
        MeshData {
            name: "Column".to_string(),
            guid: String::new(),
            local_id: 0,
            vertex_count: 512,
            submesh_triangles,
            bounds: Bounds {
                center: Vec3::new(0.0, 1.5, 0.0),
                extents: Vec3::new(0.25, 1.5, 0.25),
            },
        }
    }

    #[test]
    fn missing_geometry_has_no_signature() {
        assert!(build_signature(None).is_none());
    }

    #[test]
    fn signature_is_deterministic() {
        let data = mesh(vec![100, 40]);
        let a = build_signature(Some(&data)).unwrap();
        let b = build_signature(Some(&data)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn zero_submeshes_yield_empty_triangle_counts() {
        let signature = build_signature(Some(&mesh(Vec::new()))).unwrap();
        assert_eq!(signature.submesh_count, 0);
        assert!(signature.triangle_counts.is_empty());
    }

    #[test]
    fn triangle_counts_are_capped_but_submesh_count_is_not() {
        let signature = build_signature(Some(&mesh((1..=12).collect()))).unwrap();
        assert_eq!(signature.submesh_count, 12);
        assert_eq!(signature.triangle_counts, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn stable_id_needs_guid_and_local_id() {
        let mut data = mesh(vec![1]);
        assert!(data.stable_id().is_none());
        data.guid = "c0ffee".to_string();
        assert!(data.stable_id().is_none());
        data.local_id = 4300000;
        assert_eq!(data.stable_id().unwrap().key(), "c0ffee:4300000");
    }
}
