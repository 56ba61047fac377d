use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Only the first submeshes contribute triangle counts to a signature.
pub const MAX_TRIANGLE_COUNTS: usize = 8;

/// Bounds are compared at millimetre precision (3 decimals).
const BOUNDS_QUANTUM: f64 = 1000.0;

/// Content fingerprint of one mesh.
///
/// `name` is carried for display and persistence only; it never takes part in
/// equality or distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometrySignature {
    #[serde(rename = "meshName", default)]
    pub name: String,
    pub vertex_count: u32,
    #[serde(rename = "subMeshCount")]
    pub submesh_count: u32,
    #[serde(rename = "triCounts", default)]
    pub triangle_counts: Vec<u32>,
    #[serde(with = "vec3_xyz")]
    pub bounds_center: Vec3,
    #[serde(with = "vec3_xyz")]
    pub bounds_extents: Vec3,
}

/// Hashable form of a signature used for exact matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    vertex_count: u32,
    submesh_count: u32,
    triangle_counts: Vec<u32>,
    center: [i64; 3],
    extents: [i64; 3],
}

impl GeometrySignature {
    /// A zeroed signature stands for missing geometry and never matches by
    /// signature or distance.
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0 && self.submesh_count == 0
    }

    pub fn key(&self) -> SignatureKey {
        SignatureKey {
            vertex_count: self.vertex_count,
            submesh_count: self.submesh_count,
            triangle_counts: self
                .triangle_counts
                .iter()
                .take(MAX_TRIANGLE_COUNTS)
                .copied()
                .collect(),
            center: quantize(self.bounds_center),
            extents: quantize(self.bounds_extents),
        }
    }

    /// Exact signature equality: counts, triangle sequence and rounded bounds.
    pub fn matches(&self, other: &GeometrySignature) -> bool {
        self.key() == other.key()
    }

    /// Fuzzy distance between two signatures; lower is closer.
    pub fn distance(&self, other: &GeometrySignature) -> f64 {
        let vertices = abs_diff(self.vertex_count, other.vertex_count);
        let submeshes = abs_diff(self.submesh_count, other.submesh_count);
        let triangles: f64 = self
            .triangle_counts
            .iter()
            .zip(other.triangle_counts.iter())
            .take(MAX_TRIANGLE_COUNTS)
            .map(|(a, b)| abs_diff(*a, *b))
            .sum();
        let center = self.bounds_center.distance(other.bounds_center) as f64;
        let extents = self.bounds_extents.distance(other.bounds_extents) as f64;

        vertices + 10.0 * submeshes + 0.5 * triangles + 0.1 * center + 0.1 * extents
    }
}

fn abs_diff(a: u32, b: u32) -> f64 {
    (a as f64 - b as f64).abs()
}

fn quantize(v: Vec3) -> [i64; 3] {
    // `as i64` folds -0.0 into 0, so noise around zero keys identically.
    let q = |value: f32| (value as f64 * BOUNDS_QUANTUM).round() as i64;
    [q(v.x), q(v.y), q(v.z)]
}

/// Vectors are persisted as `{ "x": .., "y": .., "z": .. }` objects.
mod vec3_xyz {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let xyz = Xyz::deserialize(deserializer)?;
        Ok(Vec3::new(xyz.x, xyz.y, xyz.z))
    }
}
