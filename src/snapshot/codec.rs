use std::path::Path;

use super::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Pretty-printed JSON document.
pub fn serialize(snapshot: &Snapshot) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::Encode)
}

/// Parses a whole document; never returns a partially populated snapshot.
pub fn parse(bytes: &[u8]) -> Result<Snapshot> {
    serde_json::from_slice(bytes).map_err(SnapshotError::Parse)
}

pub fn save_snapshot_to_file(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let bytes = serialize(snapshot)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn load_snapshot_from_file(path: &Path) -> Result<Snapshot> {
    let bytes = std::fs::read(path)?;
    parse(&bytes)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use glam::Vec3;

    use super::{parse, serialize, SnapshotError};
    use crate::geometry::GeometrySignature;
    use crate::materials::MaterialReference;
    use crate::snapshot::{MeshSig, Snapshot, SnapshotEntry};

    fn sample() -> Snapshot {
        Snapshot {
            producer_version: "2022.3.21f1".to_string(),
            captured_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            root_name: "Museum".to_string(),
            entries: vec![
                SnapshotEntry {
                    normalized_path: "museum/room/statue".to_string(),
                    mesh_sig: Some(MeshSig {
                        mesh_guid: "c3a9".to_string(),
                        mesh_local_id: -3_216_454_988_113_233_400,
                        signature: GeometrySignature {
                            name: "Statue".to_string(),
                            vertex_count: 1000,
                            submesh_count: 2,
                            triangle_counts: vec![300, 300],
                            bounds_center: Vec3::new(0.1, 0.25, -3.5),
                            bounds_extents: Vec3::new(1.0, 2.125, 0.333),
                        },
                    }),
                    slots: vec![
                        MaterialReference::new(Some("m1"), Some("Marble")),
                        MaterialReference::new(None, Some("Gold")),
                        MaterialReference::none(),
                    ],
                },
                SnapshotEntry {
                    normalized_path: "museum/empty".to_string(),
                    mesh_sig: None,
                    slots: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_roundtrip_preserves_every_field() {
        let snapshot = sample();
        let bytes = serialize(&snapshot).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_document_field_names() {
        let bytes = serialize(&sample()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["unityVersion"], "2022.3.21f1");
        assert!(json["datetimeIso"].as_str().unwrap().starts_with("2024-05-01T09:30:00"));
        assert_eq!(json["rootName"], "Museum");

        let entry = &json["entries"][0];
        assert_eq!(entry["normalizedPath"], "museum/room/statue");
        assert_eq!(entry["meshSig"]["meshGuid"], "c3a9");
        assert_eq!(entry["meshSig"]["meshName"], "Statue");
        assert_eq!(entry["meshSig"]["triCounts"], serde_json::json!([300, 300]));
        assert_eq!(entry["meshSig"]["boundsCenter"]["z"], -3.5);
        assert_eq!(entry["slots"][1]["materialGuid"], "");
        assert_eq!(entry["slots"][2]["materialName"], serde_json::Value::Null);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r##"{
            "unityVersion": "6000.0.1f1",
            "datetimeIso": "2024-05-01T11:30:00.0000000+02:00",
            "rootName": "Museum",
            "producerTool": "exporter",
            "entries": [{
                "normalizedPath": "museum/statue",
                "meshSig": {
                    "meshGuid": "",
                    "meshLocalId": 0,
                    "meshName": "Statue",
                    "vertexCount": 8,
                    "subMeshCount": 1,
                    "triCounts": [12],
                    "boundsCenter": { "x": 0, "y": 0, "z": 0 },
                    "boundsExtents": { "x": 1, "y": 1, "z": 1 },
                    "checksum": "ignored"
                },
                "slots": [{ "materialGuid": "", "materialName": "Gold", "color": "#fff" }]
            }]
        }"##;
        let snapshot = parse(json.as_bytes()).unwrap();
        assert_eq!(
            snapshot.captured_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
        );
        let sig = snapshot.entries[0].mesh_sig.as_ref().unwrap();
        assert!(sig.stable_id().is_none());
        assert_eq!(sig.signature.triangle_counts, vec![12]);
        assert_eq!(snapshot.entries[0].slots[0].name.as_deref(), Some("Gold"));
    }

    #[test]
    fn test_malformed_documents_fail() {
        for bad in [
            "",
            "{",
            "[]",
            r#"{ "rootName": "Museum", "entries": [] }"#,
            r#"{ "datetimeIso": "yesterday", "rootName": "M" }"#,
            r#"{ "datetimeIso": "2024-05-01T09:30:00Z", "rootName": "M", "entries": [{ "normalizedPath": 3 }] }"#,
        ] {
            assert!(matches!(parse(bad.as_bytes()), Err(SnapshotError::Parse(_))), "{bad}");
        }
    }

    #[test]
    fn test_save_load_via_file() {
        let snapshot = sample();
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!(
            "relink_snapshot_{}_{}.json",
            std::process::id(),
            nonce
        ));

        for _ in 0..10 {
            super::save_snapshot_to_file(&snapshot, &path).unwrap();
            let loaded = super::load_snapshot_from_file(&path).unwrap();
            assert_eq!(loaded, snapshot);
        }

        let _ = std::fs::remove_file(path);
    }
}
