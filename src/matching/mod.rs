pub mod index;
pub mod matcher;
pub mod path;

pub use index::CandidateIndex;
pub use matcher::{MatchResult, MatchTier, Matcher, DEFAULT_MAX_SCORE};

use crate::geometry::GeometrySignature;
use crate::identity::StableId;
use crate::scene::RenderElement;
use crate::snapshot::SnapshotEntry;

/// Anything the [`Matcher`] can look up: a live element or a persisted entry.
pub trait MatchQuery {
    fn stable_id(&self) -> Option<StableId>;
    /// `None` for missing or zeroed geometry.
    fn signature(&self) -> Option<&GeometrySignature>;
    /// Normalized relative path with the root segment removed.
    fn path_key(&self) -> String;
}

impl MatchQuery for RenderElement {
    fn stable_id(&self) -> Option<StableId> {
        self.stable_id.clone()
    }

    fn signature(&self) -> Option<&GeometrySignature> {
        self.signature.as_ref().filter(|signature| !signature.is_empty())
    }

    fn path_key(&self) -> String {
        path::normalized_key(&self.path)
    }
}

impl MatchQuery for SnapshotEntry {
    fn stable_id(&self) -> Option<StableId> {
        self.mesh_sig.as_ref().and_then(|sig| sig.stable_id())
    }

    fn signature(&self) -> Option<&GeometrySignature> {
        self.mesh_sig
            .as_ref()
            .map(|sig| &sig.signature)
            .filter(|signature| !signature.is_empty())
    }

    fn path_key(&self) -> String {
        path::normalized_key_from_str(&self.normalized_path)
    }
}
