//! Relink - carries per-slot material assignments between two independently
//! authored scene hierarchies.
//!
//! Target elements are found through stable asset ids, exact geometry
//! signatures, normalized paths and finally a scored nearest-neighbour search.
//! Assignments can also be captured into a versioned JSON snapshot and
//! restored later onto a reimported or reorganized hierarchy.

pub mod config;
pub mod geometry;
pub mod identity;
pub mod materials;
pub mod matching;
pub mod relink;
pub mod scene;
pub mod snapshot;

pub use config::RelinkConfig;
pub use relink::{
    apply_one, apply_pairs, build_pairs, capture, restore, restore_from_bytes, transfer,
    RestoreReport,
};
