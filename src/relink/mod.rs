pub mod pairing;
pub mod undo;

pub use pairing::{apply_one, apply_pairs, build_pairs, PairReason, RelinkPair};
pub use undo::{MutationRecorder, NoopRecorder, UndoLog, UndoRecord};

use std::path::Path;

use crate::config::RelinkConfig;
use crate::materials::{AssetStore, MaterialReference, MaterialResolver};
use crate::matching::{CandidateIndex, MatchTier};
use crate::scene::{Hierarchy, RenderElement, SceneError};
use crate::snapshot::{self, Snapshot, SnapshotError};

/// Aggregate outcome of a restore, transfer or pair application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Target elements that received writes.
    pub matched: usize,
    pub slots_written: usize,
    /// Entries (or pairs) with no acceptable target.
    pub unmatched: usize,
    /// Entries that matched more than one target.
    pub ambiguous: usize,
    /// Slots whose material could not be created.
    pub failed_slots: usize,
    /// Targets that vanished from the hierarchy before their write.
    pub failed_elements: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotWrites {
    pub written: usize,
    pub failed: usize,
}

/// Captures `hierarchy` using the configured producer version.
pub fn capture<H: Hierarchy + ?Sized>(hierarchy: &H, config: &RelinkConfig) -> Snapshot {
    snapshot::capture(hierarchy, &config.producer_version)
}

/// Captures `hierarchy` and persists it to `path`.
pub fn capture_to_file<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    path: &Path,
    config: &RelinkConfig,
) -> Result<Snapshot, SnapshotError> {
    let snapshot = capture(hierarchy, config);
    snapshot::save_snapshot_to_file(&snapshot, path)?;
    Ok(snapshot)
}

/// Re-applies the material assignments of `snapshot` onto `destination`.
///
/// Entries are processed in document order. Every candidate of a matched entry
/// receives the same writes; unmatched entries are counted and skipped.
pub fn restore<H, S>(
    snapshot: &Snapshot,
    destination: &mut H,
    store: &mut S,
    recorder: &mut dyn MutationRecorder,
    config: &RelinkConfig,
) -> RestoreReport
where
    H: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let index = CandidateIndex::build(destination.render_elements());
    let matcher = config.matcher();
    let mut resolver = MaterialResolver::new(store, &config.fallback_material_folder);
    let mut report = RestoreReport::default();

    for entry in &snapshot.entries {
        let Some(result) = matcher.resolve(entry, &index) else {
            log::warn!("No match for '{}'", entry.normalized_path);
            report.unmatched += 1;
            continue;
        };

        if result.is_ambiguous() {
            log::warn!(
                "'{}' matched {} elements, applying to all",
                entry.normalized_path,
                result.candidates.len()
            );
            report.ambiguous += 1;
        }
        log_match(&entry.normalized_path, &result.tier, &result.candidates);

        for target in result.candidates {
            match write_slots(destination, target, &entry.slots, &mut resolver, recorder) {
                Ok(writes) => {
                    report.matched += 1;
                    report.slots_written += writes.written;
                    report.failed_slots += writes.failed;
                }
                Err(err) => {
                    log::warn!("Skipping '{}': {}", target.path_string(), err);
                    report.failed_elements += 1;
                }
            }
        }
    }

    log::info!(
        "Restore onto '{}': {} matched, {} slots written, {} unmatched",
        destination.root_name(),
        report.matched,
        report.slots_written,
        report.unmatched
    );
    report
}

/// Parses `bytes` and restores it. A malformed document aborts before any write.
pub fn restore_from_bytes<H, S>(
    bytes: &[u8],
    destination: &mut H,
    store: &mut S,
    recorder: &mut dyn MutationRecorder,
    config: &RelinkConfig,
) -> Result<RestoreReport, SnapshotError>
where
    H: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let snapshot = snapshot::parse(bytes)?;
    Ok(restore(&snapshot, destination, store, recorder, config))
}

/// Captures `source` and immediately restores it onto `destination`.
pub fn transfer<A, B, S>(
    source: &A,
    destination: &mut B,
    store: &mut S,
    recorder: &mut dyn MutationRecorder,
    config: &RelinkConfig,
) -> RestoreReport
where
    A: Hierarchy + ?Sized,
    B: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let snapshot = capture(source, config);
    restore(&snapshot, destination, store, recorder, config)
}

/// Resolves `references` and writes them over the first slots of `target`.
///
/// The slot array grows to fit `references`; slots past it keep their
/// current material, as do slots whose reference resolves to nothing.
pub(crate) fn write_slots<H, S>(
    hierarchy: &mut H,
    target: &RenderElement,
    references: &[MaterialReference],
    resolver: &mut MaterialResolver<'_, S>,
    recorder: &mut dyn MutationRecorder,
) -> Result<SlotWrites, SceneError>
where
    H: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let current = hierarchy
        .material_slots(&target.handle)
        .ok_or_else(|| SceneError::UnknownElement(target.handle.clone()))?;

    let mut slots = current.clone();
    if slots.len() < references.len() {
        slots.resize(references.len(), None);
    }

    let mut writes = SlotWrites::default();
    for (index, reference) in references.iter().enumerate() {
        match resolver.resolve(reference) {
            Ok(Some(material)) => {
                slots[index] = Some(material);
                writes.written += 1;
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!(
                    "Slot {} of '{}' left unchanged: {}",
                    index,
                    target.path_string(),
                    err
                );
                writes.failed += 1;
            }
        }
    }

    recorder.record_before_mutation(target, &current);
    if let Err(err) = hierarchy.set_material_slots(&target.handle, slots) {
        recorder.discard_last_record();
        return Err(err);
    }
    Ok(writes)
}

fn log_match(query: &str, tier: &MatchTier, candidates: &[&RenderElement]) {
    if log::log_enabled!(log::Level::Debug) {
        let targets: Vec<String> = candidates.iter().map(|c| c.path_string()).collect();
        log::debug!("'{}' -> {:?} via {:?}", query, targets, tier);
    }
}
