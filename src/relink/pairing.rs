use super::{write_slots, MutationRecorder, RestoreReport, SlotWrites};
use crate::config::RelinkConfig;
use crate::materials::{AssetStore, MaterialResolver};
use crate::matching::path::normalize_segment;
use crate::matching::{CandidateIndex, MatchQuery, Matcher};
use crate::scene::{Hierarchy, RenderElement, SceneError};

/// Why a live pair was proposed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairReason {
    Path,
    Signature,
    Nearest { score: f64 },
    Name,
}

/// One reviewable source → target proposal. Reviewers may replace `target`
/// or clear `enabled` before applying.
#[derive(Debug, Clone, PartialEq)]
pub struct RelinkPair {
    pub source: RenderElement,
    pub target: Option<RenderElement>,
    pub reason: Option<PairReason>,
    pub enabled: bool,
}

/// Proposes a target for every source element. Nothing is mutated.
///
/// Per element: normalized path, exact signature, nearest neighbour, then
/// suffix-stripped display name. The first candidate of a tier is taken.
pub fn build_pairs<A, B>(source: &A, target: &B, config: &RelinkConfig) -> Vec<RelinkPair>
where
    A: Hierarchy + ?Sized,
    B: Hierarchy + ?Sized,
{
    let index = CandidateIndex::build(target.render_elements());
    let matcher = config.matcher();

    let pairs: Vec<RelinkPair> = source
        .render_elements()
        .into_iter()
        .map(|element| {
            let found = find_target(&element, &index, &matcher);
            let (target, reason) = match found {
                Some((target, reason)) => (Some(target.clone()), Some(reason)),
                None => (None, None),
            };
            RelinkPair {
                enabled: target.is_some(),
                source: element,
                target,
                reason,
            }
        })
        .collect();

    let paired = pairs.iter().filter(|pair| pair.target.is_some()).count();
    log::info!(
        "Paired {} of {} elements from '{}' onto '{}'",
        paired,
        pairs.len(),
        source.root_name(),
        target.root_name()
    );
    pairs
}

fn find_target<'a>(
    element: &RenderElement,
    index: &'a CandidateIndex,
    matcher: &Matcher,
) -> Option<(&'a RenderElement, PairReason)> {
    if let Some(found) = index.by_path(&element.path_key()).into_iter().next() {
        return Some((found, PairReason::Path));
    }

    if let Some(signature) = element.signature() {
        if let Some(found) = index.by_signature(&signature.key()).into_iter().next() {
            return Some((found, PairReason::Signature));
        }
        if let Some((found, score)) = matcher.nearest(signature, index.elements()) {
            return Some((found, PairReason::Nearest { score }));
        }
    }

    let name = normalize_segment(element.display_name());
    index
        .elements()
        .iter()
        .find(|candidate| normalize_segment(candidate.display_name()) == name)
        .map(|found| (found, PairReason::Name))
}

/// Copies the source's materials onto the pair's target.
/// Disabled or unpaired pairs write nothing.
pub fn apply_one<H, S>(
    pair: &RelinkPair,
    target: &mut H,
    store: &mut S,
    recorder: &mut dyn MutationRecorder,
    config: &RelinkConfig,
) -> Result<SlotWrites, SceneError>
where
    H: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let Some(destination) = pair.target.as_ref().filter(|_| pair.enabled) else {
        return Ok(SlotWrites::default());
    };
    let mut resolver = MaterialResolver::new(store, &config.fallback_material_folder);
    write_slots(
        target,
        destination,
        &pair.source.material_references(),
        &mut resolver,
        recorder,
    )
}

/// Applies every enabled pair; unpaired or disabled pairs count as unmatched.
pub fn apply_pairs<H, S>(
    pairs: &[RelinkPair],
    target: &mut H,
    store: &mut S,
    recorder: &mut dyn MutationRecorder,
    config: &RelinkConfig,
) -> RestoreReport
where
    H: Hierarchy + ?Sized,
    S: AssetStore + ?Sized,
{
    let mut report = RestoreReport::default();
    for pair in pairs {
        if !pair.enabled || pair.target.is_none() {
            report.unmatched += 1;
            continue;
        }
        match apply_one(pair, target, store, recorder, config) {
            Ok(writes) => {
                report.matched += 1;
                report.slots_written += writes.written;
                report.failed_slots += writes.failed;
            }
            Err(err) => {
                log::warn!("Skipping pair for '{}': {}", pair.source.path_string(), err);
                report.failed_elements += 1;
            }
        }
    }
    report
}
