use super::{CandidateIndex, MatchQuery};
use crate::geometry::GeometrySignature;
use crate::scene::RenderElement;

/// Nearest-neighbour candidates must score strictly below this.
pub const DEFAULT_MAX_SCORE: f64 = 50.0;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTier {
    StableId,
    Signature,
    Path,
    Nearest { score: f64 },
}

#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub tier: MatchTier,
    pub candidates: Vec<&'a RenderElement>,
}

impl MatchResult<'_> {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Tiered resolution of a query against a [`CandidateIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    max_score: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SCORE)
    }
}

impl Matcher {
    pub fn new(max_score: f64) -> Self {
        Self { max_score }
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Stable id, exact signature, normalized path, then nearest neighbour.
    /// The first tier with any candidate wins; tiers are never merged.
    pub fn resolve<'a, Q: MatchQuery + ?Sized>(
        &self,
        query: &Q,
        index: &'a CandidateIndex,
    ) -> Option<MatchResult<'a>> {
        if let Some(id) = query.stable_id() {
            let candidates = index.by_stable_id(&id);
            if !candidates.is_empty() {
                return Some(MatchResult {
                    tier: MatchTier::StableId,
                    candidates,
                });
            }
        }

        if index.is_empty() {
            return None;
        }

        if let Some(signature) = query.signature() {
            let candidates = index.by_signature(&signature.key());
            if !candidates.is_empty() {
                return Some(MatchResult {
                    tier: MatchTier::Signature,
                    candidates,
                });
            }
        }

        let candidates = index.by_path(&query.path_key());
        if !candidates.is_empty() {
            return Some(MatchResult {
                tier: MatchTier::Path,
                candidates,
            });
        }

        let signature = query.signature()?;
        let (element, score) = self.nearest(signature, index.elements())?;
        Some(MatchResult {
            tier: MatchTier::Nearest { score },
            candidates: vec![element],
        })
    }

    /// Best-scoring element under the threshold. Ties keep the element that
    /// comes first in `elements`, i.e. hierarchy traversal order.
    pub fn nearest<'a>(
        &self,
        signature: &GeometrySignature,
        elements: &'a [RenderElement],
    ) -> Option<(&'a RenderElement, f64)> {
        let mut best: Option<(&RenderElement, f64)> = None;
        for element in elements {
            let Some(candidate) = element.signature.as_ref().filter(|s| !s.is_empty()) else {
                continue;
            };
            let score = signature.distance(candidate);
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((element, score));
            }
        }
        best.filter(|(_, score)| *score < self.max_score)
    }
}
