use std::collections::HashMap;

use super::path::normalized_key;
use crate::geometry::SignatureKey;
use crate::identity::StableId;
use crate::scene::RenderElement;

/// Lookup tables over one target hierarchy, built fresh per operation.
///
/// Every table maps a key to all elements sharing it, in traversal order.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    elements: Vec<RenderElement>,
    by_stable_id: HashMap<String, Vec<usize>>,
    by_signature: HashMap<SignatureKey, Vec<usize>>,
    by_path: HashMap<String, Vec<usize>>,
}

impl CandidateIndex {
    pub fn build(elements: Vec<RenderElement>) -> Self {
        let mut by_stable_id: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_signature: HashMap<SignatureKey, Vec<usize>> = HashMap::new();
        let mut by_path: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, element) in elements.iter().enumerate() {
            if let Some(id) = &element.stable_id {
                by_stable_id.entry(id.key()).or_default().push(position);
            }
            if let Some(signature) = element.signature.as_ref().filter(|s| !s.is_empty()) {
                by_signature
                    .entry(signature.key())
                    .or_default()
                    .push(position);
            }
            by_path
                .entry(normalized_key(&element.path))
                .or_default()
                .push(position);
        }

        log::debug!(
            "Indexed {} elements ({} stable ids, {} signatures, {} paths)",
            elements.len(),
            by_stable_id.len(),
            by_signature.len(),
            by_path.len()
        );

        Self {
            elements,
            by_stable_id,
            by_signature,
            by_path,
        }
    }

    pub fn elements(&self) -> &[RenderElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn by_stable_id(&self, id: &StableId) -> Vec<&RenderElement> {
        self.collect(self.by_stable_id.get(&id.key()))
    }

    pub fn by_signature(&self, key: &SignatureKey) -> Vec<&RenderElement> {
        self.collect(self.by_signature.get(key))
    }

    /// `key` must already be normalized with the root segment stripped.
    pub fn by_path(&self, key: &str) -> Vec<&RenderElement> {
        self.collect(self.by_path.get(key))
    }

    fn collect(&self, positions: Option<&Vec<usize>>) -> Vec<&RenderElement> {
        positions
            .map(|positions| positions.iter().map(|&i| &self.elements[i]).collect())
            .unwrap_or_default()
    }
}
