/// Identity of a geometry asset inside the backing store: the origin asset
/// GUID plus the sub-object id local to that asset.
///
/// Only constructible when both parts are populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StableId {
    guid: String,
    local_id: i64,
}

impl StableId {
    /// Returns `None` for a partially populated pair (empty GUID or a zero local id).
    pub fn new(guid: &str, local_id: i64) -> Option<Self> {
        let guid = guid.trim();
        if guid.is_empty() || local_id == 0 {
            return None;
        }
        Some(Self {
            guid: guid.to_string(),
            local_id,
        })
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn local_id(&self) -> i64 {
        self.local_id
    }

    /// Lookup key combining both parts.
    pub fn key(&self) -> String {
        format!("{}:{}", self.guid, self.local_id)
    }
}

/// True iff both ids are present and equal field-wise.
pub fn are_same_asset(a: Option<&StableId>, b: Option<&StableId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{are_same_asset, StableId};

    #[test]
    fn partial_ids_are_absent() {
        assert!(StableId::new("", 42).is_none());
        assert!(StableId::new("   ", 42).is_none());
        assert!(StableId::new("0a1b", 0).is_none());
        assert!(StableId::new("0a1b", -7).is_some());
    }

    #[test]
    fn same_asset_requires_both_present() {
        let a = StableId::new("0a1b", 4300000);
        let b = StableId::new("0a1b", 4300000);
        let c = StableId::new("0a1b", 4300002);
        assert!(are_same_asset(a.as_ref(), b.as_ref()));
        assert!(!are_same_asset(a.as_ref(), c.as_ref()));
        assert!(!are_same_asset(a.as_ref(), None));
        assert!(!are_same_asset(None, None));
    }

    #[test]
    fn key_combines_both_parts() {
        let id = StableId::new("0a1b", 12).unwrap();
        assert_eq!(id.key(), "0a1b:12");
    }
}
