use crate::materials::Material;
use crate::scene::{ElementHandle, Hierarchy, RenderElement, SceneError};

/// Host hook invoked immediately before an element's slots are rewritten.
pub trait MutationRecorder {
    fn record_before_mutation(&mut self, element: &RenderElement, previous: &[Option<Material>]);

    /// Drops the latest record after its write failed.
    fn discard_last_record(&mut self) {}
}

/// Recorder for hosts without undo support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl MutationRecorder for NoopRecorder {
    fn record_before_mutation(&mut self, _element: &RenderElement, _previous: &[Option<Material>]) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub handle: ElementHandle,
    pub path: String,
    pub previous: Vec<Option<Material>>,
}

/// Per-element undo history. Each record is committed on its own, so
/// reverting restores elements individually, newest first.
#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Puts back every recorded slot array and returns how many elements were reverted.
    pub fn revert<H: Hierarchy + ?Sized>(self, hierarchy: &mut H) -> Result<usize, SceneError> {
        let mut reverted = 0;
        for record in self.records.into_iter().rev() {
            hierarchy.set_material_slots(&record.handle, record.previous)?;
            reverted += 1;
        }
        Ok(reverted)
    }
}

impl MutationRecorder for UndoLog {
    fn record_before_mutation(&mut self, element: &RenderElement, previous: &[Option<Material>]) {
        self.records.push(UndoRecord {
            handle: element.handle.clone(),
            path: element.path_string(),
            previous: previous.to_vec(),
        });
    }

    fn discard_last_record(&mut self) {
        self.records.pop();
    }
}
