//! Document patches.
//!
//! A [`Patch`] is an ordered list of mutations applied by the store as one
//! atomic step together with the filter check. `set` is whole-value
//! replacement (notes are last-write-wins by design); `add_to_set` is the
//! idempotent array add used for company tags.

use serde_json::Value;

use crate::document::{get_path_mut, remove_path, set_path};

/// A single patch operation on a dotted path.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Set the value, creating intermediate objects as needed.
    Set(String, Value),
    /// Append to an array only when the value is not already present.
    /// An absent path becomes a one-element array; a non-array value is
    /// replaced by one.
    AddToSet(String, Value),
    /// Remove the value. Absent paths are a no-op.
    Unset(String),
}

/// An ordered list of patch operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Set(path.into(), value.into()));
        self
    }

    #[must_use]
    pub fn add_to_set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::AddToSet(path.into(), value.into()));
        self
    }

    #[must_use]
    pub fn unset(mut self, path: impl Into<String>) -> Self {
        self.ops.push(PatchOp::Unset(path.into()));
        self
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every operation to `doc` in order.
    pub fn apply(&self, doc: &mut Value) {
        for op in &self.ops {
            match op {
                PatchOp::Set(path, value) => set_path(doc, path, value.clone()),
                PatchOp::AddToSet(path, value) => match get_path_mut(doc, path) {
                    Some(Value::Array(items)) => {
                        if !items.contains(value) {
                            items.push(value.clone());
                        }
                    }
                    _ => set_path(doc, path, Value::Array(vec![value.clone()])),
                },
                PatchOp::Unset(path) => remove_path(doc, path),
            }
        }
    }
}
