//! Query filters over documents.
//!
//! A [`Filter`] is a conjunction of per-path conditions. The vocabulary is
//! deliberately small: `eq` for scalar fields, `ne` for conditional updates
//! (it also matches absent paths), and `contains`/`contains_all` for
//! set-valued fields such as `company_tag` and `topics`.

use serde_json::{Map, Value, json};

use crate::document::{get_path, set_path};

/// A single condition on a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// Strict equality against the value at the path.
    Eq(Value),
    /// Not-equal; a document where the path is absent also matches.
    Ne(Value),
    /// Array membership: the field is an array containing the value.
    Cont(Value),
    /// Array superset: the field is an array containing every listed value.
    ContAll(Vec<Value>),
}

/// A conjunction of conditions. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conds: Vec<(String, Cond)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require strict equality at `path`.
    #[must_use]
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conds.push((path.into(), Cond::Eq(value.into())));
        self
    }

    /// Require the value at `path` to differ from `value` (or be absent).
    #[must_use]
    pub fn ne(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conds.push((path.into(), Cond::Ne(value.into())));
        self
    }

    /// Require the array at `path` to contain `value`.
    #[must_use]
    pub fn contains(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conds.push((path.into(), Cond::Cont(value.into())));
        self
    }

    /// Require the array at `path` to contain every value in `values`.
    #[must_use]
    pub fn contains_all(mut self, path: impl Into<String>, values: Vec<Value>) -> Self {
        self.conds.push((path.into(), Cond::ContAll(values)));
        self
    }

    pub fn conds(&self) -> &[(String, Cond)] {
        &self.conds
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, doc: &Value) -> bool {
        self.conds.iter().all(|(path, cond)| {
            let field = get_path(doc, path);
            match cond {
                Cond::Eq(value) => field == Some(value),
                Cond::Ne(value) => match field {
                    Some(found) => found != value,
                    None => !value.is_null(),
                },
                Cond::Cont(value) => {
                    matches!(field, Some(Value::Array(items)) if items.contains(value))
                }
                Cond::ContAll(values) => match field {
                    Some(Value::Array(items)) => values.iter().all(|v| items.contains(v)),
                    _ => false,
                },
            }
        })
    }

    /// Seed document for an upsert insert: the equality conditions become the
    /// initial fields, and the patch is applied on top.
    pub fn seed(&self) -> Value {
        let mut doc = Value::Object(Map::new());
        for (path, cond) in &self.conds {
            if let Cond::Eq(value) = cond {
                set_path(&mut doc, path, value.clone());
            }
        }
        doc
    }

    /// JSONB containment object covering the translatable conditions.
    ///
    /// `eq`, `contains` and `contains_all` all have a `@>` form; `ne` does
    /// not and is left to in-process evaluation. The result is therefore a
    /// *prefilter*: it may match more documents than the filter itself, never
    /// fewer.
    pub fn containment(&self) -> Value {
        let mut obj = Value::Object(Map::new());
        for (path, cond) in &self.conds {
            match cond {
                Cond::Eq(value) => set_path(&mut obj, path, value.clone()),
                Cond::Cont(value) => set_path(&mut obj, path, json!([value])),
                Cond::ContAll(values) => set_path(&mut obj, path, Value::Array(values.clone())),
                Cond::Ne(_) => {}
            }
        }
        obj
    }

    /// Whether every condition is expressible as `@>` containment, meaning
    /// [`Self::containment`] is exact rather than a prefilter.
    pub fn is_containment_exact(&self) -> bool {
        self.conds.iter().all(|(_, cond)| !matches!(cond, Cond::Ne(_)))
    }
}
