//! # Cross-Field Invariants
//!
//! An [`InvariantRule`] is a named predicate over a fully typed
//! [`ValidatedRecord`]. Rules only run once every field of the record has
//! validated, so a predicate may rely on required fields being present and
//! correctly typed.
//!
//! A failing rule reports at the record root unless it declares a path with
//! [`InvariantRule::at`], e.g. the collection whose membership condition
//! failed.

use std::fmt;
use std::sync::Arc;

use recval_core::{FieldPath, ValidatedRecord};

type Predicate = dyn Fn(&ValidatedRecord) -> Result<(), String> + Send + Sync;

/// A named cross-field rule.
#[derive(Clone)]
pub struct InvariantRule {
    name: String,
    path: FieldPath,
    check: Arc<Predicate>,
}

impl InvariantRule {
    /// A rule whose predicate returns `Err(message)` on failure.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ValidatedRecord) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            path: FieldPath::root(),
            check: Arc::new(check),
        }
    }

    /// A rule that fails with a fixed `message` whenever `holds` is false.
    pub fn ensure<F>(name: impl Into<String>, message: impl Into<String>, holds: F) -> Self
    where
        F: Fn(&ValidatedRecord) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(name, move |record| {
            if holds(record) {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    /// Report failures at `path` instead of the record root.
    pub fn at(mut self, path: FieldPath) -> Self {
        self.path = path;
        self
    }

    /// Report failures at a top-level field.
    pub fn at_field(self, field: &str) -> Self {
        self.at(FieldPath::field(field))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Run the predicate.
    pub fn evaluate(&self, record: &ValidatedRecord) -> Result<(), String> {
        (self.check)(record)
    }
}

impl fmt::Debug for InvariantRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantRule")
            .field("name", &self.name)
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}
