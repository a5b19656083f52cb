//! # Error Collector
//!
//! Append-only, ordered accumulator of [`ValidationError`]s. Errors are
//! produced relative to the value being validated; when a child collector
//! is absorbed into its parent, every error is re-pathed under the child's
//! field name or collection index. Order is first-seen, first-reported.

use recval_core::ValidationError;

#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ValidationError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append a child's errors unchanged.
    pub fn absorb(&mut self, child: ErrorCollector) {
        self.errors.extend(child.errors);
    }

    /// Append a child's errors under a parent field name.
    pub fn absorb_under_field(&mut self, field: &str, child: ErrorCollector) {
        self.errors
            .extend(child.errors.into_iter().map(|e| e.nested_under_field(field)));
    }

    /// Append a child's errors under a collection index.
    pub fn absorb_under_index(&mut self, index: usize, child: ErrorCollector) {
        self.errors
            .extend(child.errors.into_iter().map(|e| e.nested_under_index(index)));
    }

    /// `true` means pass.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recval_core::FieldPath;

    #[test]
    fn test_preserves_order() {
        let mut c = ErrorCollector::new();
        c.push(ValidationError::missing_required(FieldPath::field("b")));
        c.push(ValidationError::missing_required(FieldPath::field("a")));
        let paths: Vec<String> = c.errors().iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["b", "a"]);
    }

    #[test]
    fn test_absorb_repaths() {
        let mut element = ErrorCollector::new();
        element.push(ValidationError::constraint(FieldPath::field("age"), "too young"));
        let mut list = ErrorCollector::new();
        list.absorb_under_index(1, element);
        let mut record = ErrorCollector::new();
        record.absorb_under_field("crew", list);
        assert_eq!(record.errors()[0].path().to_string(), "crew[1].age");
    }

    #[test]
    fn test_absorb_keeps_paths_and_appends() {
        let mut child = ErrorCollector::new();
        child.push(ValidationError::missing_required(FieldPath::field("a")));
        let mut parent = ErrorCollector::new();
        parent.push(ValidationError::missing_required(FieldPath::field("b")));
        parent.absorb(child);
        assert_eq!(parent.len(), 2);
        let paths: Vec<String> =
            parent.into_errors().iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["b", "a"]);
    }
}
