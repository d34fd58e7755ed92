//! Step schema registry: the single source of truth for what each
//! onboarding step collects and how submissions are validated.

pub mod builtin;
pub mod step;

pub use step::{FieldErrors, FieldFormat, FieldSchema, StepDefinition, ValidatedFields};

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Step lookup failure. An out-of-range step number is an input error, not a
/// workflow condition; callers treat it as not-found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no such onboarding step: {0}")]
    UnknownStep(u32),
}

/// Consistency problems in a set of step definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no steps defined")]
    Empty,
    #[error("step numbers must be contiguous from 1 (step {0} is out of place)")]
    NonContiguous(u32),
    #[error("field '{0}' is defined by more than one step")]
    DuplicateField(String),
}

/// Immutable registry of step definitions.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Build a registry, checking that step numbers are contiguous from 1 and
    /// that no field name is claimed by two steps. All problems are reported
    /// together.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, Vec<RegistryError>> {
        let mut errors = Vec::new();

        if steps.is_empty() {
            errors.push(RegistryError::Empty);
        }
        for (index, step) in steps.iter().enumerate() {
            if step.number != index as u32 + 1 {
                errors.push(RegistryError::NonContiguous(step.number));
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for field in steps.iter().flat_map(|s| s.fields.iter()) {
            if !seen.insert(field.name.as_str()) {
                errors.push(RegistryError::DuplicateField(field.name.clone()));
            }
        }

        if errors.is_empty() {
            Ok(Self { steps })
        } else {
            Err(errors)
        }
    }

    /// Registry with the built-in onboarding steps.
    pub fn builtin() -> Self {
        Self::new(builtin::builtin_steps()).expect("builtin step definitions are consistent")
    }

    /// Number of steps in the wizard. All range checks derive from this.
    pub fn total_steps(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Definition for step `n` (1-indexed).
    pub fn get_step(&self, n: u32) -> Option<&StepDefinition> {
        n.checked_sub(1).and_then(|i| self.steps.get(i as usize))
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Validate a raw submission against step `n`.
    ///
    /// The outer error is a step lookup failure; the inner result carries
    /// either the accepted fields or all per-field validation messages.
    pub fn validate(
        &self,
        n: u32,
        submitted: &HashMap<String, String>,
    ) -> Result<Result<ValidatedFields, FieldErrors>, SchemaError> {
        let step = self.get_step(n).ok_or(SchemaError::UnknownStep(n))?;
        Ok(step.validate(submitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_consistent() {
        let registry = StepRegistry::builtin();
        assert_eq!(registry.total_steps(), 4);
        for n in 1..=4 {
            assert_eq!(registry.get_step(n).unwrap().number, n);
        }
    }

    #[test]
    fn test_get_step_out_of_range() {
        let registry = StepRegistry::builtin();
        assert!(registry.get_step(0).is_none());
        assert!(registry.get_step(5).is_none());
    }

    #[test]
    fn test_validate_unknown_step() {
        let registry = StepRegistry::builtin();
        let result = registry.validate(9, &HashMap::new());
        assert_eq!(result.unwrap_err(), SchemaError::UnknownStep(9));
    }

    #[test]
    fn test_validate_delegates_to_step() {
        let registry = StepRegistry::builtin();
        let errors = registry.validate(1, &HashMap::new()).unwrap().unwrap_err();
        assert_eq!(
            errors.get("business_name").unwrap(),
            &vec!["required".to_string()]
        );
        assert_eq!(errors.len(), 4); // every required basics field
    }

    #[test]
    fn test_no_field_in_two_steps() {
        let registry = StepRegistry::builtin();
        let mut seen = HashSet::new();
        for step in registry.steps() {
            for field in &step.fields {
                assert!(seen.insert(field.name.clone()), "duplicate {}", field.name);
            }
        }
    }

    #[test]
    fn test_new_rejects_duplicate_field() {
        let mut steps = builtin::builtin_steps();
        steps[1]
            .fields
            .push(FieldSchema::optional("business_name", "Duplicate"));
        let errors = StepRegistry::new(steps).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, RegistryError::DuplicateField(f) if f == "business_name")));
    }

    #[test]
    fn test_new_rejects_gap_in_numbering() {
        let mut steps = builtin::builtin_steps();
        steps[2].number = 7;
        let errors = StepRegistry::new(steps).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, RegistryError::NonContiguous(7))));
    }

    #[test]
    fn test_new_rejects_empty() {
        let errors = StepRegistry::new(Vec::new()).unwrap_err();
        assert_eq!(errors, vec![RegistryError::Empty]);
    }
}
