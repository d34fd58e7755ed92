//! Step and field definitions for the onboarding wizard.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fields accepted by a step after validation, keyed by field name.
///
/// Only known, non-empty, rule-passing values appear here; unknown submitted
/// fields are dropped without error.
pub type ValidatedFields = BTreeMap<String, String>;

/// Validation messages per field name. Every invalid field is reported,
/// possibly with more than one message.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/]+\.[^\s]+$").expect("url regex compiles"));

/// Shape constraint applied to a field value beyond presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    Email,
    Url,
}

impl FieldFormat {
    pub fn matches(self, value: &str) -> bool {
        match self {
            FieldFormat::Email => EMAIL_RE.is_match(value),
            FieldFormat::Url => URL_RE.is_match(value),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FieldFormat::Email => "must be a valid email address",
            FieldFormat::Url => "must be a valid url",
        }
    }
}

/// One field collected by a wizard step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Form field name, unique across all steps
    pub name: String,
    /// Display label
    pub label: String,
    /// Whether a non-empty value must be submitted
    pub required: bool,
    /// Optional shape constraint
    #[serde(default)]
    pub format: Option<FieldFormat>,
    /// Optional maximum length in characters
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Optional placeholder hint for form rendering
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl FieldSchema {
    pub fn required(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: true,
            format: None,
            max_length: None,
            placeholder: None,
        }
    }

    pub fn optional(name: &str, label: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, label)
        }
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn max_length(mut self, limit: usize) -> Self {
        self.max_length = Some(limit);
        self
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }
}

/// Static definition of one wizard step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// 1-indexed step number, contiguous across the registry
    pub number: u32,
    /// Short machine name (e.g. "basics")
    pub name: String,
    /// Display title
    pub title: String,
    /// Fields collected by this step
    pub fields: Vec<FieldSchema>,
}

impl StepDefinition {
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| !f.required)
    }

    /// Validate a raw submission against this step's field set.
    ///
    /// All invalid fields are reported together rather than failing on the
    /// first. Unknown fields are dropped without error, and optional fields
    /// submitted empty are treated as absent.
    pub fn validate(
        &self,
        submitted: &HashMap<String, String>,
    ) -> Result<ValidatedFields, FieldErrors> {
        let mut accepted = ValidatedFields::new();
        let mut errors = FieldErrors::new();

        for field in &self.fields {
            let value = submitted.get(&field.name).map(|v| v.trim());
            match value {
                None | Some("") => {
                    if field.required {
                        errors
                            .entry(field.name.clone())
                            .or_default()
                            .push("required".to_string());
                    }
                }
                Some(value) => {
                    let mut messages = Vec::new();
                    if let Some(limit) = field.max_length {
                        if value.chars().count() > limit {
                            messages.push(format!("must be {limit} characters or fewer"));
                        }
                    }
                    if let Some(format) = field.format {
                        if !format.matches(value) {
                            messages.push(format.message().to_string());
                        }
                    }
                    if messages.is_empty() {
                        accepted.insert(field.name.clone(), value.to_string());
                    } else {
                        errors.insert(field.name.clone(), messages);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(accepted)
        } else {
            Err(errors)
        }
    }
}
