use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Seed keywords as typed by the user: one comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedKeywords {
    raw: String,
}

impl SeedKeywords {
    /// Accept the raw text unless it is blank
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        if raw.trim().is_empty() {
            return Err(InputError::MissingSeedKeywords);
        }

        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// The text sent in the `seed_keywords` form field, unmodified
    pub fn as_form_value(&self) -> &str {
        &self.raw
    }

    /// Individual keywords, split on commas, trimmed, empties dropped.
    /// This is the list the service derives from the form field.
    pub fn parsed(&self) -> Vec<String> {
        self.raw
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect()
    }
}
