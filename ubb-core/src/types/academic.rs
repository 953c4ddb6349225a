//! Faculty and specialization records.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// A faculty, keyed by its short symbol (e.g. `FSEGA`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Full faculty name
    pub name: String,
    /// Unique short symbol
    pub symbol: String,
}

impl Faculty {
    /// Creates a new faculty record.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Validates the record structure.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("faculty symbol", &self.symbol)
    }
}

/// A program of study belonging to exactly one faculty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    /// Unique specialization name
    pub name: String,
    /// Length of the program in years
    pub duration_years: u32,
    /// Symbol of the owning faculty
    pub faculty_symbol: String,
}

impl Specialization {
    /// Creates a new specialization record.
    pub fn new(
        name: impl Into<String>,
        duration_years: u32,
        faculty_symbol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_years,
            faculty_symbol: faculty_symbol.into(),
        }
    }

    /// Validates the record structure.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("specialization name", &self.name)?;
        require_non_empty("faculty symbol", &self.faculty_symbol)
    }
}

/// A specialization joined with the symbol of its owning faculty.
///
/// Produced at read time; the faculty symbol is not a second stored copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializationView {
    /// The stored specialization
    pub specialization: Specialization,
    /// Symbol of the faculty the specialization belongs to
    pub faculty_symbol: String,
}

/// Rejects empty (or whitespace-only) keys.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::ValidationError(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_validation() {
        assert!(Faculty::new("Facultatea FSEGA", "FSEGA").validate().is_ok());
        // Name payload is free-form; only the key is required
        assert!(Faculty::new("", "FSEGA").validate().is_ok());
        assert!(Faculty::new("Facultatea FSEGA", "  ").validate().is_err());
    }

    #[test]
    fn test_specialization_validation() {
        assert!(Specialization::new("Informatica Economica", 3, "FSEGA")
            .validate()
            .is_ok());
        assert!(Specialization::new("", 3, "FSEGA").validate().is_err());
        assert!(Specialization::new("Informatica Economica", 3, "")
            .validate()
            .is_err());
    }
}
