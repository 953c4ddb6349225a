//! Student records and the academic status machine.

use serde::{Deserialize, Serialize};

use super::academic::require_non_empty;
use super::EthAddress;
use crate::error::{RegistryError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Academic status of a student.
///
/// ```text
/// Active ──finish──▶ Finished
///    │
///    └────suspend──▶ Suspended
/// ```
///
/// `Finished` and `Suspended` are terminal with respect to each other and
/// nothing returns to `Active`. Re-applying the current terminal state is
/// accepted and leaves the status unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Enrolled, neither finished nor suspended.
    #[default]
    Active,
    /// Completed the program.
    Finished,
    /// Suspended from the program.
    Suspended,
}

impl StudentStatus {
    /// Transition to `Finished`.
    ///
    /// Fails with [`RegistryError::StudentSuspended`] from `Suspended`,
    /// tagging the error with `national_id`.
    pub fn finish_for(self, national_id: &str) -> Result<Self> {
        match self {
            StudentStatus::Active | StudentStatus::Finished => Ok(StudentStatus::Finished),
            StudentStatus::Suspended => {
                Err(RegistryError::StudentSuspended(national_id.to_string()))
            }
        }
    }

    /// Transition to `Suspended`.
    ///
    /// Fails with [`RegistryError::StudentFinished`] from `Finished`,
    /// tagging the error with `national_id`.
    pub fn suspend_for(self, national_id: &str) -> Result<Self> {
        match self {
            StudentStatus::Active | StudentStatus::Suspended => Ok(StudentStatus::Suspended),
            StudentStatus::Finished => {
                Err(RegistryError::StudentFinished(national_id.to_string()))
            }
        }
    }

    /// Returns true if the student finished.
    pub fn is_finished(self) -> bool {
        self == StudentStatus::Finished
    }

    /// Returns true if the student is suspended.
    pub fn is_suspended(self) -> bool {
        self == StudentStatus::Suspended
    }

    /// Returns true if the student is still active.
    pub fn is_active(self) -> bool {
        self == StudentStatus::Active
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StudentStatus::Active => "active",
            StudentStatus::Finished => "finished",
            StudentStatus::Suspended => "suspended",
        };
        f.write_str(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STUDENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A registered student.
///
/// Keyed by `address`; `national_id` is a second unique key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identity address (primary key)
    pub address: EthAddress,
    /// Full name
    pub name: String,
    /// National identifier (CNP), unique across students
    pub national_id: String,
    /// Name of the specialization the student is enrolled in
    pub specialization: String,
    /// Current academic status
    #[serde(default)]
    pub status: StudentStatus,
}

impl Student {
    /// Creates a new active student.
    pub fn new(
        address: EthAddress,
        name: impl Into<String>,
        national_id: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            national_id: national_id.into(),
            specialization: specialization.into(),
            status: StudentStatus::Active,
        }
    }

    /// Validates the record structure.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("national id", &self.national_id)?;
        require_non_empty("specialization name", &self.specialization)
    }

    /// Returns true if the student finished.
    pub fn finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns true if the student is suspended.
    pub fn suspended(&self) -> bool {
        self.status.is_suspended()
    }
}
