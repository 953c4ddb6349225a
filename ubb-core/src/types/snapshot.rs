//! Whole-registry views: persisted snapshots and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EthAddress, Faculty, Specialization, Student, StudentStatus};

/// Serialized state of a registry.
///
/// Holds exactly the three entity collections plus the administrator.
/// Loading a snapshot re-validates every registry invariant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// The registry administrator
    pub owner: EthAddress,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// All faculties
    pub faculties: Vec<Faculty>,
    /// All specializations
    pub specializations: Vec<Specialization>,
    /// All students
    pub students: Vec<Student>,
}

impl RegistrySnapshot {
    /// Creates an empty snapshot for `owner`.
    pub fn empty(owner: EthAddress) -> Self {
        Self {
            owner,
            saved_at: Utc::now(),
            faculties: Vec::new(),
            specializations: Vec::new(),
            students: Vec::new(),
        }
    }

    /// Total number of records across the three collections.
    pub fn record_count(&self) -> usize {
        self.faculties.len() + self.specializations.len() + self.students.len()
    }
}

/// Counts over the current registry state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Number of faculties
    pub faculties: u64,
    /// Number of specializations
    pub specializations: u64,
    /// Number of students
    pub students: u64,
    /// Students neither finished nor suspended
    pub active: u64,
    /// Students that finished
    pub finished: u64,
    /// Students that are suspended
    pub suspended: u64,
}

impl RegistryStats {
    /// Creates empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a student under its current status.
    pub fn add_student(&mut self, status: StudentStatus) {
        self.students += 1;
        match status {
            StudentStatus::Active => self.active += 1,
            StudentStatus::Finished => self.finished += 1,
            StudentStatus::Suspended => self.suspended += 1,
        }
    }
}
