//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use ubb_core::types::{Faculty, RegistryStats, SpecializationView, Student};

/// Request to add a faculty.
#[derive(Debug, Deserialize)]
pub struct AddFacultyRequest {
    /// Full faculty name
    pub name: String,
    /// Unique short symbol
    pub symbol: String,
}

/// A faculty record.
#[derive(Debug, Serialize, Deserialize)]
pub struct FacultyDto {
    /// Full faculty name
    pub name: String,
    /// Short symbol
    pub symbol: String,
}

impl From<Faculty> for FacultyDto {
    fn from(faculty: Faculty) -> Self {
        Self {
            name: faculty.name,
            symbol: faculty.symbol,
        }
    }
}

/// Request to add a specialization.
#[derive(Debug, Deserialize)]
pub struct AddSpecializationRequest {
    /// Unique specialization name
    pub name: String,
    /// Program length in years
    pub duration_years: u32,
    /// Symbol of an existing faculty
    pub faculty_symbol: String,
}

/// A specialization joined with its faculty.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpecializationDto {
    /// Specialization name
    pub name: String,
    /// Program length in years
    pub duration_years: u32,
    /// Symbol of the owning faculty
    pub faculty_symbol: String,
}

impl From<SpecializationView> for SpecializationDto {
    fn from(view: SpecializationView) -> Self {
        Self {
            name: view.specialization.name,
            duration_years: view.specialization.duration_years,
            faculty_symbol: view.faculty_symbol,
        }
    }
}

/// Request to register a student.
#[derive(Debug, Deserialize)]
pub struct AddStudentRequest {
    /// Identity address (hex)
    pub address: String,
    /// Full name
    pub name: String,
    /// National id (CNP)
    pub national_id: String,
    /// Name of an existing specialization
    pub specialization: String,
}

/// A student record as seen by verifiers.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentDto {
    /// Identity address (0x-prefixed, lowercase)
    pub address: String,
    /// Full name
    pub name: String,
    /// National id (CNP)
    pub national_id: String,
    /// Specialization name
    pub specialization: String,
    /// Whether the student finished
    pub finished: bool,
    /// Whether the student is suspended
    pub suspended: bool,
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        Self {
            address: student.address.to_hex_string(),
            finished: student.finished(),
            suspended: student.suspended(),
            name: student.name,
            national_id: student.national_id,
            specialization: student.specialization,
        }
    }
}

/// Response for the owner query.
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerResponse {
    /// Administrator address
    pub owner: String,
}

/// Registry statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of faculties
    pub faculties: u64,
    /// Number of specializations
    pub specializations: u64,
    /// Number of students
    pub students: u64,
    /// Active students
    pub active: u64,
    /// Finished students
    pub finished: u64,
    /// Suspended students
    pub suspended: u64,
}

impl From<RegistryStats> for StatsResponse {
    fn from(stats: RegistryStats) -> Self {
        Self {
            faculties: stats.faculties,
            specializations: stats.specializations,
            students: stats.students,
            active: stats.active,
            finished: stats.finished,
            suspended: stats.suspended,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
}
