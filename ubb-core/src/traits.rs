//! Common traits for UBB.
//!
//! These traits define the interfaces that different registry backends satisfy,
//! so the HTTP server and CLI can run over memory or file storage alike.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EthAddress, Faculty, RegistryStats, SpecializationView, Student};

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the academic registry.
///
/// Every mutating operation takes the `caller` address and fails with
/// [`RegistryError::PermissionDenied`](crate::RegistryError::PermissionDenied)
/// unless it equals [`AcademicRegistry::owner`]. A failed operation leaves
/// the registry unchanged.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - Snapshot files (for single-node deployments)
#[async_trait]
pub trait AcademicRegistry: Send + Sync {
    /// Returns the administrator address fixed at construction.
    fn owner(&self) -> EthAddress;

    /// Adds a faculty keyed by `symbol`.
    async fn add_faculty(&self, caller: &EthAddress, name: &str, symbol: &str) -> Result<()>;

    /// Looks up a faculty by symbol.
    async fn get_faculty(&self, symbol: &str) -> Result<Option<Faculty>>;

    /// Adds a specialization under an existing faculty.
    async fn add_specialization(
        &self,
        caller: &EthAddress,
        name: &str,
        duration_years: u32,
        faculty_symbol: &str,
    ) -> Result<()>;

    /// Looks up a specialization joined with its faculty symbol.
    async fn get_specialization(&self, name: &str) -> Result<Option<SpecializationView>>;

    /// Registers a student under an existing specialization.
    ///
    /// Checks run in order: owner, specialization, national id, address.
    async fn add_student(
        &self,
        caller: &EthAddress,
        address: &EthAddress,
        name: &str,
        national_id: &str,
        specialization: &str,
    ) -> Result<()>;

    /// Looks up a student by identity address.
    async fn verify_by_address(&self, address: &EthAddress) -> Result<Option<Student>>;

    /// Looks up a student by national id.
    async fn verify_by_national_id(&self, national_id: &str) -> Result<Option<Student>>;

    /// Marks a student as finished.
    async fn mark_finished(&self, caller: &EthAddress, national_id: &str) -> Result<()>;

    /// Marks a student as suspended.
    async fn mark_suspended(&self, caller: &EthAddress, national_id: &str) -> Result<()>;

    /// Returns counts over the current state.
    async fn stats(&self) -> Result<RegistryStats>;
}
