//! In-memory academic registry.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use ubb_core::error::{RegistryError, Result};
use ubb_core::traits::AcademicRegistry;
use ubb_core::types::{
    EthAddress, Faculty, RegistrySnapshot, RegistryStats, Specialization, SpecializationView,
    Student, StudentStatus,
};

/// The three entity collections plus the national id index.
///
/// Every `insert_*` validates fully before touching any map, so a failed
/// insert leaves the state exactly as it was.
#[derive(Debug, Default)]
struct RegistryState {
    /// symbol → faculty
    faculties: HashMap<String, Faculty>,
    /// name → specialization
    specializations: HashMap<String, Specialization>,
    /// address → student
    students: HashMap<EthAddress, Student>,
    /// national id → student address
    national_ids: HashMap<String, EthAddress>,
}

impl RegistryState {
    fn insert_faculty(&mut self, faculty: Faculty) -> Result<()> {
        faculty.validate()?;
        if self.faculties.contains_key(&faculty.symbol) {
            return Err(RegistryError::DuplicateFaculty(faculty.symbol));
        }
        self.faculties.insert(faculty.symbol.clone(), faculty);
        Ok(())
    }

    fn insert_specialization(&mut self, specialization: Specialization) -> Result<()> {
        specialization.validate()?;
        if !self.faculties.contains_key(&specialization.faculty_symbol) {
            return Err(RegistryError::UnknownFaculty(specialization.faculty_symbol));
        }
        if self.specializations.contains_key(&specialization.name) {
            return Err(RegistryError::DuplicateSpecialization(specialization.name));
        }
        self.specializations
            .insert(specialization.name.clone(), specialization);
        Ok(())
    }

    fn insert_student(&mut self, student: Student) -> Result<()> {
        student.validate()?;
        if !self.specializations.contains_key(&student.specialization) {
            return Err(RegistryError::UnknownSpecialization(student.specialization));
        }
        if self.national_ids.contains_key(&student.national_id) {
            return Err(RegistryError::DuplicateNationalId(student.national_id));
        }
        if self.students.contains_key(&student.address) {
            return Err(RegistryError::DuplicateAddress(student.address));
        }

        self.national_ids
            .insert(student.national_id.clone(), student.address);
        self.students.insert(student.address, student);
        Ok(())
    }

    fn student_by_national_id(&self, national_id: &str) -> Option<&Student> {
        self.national_ids
            .get(national_id)
            .and_then(|address| self.students.get(address))
    }

    fn student_by_national_id_mut(&mut self, national_id: &str) -> Result<&mut Student> {
        let address = *self
            .national_ids
            .get(national_id)
            .ok_or_else(|| RegistryError::StudentNotFound(national_id.to_string()))?;

        self.students.get_mut(&address).ok_or_else(|| {
            RegistryError::InternalError(format!(
                "national id index points at missing student {address}"
            ))
        })
    }

    fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            faculties: self.faculties.len() as u64,
            specializations: self.specializations.len() as u64,
            ..RegistryStats::new()
        };
        for student in self.students.values() {
            stats.add_student(student.status);
        }
        stats
    }
}

/// In-memory academic registry.
///
/// All state sits behind a single lock, and each mutation checks and commits
/// under one write guard, so mutations are totally ordered and readers never
/// see a partially applied insert.
///
/// # Indexing
///
/// - Faculties by symbol
/// - Specializations by name
/// - Students by identity address, plus a national id → address index
#[derive(Debug)]
pub struct MemoryRegistry {
    /// The only address allowed to mutate state
    owner: EthAddress,
    state: RwLock<RegistryState>,
}

impl MemoryRegistry {
    /// Creates a new empty registry administered by `owner`.
    pub fn new(owner: EthAddress) -> Self {
        Self {
            owner,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// Records pass through the same checks as live inserts, so a snapshot
    /// with duplicate keys or dangling references is rejected as corrupt.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut state = RegistryState::default();

        for faculty in snapshot.faculties {
            state.insert_faculty(faculty).map_err(corrupt)?;
        }
        for specialization in snapshot.specializations {
            state.insert_specialization(specialization).map_err(corrupt)?;
        }
        for student in snapshot.students {
            state.insert_student(student).map_err(corrupt)?;
        }

        debug!(
            faculties = state.faculties.len(),
            specializations = state.specializations.len(),
            students = state.students.len(),
            "Registry restored from snapshot"
        );

        Ok(Self {
            owner: snapshot.owner,
            state: RwLock::new(state),
        })
    }

    /// Captures the current state, each collection sorted by its key.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();

        let mut snapshot = RegistrySnapshot::empty(self.owner);
        snapshot.faculties = state.faculties.values().cloned().collect();
        snapshot.faculties.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        snapshot.specializations = state.specializations.values().cloned().collect();
        snapshot.specializations.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot.students = state.students.values().cloned().collect();
        snapshot.students.sort_by_key(|s| s.address);
        snapshot
    }

    /// Returns the number of students.
    pub fn len(&self) -> usize {
        self.state.read().students.len()
    }

    /// Returns true if no faculty, specialization or student exists.
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.faculties.is_empty() && state.specializations.is_empty() && state.students.is_empty()
    }

    /// Access-control gate run before any mutation.
    fn ensure_owner(&self, caller: &EthAddress) -> Result<()> {
        if *caller != self.owner {
            warn!(%caller, "Rejected mutation from non-owner");
            return Err(RegistryError::PermissionDenied { caller: *caller });
        }
        Ok(())
    }

    fn transition(
        &self,
        caller: &EthAddress,
        national_id: &str,
        apply: fn(StudentStatus, &str) -> Result<StudentStatus>,
    ) -> Result<StudentStatus> {
        self.ensure_owner(caller)?;

        let mut state = self.state.write();
        let student = state.student_by_national_id_mut(national_id)?;
        let next = apply(student.status, national_id)?;
        student.status = next;
        Ok(next)
    }
}

fn corrupt(err: RegistryError) -> RegistryError {
    RegistryError::CorruptSnapshot(err.to_string())
}

#[async_trait]
impl AcademicRegistry for MemoryRegistry {
    fn owner(&self) -> EthAddress {
        self.owner
    }

    #[instrument(skip(self, name))]
    async fn add_faculty(&self, caller: &EthAddress, name: &str, symbol: &str) -> Result<()> {
        self.ensure_owner(caller)?;

        self.state
            .write()
            .insert_faculty(Faculty::new(name, symbol))?;

        debug!(symbol, "Faculty added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_faculty(&self, symbol: &str) -> Result<Option<Faculty>> {
        Ok(self.state.read().faculties.get(symbol).cloned())
    }

    #[instrument(skip(self))]
    async fn add_specialization(
        &self,
        caller: &EthAddress,
        name: &str,
        duration_years: u32,
        faculty_symbol: &str,
    ) -> Result<()> {
        self.ensure_owner(caller)?;

        self.state
            .write()
            .insert_specialization(Specialization::new(name, duration_years, faculty_symbol))?;

        debug!(name, faculty_symbol, "Specialization added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_specialization(&self, name: &str) -> Result<Option<SpecializationView>> {
        let state = self.state.read();
        let view = state.specializations.get(name).map(|spec| SpecializationView {
            faculty_symbol: spec.faculty_symbol.clone(),
            specialization: spec.clone(),
        });
        Ok(view)
    }

    #[instrument(skip(self, name))]
    async fn add_student(
        &self,
        caller: &EthAddress,
        address: &EthAddress,
        name: &str,
        national_id: &str,
        specialization: &str,
    ) -> Result<()> {
        self.ensure_owner(caller)?;

        self.state
            .write()
            .insert_student(Student::new(*address, name, national_id, specialization))?;

        debug!(%address, specialization, "Student registered");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn verify_by_address(&self, address: &EthAddress) -> Result<Option<Student>> {
        Ok(self.state.read().students.get(address).cloned())
    }

    #[instrument(skip(self))]
    async fn verify_by_national_id(&self, national_id: &str) -> Result<Option<Student>> {
        Ok(self
            .state
            .read()
            .student_by_national_id(national_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn mark_finished(&self, caller: &EthAddress, national_id: &str) -> Result<()> {
        self.transition(caller, national_id, StudentStatus::finish_for)?;
        debug!(national_id, "Student marked finished");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_suspended(&self, caller: &EthAddress, national_id: &str) -> Result<()> {
        self.transition(caller, national_id, StudentStatus::suspend_for)?;
        debug!(national_id, "Student marked suspended");
        Ok(())
    }

    async fn stats(&self) -> Result<RegistryStats> {
        Ok(self.state.read().stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ubb_core::error::ErrorKind;

    const FACULTY_NAME: &str = "Facultatea de Stiinte Economice si Gestiunea Afacerilor";
    const SYMBOL: &str = "FSEGA";
    const SPEC_NAME: &str = "Informatica Economica";
    const STUDENT_NAME: &str = "Toro Etele";
    const STUDENT_ADDRESS: &str = "0x6e33A711D62aea5a248a7035f3Cb2509146ab293";
    const CNP: &str = "5010324142390";

    fn owner() -> EthAddress {
        EthAddress::from_array([0x11; 20])
    }

    fn other() -> EthAddress {
        EthAddress::from_array([0x22; 20])
    }

    fn student_address() -> EthAddress {
        EthAddress::from_hex(STUDENT_ADDRESS).unwrap()
    }

    async fn seeded() -> MemoryRegistry {
        let registry = MemoryRegistry::new(owner());
        registry.add_faculty(&owner(), FACULTY_NAME, SYMBOL).await.unwrap();
        registry
            .add_specialization(&owner(), SPEC_NAME, 3, SYMBOL)
            .await
            .unwrap();
        registry
            .add_student(&owner(), &student_address(), STUDENT_NAME, CNP, SPEC_NAME)
            .await
            .unwrap();
        registry
    }

    // ─── faculties ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_and_get_faculty() {
        let registry = seeded().await;

        let faculty = registry.get_faculty(SYMBOL).await.unwrap().unwrap();
        assert_eq!(faculty.name, FACULTY_NAME);
        assert_eq!(faculty.symbol, SYMBOL);
    }

    #[tokio::test]
    async fn test_get_missing_faculty() {
        let registry = seeded().await;
        assert!(registry.get_faculty("Non-existing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_faculty_rejected() {
        let registry = seeded().await;

        let err = registry
            .add_faculty(&owner(), FACULTY_NAME, SYMBOL)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "This Faculty is already added to the contract.");

        // The first record is kept
        let faculty = registry.get_faculty(SYMBOL).await.unwrap().unwrap();
        assert_eq!(faculty.name, FACULTY_NAME);
    }

    // ─── specializations ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_specialization_joins_faculty() {
        let registry = seeded().await;

        let view = registry.get_specialization(SPEC_NAME).await.unwrap().unwrap();
        assert_eq!(view.specialization.name, SPEC_NAME);
        assert_eq!(view.specialization.duration_years, 3);
        assert_eq!(view.faculty_symbol, SYMBOL);
    }

    #[tokio::test]
    async fn test_duplicate_specialization_rejected() {
        let registry = seeded().await;

        let err = registry
            .add_specialization(&owner(), SPEC_NAME, 3, SYMBOL)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This specialization is already added to the contract"
        );
    }

    #[tokio::test]
    async fn test_specialization_requires_faculty() {
        let registry = seeded().await;

        let err = registry
            .add_specialization(&owner(), "New Specialization", 3, "Non-existig")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown Faculty");
        assert_eq!(err.kind(), ErrorKind::UnknownReference);
        assert!(registry
            .get_specialization("New Specialization")
            .await
            .unwrap()
            .is_none());
    }

    // ─── students ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_verify_by_address() {
        let registry = seeded().await;

        let student = registry
            .verify_by_address(&student_address())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.name, STUDENT_NAME);
        assert_eq!(student.national_id, CNP);
        assert_eq!(student.specialization, SPEC_NAME);
        assert!(!student.finished());
        assert!(!student.suspended());
    }

    #[tokio::test]
    async fn test_verify_by_either_key_is_identical() {
        let registry = seeded().await;
        registry.mark_finished(&owner(), CNP).await.unwrap();

        let by_address = registry.verify_by_address(&student_address()).await.unwrap();
        let by_cnp = registry.verify_by_national_id(CNP).await.unwrap();
        assert!(by_address.is_some());
        assert_eq!(by_address, by_cnp);
    }

    #[tokio::test]
    async fn test_duplicate_cnp_rejected() {
        let registry = seeded().await;

        // Same address and CNP: the CNP check fires first
        let err = registry
            .add_student(&owner(), &student_address(), STUDENT_NAME, CNP, SPEC_NAME)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Student with this CNP has already been registered");

        // New address, colliding CNP
        let err = registry
            .add_student(&owner(), &other(), STUDENT_NAME, CNP, SPEC_NAME)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateNationalId(_)));
        assert!(registry.verify_by_address(&other()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_address_rejected() {
        let registry = seeded().await;

        let err = registry
            .add_student(&owner(), &student_address(), STUDENT_NAME, "Custom-CNP", SPEC_NAME)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Student with this address has already been registered"
        );
        assert!(registry.verify_by_national_id("Custom-CNP").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_student_requires_specialization() {
        let registry = seeded().await;

        // The reference check runs before either duplicate check
        let err = registry
            .add_student(&owner(), &student_address(), STUDENT_NAME, CNP, "Non-existing")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown Specialisation");
    }

    // ─── status ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mark_finished() {
        let registry = seeded().await;
        registry.mark_finished(&owner(), CNP).await.unwrap();

        let student = registry
            .verify_by_address(&student_address())
            .await
            .unwrap()
            .unwrap();
        assert!(student.finished());
        assert!(!student.suspended());
    }

    #[tokio::test]
    async fn test_mark_suspended() {
        let registry = seeded().await;
        registry.mark_suspended(&owner(), CNP).await.unwrap();

        let student = registry
            .verify_by_address(&student_address())
            .await
            .unwrap()
            .unwrap();
        assert!(student.suspended());
        assert!(!student.finished());
    }

    #[tokio::test]
    async fn test_suspended_cannot_finish() {
        let registry = seeded().await;
        registry.mark_suspended(&owner(), CNP).await.unwrap();

        let err = registry.mark_finished(&owner(), CNP).await.unwrap_err();
        assert_eq!(err.to_string(), "This student is suspended");
        assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);

        let student = registry.verify_by_national_id(CNP).await.unwrap().unwrap();
        assert_eq!(student.status, StudentStatus::Suspended);
    }

    #[tokio::test]
    async fn test_finished_cannot_be_suspended() {
        let registry = seeded().await;
        registry.mark_finished(&owner(), CNP).await.unwrap();

        let err = registry.mark_suspended(&owner(), CNP).await.unwrap_err();
        assert_eq!(err.to_string(), "This student already finished");

        let student = registry.verify_by_national_id(CNP).await.unwrap().unwrap();
        assert_eq!(student.status, StudentStatus::Finished);
    }

    #[tokio::test]
    async fn test_status_change_on_missing_student() {
        let registry = seeded().await;

        let err = registry.mark_finished(&owner(), "Custom-CNP").await.unwrap_err();
        assert_eq!(err.to_string(), "Non-Existing Student");

        let err = registry.mark_suspended(&owner(), "Custom-CNP").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // ─── access control ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_non_owner_mutations_rejected() {
        let registry = seeded().await;
        let before = registry.snapshot();
        let outsider = other();

        let results = vec![
            registry.add_faculty(&outsider, FACULTY_NAME, "FMI").await,
            registry
                .add_specialization(&outsider, "Informatica", 3, SYMBOL)
                .await,
            registry
                .add_student(&outsider, &outsider, "Someone", "123", SPEC_NAME)
                .await,
            registry.mark_finished(&outsider, CNP).await,
            registry.mark_suspended(&outsider, CNP).await,
        ];

        for result in results {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "Ownable: caller is not the owner");
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        }

        let after = registry.snapshot();
        assert_eq!(before.faculties, after.faculties);
        assert_eq!(before.specializations, after.specializations);
        assert_eq!(before.students, after.students);
    }

    #[tokio::test]
    async fn test_owner_is_fixed() {
        let registry = MemoryRegistry::new(owner());
        assert_eq!(registry.owner(), owner());
    }

    // ─── snapshots & stats ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_snapshot_restore() {
        let registry = seeded().await;
        registry.mark_suspended(&owner(), CNP).await.unwrap();

        let restored = MemoryRegistry::from_snapshot(registry.snapshot()).unwrap();
        assert_eq!(restored.owner(), owner());
        assert_eq!(restored.len(), 1);

        let student = restored.verify_by_national_id(CNP).await.unwrap().unwrap();
        assert!(student.suspended());
        assert_eq!(
            restored.get_specialization(SPEC_NAME).await.unwrap().unwrap().faculty_symbol,
            SYMBOL
        );
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_rejected() {
        let registry = seeded().await;

        let mut dangling = registry.snapshot();
        dangling.faculties.clear();
        let err = MemoryRegistry::from_snapshot(dangling).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptSnapshot(ref reason) if reason == "Unknown Faculty"));

        let mut duplicated = registry.snapshot();
        let mut twin = duplicated.students[0].clone();
        twin.address = other();
        duplicated.students.push(twin);
        assert!(matches!(
            MemoryRegistry::from_snapshot(duplicated),
            Err(RegistryError::CorruptSnapshot(_))
        ));
    }

    #[tokio::test]
    async fn test_stats() {
        let registry = seeded().await;
        registry
            .add_student(&owner(), &other(), "Second", "2990101000000", SPEC_NAME)
            .await
            .unwrap();
        registry.mark_finished(&owner(), CNP).await.unwrap();

        let stats = registry.stats().await.unwrap();
        assert_eq!(stats.faculties, 1);
        assert_eq!(stats.specializations, 1);
        assert_eq!(stats.students, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.finished, 1);
        assert_eq!(stats.suspended, 0);
    }

    #[tokio::test]
    async fn test_concurrent_registrations() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let registry = Arc::new(seeded().await);
        let mut tasks = JoinSet::new();

        // Every task reuses the same CNP; exactly one may win
        for i in 0..50u8 {
            let reg = registry.clone();
            tasks.spawn(async move {
                let address = EthAddress::from_array([i.wrapping_add(100); 20]);
                reg.add_student(&owner(), &address, "Racer", "RACE-CNP", SPEC_NAME)
                    .await
                    .is_ok()
            });
        }

        let mut wins = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(registry.len(), 2);
    }

    // ─── properties ──────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_faculty_symbol_unique(
            symbol in "[A-Z]{1,8}",
            first in ".{0,20}",
            second in ".{0,20}",
        ) {
            tokio_test::block_on(async {
                let registry = MemoryRegistry::new(owner());
                registry.add_faculty(&owner(), &first, &symbol).await.unwrap();

                let err = registry.add_faculty(&owner(), &second, &symbol).await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::DuplicateKey);
                assert_eq!(registry.get_faculty(&symbol).await.unwrap().unwrap().name, first);
            });
        }

        #[test]
        fn prop_unknown_references_rejected(symbol in "[A-Z]{1,8}", spec in "[a-z]{1,16}") {
            tokio_test::block_on(async {
                let registry = MemoryRegistry::new(owner());

                let err = registry.add_specialization(&owner(), &spec, 3, &symbol).await.unwrap_err();
                assert!(matches!(err, RegistryError::UnknownFaculty(_)));

                let err = registry
                    .add_student(&owner(), &other(), "Someone", "123", &spec)
                    .await
                    .unwrap_err();
                assert!(matches!(err, RegistryError::UnknownSpecialization(_)));
                assert!(registry.is_empty());
            });
        }

        #[test]
        fn prop_terminal_states_exclusive(finish_first in any::<bool>()) {
            tokio_test::block_on(async {
                let registry = seeded().await;

                if finish_first {
                    registry.mark_finished(&owner(), CNP).await.unwrap();
                    let err = registry.mark_suspended(&owner(), CNP).await.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
                } else {
                    registry.mark_suspended(&owner(), CNP).await.unwrap();
                    let err = registry.mark_finished(&owner(), CNP).await.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
                }
            });
        }

        #[test]
        fn prop_non_owner_never_mutates(caller in any::<[u8; 20]>()) {
            let caller = EthAddress::from_array(caller);
            prop_assume!(caller != owner());

            tokio_test::block_on(async {
                let registry = MemoryRegistry::new(owner());
                let err = registry.add_faculty(&caller, "Name", "SYM").await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::PermissionDenied);
                assert!(registry.is_empty());
            });
        }
    }
}
