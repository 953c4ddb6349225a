//! Error types for UBB.
//!
//! Every rule violation carries a stable, human-readable reason string.
//! Callers that need to branch on the failure use [`RegistryError::kind`].

use thiserror::Error;

use crate::types::EthAddress;

/// Result type alias using `RegistryError`.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Coarse classification of registry failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A non-owner attempted a mutation.
    PermissionDenied,
    /// A faculty symbol, specialization name, student address or national id already exists.
    DuplicateKey,
    /// A specialization or student cites a parent that does not exist.
    UnknownReference,
    /// A status change targets a student that does not exist.
    NotFound,
    /// A status change conflicts with the student's terminal status.
    InvalidStateTransition,
    /// Malformed input (addresses, hex, names).
    InvalidInput,
    /// Persistence or snapshot failure.
    Storage,
    /// Configuration problem.
    Config,
    /// Invariant violation inside the registry.
    Internal,
}

/// Main error type for all UBB operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESS CONTROL
    // ═══════════════════════════════════════════════════════════════════════════

    /// The caller is not the registry owner.
    #[error("Ownable: caller is not the owner")]
    PermissionDenied { caller: EthAddress },

    // ═══════════════════════════════════════════════════════════════════════════
    // UNIQUENESS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A faculty with this symbol already exists.
    #[error("This Faculty is already added to the contract.")]
    DuplicateFaculty(String),

    /// A specialization with this name already exists.
    #[error("This specialization is already added to the contract")]
    DuplicateSpecialization(String),

    /// A student with this national id (CNP) already exists.
    #[error("Student with this CNP has already been registered")]
    DuplicateNationalId(String),

    /// A student with this identity address already exists.
    #[error("Student with this address has already been registered")]
    DuplicateAddress(EthAddress),

    // ═══════════════════════════════════════════════════════════════════════════
    // REFERENTIAL INTEGRITY
    // ═══════════════════════════════════════════════════════════════════════════

    /// The referenced faculty symbol does not exist.
    #[error("Unknown Faculty")]
    UnknownFaculty(String),

    /// The referenced specialization name does not exist.
    #[error("Unknown Specialisation")]
    UnknownSpecialization(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STUDENT STATUS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No student is registered under this national id.
    #[error("Non-Existing Student")]
    StudentNotFound(String),

    /// The student is suspended and cannot be marked finished.
    #[error("This student is suspended")]
    StudentSuspended(String),

    /// The student already finished and cannot be suspended.
    #[error("This student already finished")]
    StudentFinished(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT & SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid identity address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Snapshot file is corrupt or violates a registry invariant.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Snapshot format version mismatch.
    #[error("Snapshot version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// The snapshot on disk belongs to a different administrator.
    #[error("Owner mismatch: registry file is owned by {stored}, not {requested}")]
    OwnerMismatch {
        stored: EthAddress,
        requested: EthAddress,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RegistryError {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            RegistryError::DuplicateFaculty(_)
            | RegistryError::DuplicateSpecialization(_)
            | RegistryError::DuplicateNationalId(_)
            | RegistryError::DuplicateAddress(_) => ErrorKind::DuplicateKey,
            RegistryError::UnknownFaculty(_) | RegistryError::UnknownSpecialization(_) => {
                ErrorKind::UnknownReference
            }
            RegistryError::StudentNotFound(_) => ErrorKind::NotFound,
            RegistryError::StudentSuspended(_) | RegistryError::StudentFinished(_) => {
                ErrorKind::InvalidStateTransition
            }
            RegistryError::InvalidAddress(_)
            | RegistryError::ValidationError(_)
            | RegistryError::JsonError(_)
            | RegistryError::HexError(_) => ErrorKind::InvalidInput,
            RegistryError::IoError(_)
            | RegistryError::CorruptSnapshot(_)
            | RegistryError::VersionMismatch { .. }
            | RegistryError::OwnerMismatch { .. } => ErrorKind::Storage,
            RegistryError::ConfigError(_) => ErrorKind::Config,
            RegistryError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if this error is a registry rule violation
    /// (access control, uniqueness, references, or status).
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PermissionDenied
                | ErrorKind::DuplicateKey
                | ErrorKind::UnknownReference
                | ErrorKind::NotFound
                | ErrorKind::InvalidStateTransition
        )
    }

    /// Returns true if this is an input validation error.
    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RegistryError::DuplicateFaculty("FSEGA".into()), "This Faculty is already added to the contract." ; "faculty")]
    #[test_case(RegistryError::DuplicateSpecialization("IE".into()), "This specialization is already added to the contract" ; "specialization")]
    #[test_case(RegistryError::UnknownFaculty("X".into()), "Unknown Faculty" ; "unknown faculty")]
    #[test_case(RegistryError::UnknownSpecialization("X".into()), "Unknown Specialisation" ; "unknown specialization")]
    #[test_case(RegistryError::DuplicateNationalId("1".into()), "Student with this CNP has already been registered" ; "cnp")]
    #[test_case(RegistryError::DuplicateAddress(EthAddress::zero()), "Student with this address has already been registered" ; "address")]
    #[test_case(RegistryError::StudentSuspended("1".into()), "This student is suspended" ; "suspended")]
    #[test_case(RegistryError::StudentFinished("1".into()), "This student already finished" ; "finished")]
    #[test_case(RegistryError::StudentNotFound("1".into()), "Non-Existing Student" ; "not found")]
    #[test_case(RegistryError::PermissionDenied { caller: EthAddress::zero() }, "Ownable: caller is not the owner" ; "permission")]
    fn test_reason_strings(err: RegistryError, expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(
            RegistryError::PermissionDenied { caller: EthAddress::zero() }.kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(RegistryError::DuplicateNationalId("1".into()).kind(), ErrorKind::DuplicateKey);
        assert_eq!(RegistryError::DuplicateAddress(EthAddress::zero()).kind(), ErrorKind::DuplicateKey);
        assert_eq!(RegistryError::UnknownFaculty("X".into()).kind(), ErrorKind::UnknownReference);
        assert_eq!(RegistryError::StudentNotFound("1".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            RegistryError::StudentFinished("1".into()).kind(),
            ErrorKind::InvalidStateTransition
        );

        assert!(RegistryError::StudentSuspended("1".into()).is_rule_violation());
        assert!(!RegistryError::ConfigError("x".into()).is_rule_violation());
        assert!(RegistryError::InvalidAddress("x".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(RegistryError::from);
        assert!(matches!(result, Err(RegistryError::JsonError(_))));
    }
}
