//! Domain types for UBB.
//!
//! This module provides all the core data structures used throughout the registry:
//!
//! - [`EthAddress`]: 20-byte identity address of students and the owner
//! - [`Faculty`], [`Specialization`]: the organizational records
//! - [`Student`], [`StudentStatus`]: registered learners and their status machine
//! - [`RegistrySnapshot`], [`RegistryStats`]: whole-registry views

mod address;
mod academic;
mod student;
mod snapshot;

pub use address::*;
pub use academic::*;
pub use student::*;
pub use snapshot::*;
