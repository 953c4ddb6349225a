//! # UBB Registry
//!
//! Storage backends for the UBB academic registry.
//!
//! This crate provides two backends for [`AcademicRegistry`]:
//!
//! - **Memory**: Fast in-memory storage for development and testing
//! - **File**: Snapshot-file persistence for single-node deployments
//!
//! ## Example
//!
//! ```rust,ignore
//! use ubb_registry::{AcademicRegistry, MemoryRegistry};
//!
//! let registry = MemoryRegistry::new(owner);
//!
//! registry.add_faculty(&owner, "Facultatea FSEGA", "FSEGA").await?;
//! registry.add_specialization(&owner, "Informatica Economica", 3, "FSEGA").await?;
//!
//! let view = registry.get_specialization("Informatica Economica").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
mod file;

pub use memory::MemoryRegistry;
pub use file::FileRegistry;

// Re-export the trait from core
pub use ubb_core::traits::AcademicRegistry;
