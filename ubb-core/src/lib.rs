//! # UBB Core
//!
//! Core types, errors, and traits for the UBB academic registry.
//!
//! This crate provides the foundational building blocks used by all other UBB crates:
//!
//! - **Types**: Faculties, specializations, students and their status machine
//! - **Errors**: One error enum whose reason strings are stable for callers
//! - **Constants**: Address sizes and persistence constants
//! - **Traits**: The [`AcademicRegistry`] interface every backend implements
//!
//! ## Example
//!
//! ```rust
//! use ubb_core::{EthAddress, StudentStatus};
//!
//! let addr = EthAddress::from_hex("0x6e33A711D62aea5a248a7035f3Cb2509146ab293").unwrap();
//! assert_eq!(addr.to_string(), "0x6e33a711d62aea5a248a7035f3cb2509146ab293");
//!
//! let status = StudentStatus::Active.finish_for("5010324142390").unwrap();
//! assert!(status.suspend_for("5010324142390").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ErrorKind, RegistryError, Result};
pub use traits::*;
pub use types::*;
