//! Registry constants for UBB.

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an identity address (Ethereum-style account) in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Magic bytes at the start of every registry snapshot file.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"UBBR";

/// Current snapshot format version.
/// Increment when making breaking changes to the snapshot layout.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Length of the fixed snapshot header: magic (4) || version (1) || count (8).
pub const SNAPSHOT_HEADER_SIZE: usize = 13;

// ═══════════════════════════════════════════════════════════════════════════════
// API
// ═══════════════════════════════════════════════════════════════════════════════

/// Header carrying the caller address on mutating HTTP requests.
pub const CALLER_HEADER: &str = "x-caller-address";

/// Default port for the HTTP API.
pub const DEFAULT_API_PORT: u16 = 3001;
