//! Stage file format
//!
//! The staging area is persisted as a single binary record:
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "STGE" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length, sorted by path):
//!   - Change kind (1 byte): 0 added, 1 modified, 2 removed
//!   - Snapshot object ID (20 bytes, zeroed for removals)
//!   - Path length (2 bytes)
//!   - Path (UTF-8)
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod stage_entry;
pub mod stage_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the stage header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying stage files
pub const SIGNATURE: &str = "STGE";

/// Stage file format version
pub const VERSION: u32 = 1;
