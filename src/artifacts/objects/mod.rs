//! Stored object types
//!
//! A repository keeps two kinds of immutable, content-addressed records:
//!
//! - **Blob**: the raw bytes of one file version
//! - **Commit**: a snapshot (path to blob map) plus message, timestamp and parents
//!
//! Both share the on-disk framing `<type> <size>\0<content>` and are identified
//! by a SHA-1 object ID.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const OBJECT_ID_BYTES: usize = 20;
