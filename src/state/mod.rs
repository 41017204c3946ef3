//! Screen state containers.
//!
//! ARCHITECTURE
//! ============
//! State is plain data mutated by `pages`; nothing here performs I/O, which
//! keeps form and list behavior testable without a transport.

pub mod credentials;
pub mod positions;
