//! Networking modules for the positions REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds authenticated requests and applies the 401 policy,
//! `transport` moves them over HTTP, and `types` defines the wire schema.

pub mod api;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
