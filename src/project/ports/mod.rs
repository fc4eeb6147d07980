//! Port contracts for projects.
//!
//! Ports define infrastructure-agnostic interfaces used by project and task
//! services.

pub mod access;
pub mod repository;

#[cfg(test)]
pub use access::MockAccessGate;
pub use access::{AccessError, AccessGate};
pub use repository::ProjectRepository;
