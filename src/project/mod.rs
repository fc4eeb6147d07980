//! Projects and their top-level task lists.
//!
//! A project is the authorisation root for its tasks: its manager and the
//! users listed in its accesses may read and change them. The project also
//! owns the ordered list of its top-level tasks and a `task_updated_at`
//! timestamp used to sort recently active projects. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Store adapters live in [`crate::store::adapters`] because one adapter
//! serves both the project and the task contexts.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
