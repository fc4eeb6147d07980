//! Ordered task trees.
//!
//! Tasks form an ordered, multi-level tree per project: top-level tasks are
//! listed in the project's top-level list and every other task sits in
//! exactly one parent's children list, consistent with its parent
//! reference. This module creates, updates, soft-deletes, and moves tasks
//! (within a parent, between parents, and to or from the top level) while
//! keeping that invariant, and manages task comments. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
