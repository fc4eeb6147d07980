//! Step definitions for task tree BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
