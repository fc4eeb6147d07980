//! Store adapters: an in-memory store for tests and local use, and a
//! `PostgreSQL` store backed by Diesel.

pub mod memory;
pub mod postgres;
