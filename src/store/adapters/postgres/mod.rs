//! `PostgreSQL` store backed by Diesel and an r2d2 connection pool.
//!
//! Ordered lists live in `uuid[]` columns on their owner rows. A unit of
//! work runs inside one database transaction.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTreeStore, TreePgPool};
