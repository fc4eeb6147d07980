//! Trellis: multi-tenant project and task tree management.
//!
//! This crate provides the core of a project/task management backend: tasks
//! are kept as an ordered, multi-level tree per project and can be moved
//! between parents (or to and from the top level) while sibling order and
//! parent/child references stay consistent.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`ordering`]: Ordered child lists shared by tasks and projects
//! - [`project`]: Projects, their top-level task list, and access checks
//! - [`task`]: Task tree, reparenting, and task comments
//! - [`store`]: Units of work, atomic commits, and store adapters
//! - [`config`]: Environment-driven store configuration

/// Declares a UUID-backed identifier newtype.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<::uuid::Uuid> for $name {
            fn as_ref(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod config;
pub mod error;
pub mod identity;
pub mod ordering;
pub mod project;
pub mod store;
pub mod task;
