//! Domain model for projects.

mod error;
mod project;

pub use error::ProjectDomainError;
pub use project::{NewProject, PersistedProjectData, Project};

uuid_identifier! {
    /// Unique identifier for a project.
    ProjectId
}
