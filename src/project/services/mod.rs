//! Application services for projects.

mod access;
mod project;

pub use access::ProjectAccessGate;
pub use project::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    ensure_can_access, ensure_is_manager,
};
