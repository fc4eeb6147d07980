//! Identities of the organisational collaborators.
//!
//! Users and companies are managed outside this crate. The tree core only
//! needs their identifiers: authorship, project management, access grants,
//! and tenancy.

uuid_identifier! {
    /// Identifier of a user account.
    UserId
}

uuid_identifier! {
    /// Identifier of a company (tenant).
    CompanyId
}
