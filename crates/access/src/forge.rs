use std::collections::HashMap;

use thiserror::Error;

/// Owner/name coordinates of a repository on the forge.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RepoName {
    /// Owner login (a user or an organization).
    pub owner: String,
    /// Repository name under that owner.
    pub name: String,
}

impl RepoName {
    /// Creates coordinates from an owner login and a repository name.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// Effective permissions the forge reports for one user on one repository.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RepoPermissions {
    /// Full administrative control.
    pub admin: bool,
    /// Permission to push.
    pub push: bool,
    /// Permission to fetch.
    pub pull: bool,
}

/// Repository metadata as resolved for a specific user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoView {
    /// Numeric identifier assigned by the forge.
    pub id: i64,
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Whether the repository is hidden from anonymous users.
    pub private: bool,
    /// Permissions of the user this view was resolved for.
    pub permissions: RepoPermissions,
}

impl RepoView {
    /// Returns the projection of this view shown to anonymous users:
    /// `admin` and `push` are forced off.
    #[must_use]
    pub fn anonymous_projection(mut self) -> Self {
        self.permissions.admin = false;
        self.permissions.push = false;
        self
    }
}

/// Team name to member logins, as resolved for one organization.
pub type TeamMap = HashMap<String, Vec<String>>;

/// Classified failure reported by a forge backend.
///
/// The type is `Clone` so one outcome can be handed to every caller that
/// coalesced onto a single backend request.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ForgeError {
    /// The resource does not exist, or is hidden from the requesting user.
    #[error("resource not found on forge")]
    NotFound,
    /// The forge could not be reached or answered with a transport error.
    #[error("forge unavailable: {message}")]
    Unavailable {
        /// Human-readable transport diagnostic.
        message: String,
    },
}

impl ForgeError {
    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Backend contract against the forge that owns repository metadata.
///
/// Implementations may block; the adapter calls them only on cache misses.
pub trait Forge: Send + Sync {
    /// Resolves repository metadata as seen by `user`.
    ///
    /// The empty user name is the anonymous lookup: implementations must
    /// answer it with [`ForgeError::NotFound`] for private repositories.
    fn repository(&self, repo: &RepoName, user: &str) -> Result<RepoView, ForgeError>;

    /// Resolves the organization `owner`'s teams to their member logins.
    fn team_members(&self, owner: &str) -> Result<TeamMap, ForgeError>;
}
