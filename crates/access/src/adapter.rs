use crate::acl::{AccessMode, AclSpec, PathAcl};
use crate::cache::{CacheConfig, TtlCache};
use crate::error::AccessError;
use crate::forge::{Forge, ForgeError, RepoName, RepoView, TeamMap};

/// Target for access-decision trace events.
const ACCESS_TARGET: &str = "gitsvn::access";

/// Read/write authorization for one repository.
///
/// Constructed once per served repository and shared across connections;
/// the embedded caches are the only mutable state. `can_read` and
/// `can_write` may block on backend I/O when a cache entry is cold.
#[derive(Debug)]
pub struct AccessAdapter<F> {
    forge: F,
    repo: RepoName,
    acl: Option<PathAcl>,
    repo_views: TtlCache<String, RepoView, ForgeError>,
    teams: TtlCache<String, TeamMap, ForgeError>,
}

impl<F: Forge> AccessAdapter<F> {
    /// Builds an adapter, compiling any configured ACL patterns up front.
    pub fn new(
        forge: F,
        repo: RepoName,
        acl: Option<&AclSpec>,
        config: CacheConfig,
    ) -> Result<Self, AccessError> {
        let acl = acl.map(PathAcl::compile).transpose()?;
        Ok(Self {
            forge,
            repo,
            acl,
            repo_views: TtlCache::new(config),
            teams: TtlCache::new(config),
        })
    }

    /// Decides whether `user` may read `path` on `branch`.
    ///
    /// `None` is the anonymous user. An authorization denial and a missing
    /// repository are both reported as `Ok(false)`; only transport
    /// failures become errors.
    pub fn can_read(
        &self,
        user: Option<&str>,
        branch: &str,
        path: &str,
    ) -> Result<bool, AccessError> {
        self.check(user, branch, path, AccessMode::Read)
    }

    /// Decides whether `user` may write `path` on `branch`.
    ///
    /// Anonymous writes are denied before any backend I/O.
    pub fn can_write(
        &self,
        user: Option<&str>,
        branch: &str,
        path: &str,
    ) -> Result<bool, AccessError> {
        if user.is_none() {
            tracing::debug!(target: ACCESS_TARGET, path, "anonymous write denied");
            return Ok(false);
        }
        self.check(user, branch, path, AccessMode::Write)
    }

    /// Returns the forge backend the adapter was built with.
    #[must_use]
    pub fn forge(&self) -> &F {
        &self.forge
    }

    /// Resolves the cached repository view for `user`.
    ///
    /// `Ok(None)` means the repository is missing or hidden from the user.
    /// Callers that accepted a write use the view to assemble the hook
    /// environment via [`crate::hook_environment`].
    pub fn repository_view(&self, user: Option<&str>) -> Result<Option<RepoView>, AccessError> {
        let key = user.unwrap_or_default().to_string();
        let anonymous = user.is_none();
        let loaded = self.repo_views.get_or_load(key.clone(), || {
            tracing::debug!(
                target: ACCESS_TARGET,
                user = key.as_str(),
                repo = self.repo.name.as_str(),
                "resolving repository view"
            );
            let view = self.forge.repository(&self.repo, &key)?;
            Ok(if anonymous {
                view.anonymous_projection()
            } else {
                view
            })
        });
        match loaded {
            Ok(view) => Ok(Some(view)),
            Err(ForgeError::NotFound) => {
                tracing::debug!(
                    target: ACCESS_TARGET,
                    repo = self.repo.name.as_str(),
                    "repository hidden or missing; denying"
                );
                Ok(None)
            }
            Err(ForgeError::Unavailable { message }) => Err(AccessError::Backend { message }),
        }
    }

    fn check(
        &self,
        user: Option<&str>,
        branch: &str,
        path: &str,
        mode: AccessMode,
    ) -> Result<bool, AccessError> {
        if let Some(acl) = &self.acl {
            let Some(teams) = self.resolve_teams()? else {
                return Ok(false);
            };
            return Ok(acl.permits(user, &teams, branch, path, mode));
        }

        let Some(view) = self.repository_view(user)? else {
            return Ok(false);
        };
        Ok(match mode {
            AccessMode::Read => {
                !view.private || view.permissions.pull || view.permissions.admin
            }
            AccessMode::Write => view.permissions.push || view.permissions.admin,
        })
    }

    fn resolve_teams(&self) -> Result<Option<TeamMap>, AccessError> {
        let owner = self.repo.owner.clone();
        let loaded = self.teams.get_or_load(owner.clone(), || {
            tracing::debug!(
                target: ACCESS_TARGET,
                owner = owner.as_str(),
                "resolving team membership"
            );
            self.forge.team_members(&owner)
        });
        match loaded {
            Ok(teams) => Ok(Some(teams)),
            Err(ForgeError::NotFound) => Ok(None),
            Err(ForgeError::Unavailable { message }) => Err(AccessError::Backend { message }),
        }
    }
}
