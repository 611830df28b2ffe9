//! End-to-end adapter scenarios against a scripted forge stub.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use access::{
    hook_environment, AccessAdapter, AccessError, AccessMode, AclRule, AclSpec, CacheConfig,
    Forge, ForgeError, PrincipalSelector, RepoName, RepoPermissions, RepoView, TeamMap,
    ENV_REPO_ID, ENV_REPO_IS_WIKI, ENV_SSH_ORIGINAL_COMMAND,
};

/// Scripted forge: per-user repository answers plus one team map, with
/// call counters for cache assertions.
struct StubForge {
    repos: Mutex<HashMap<String, Result<RepoView, ForgeError>>>,
    teams: Result<TeamMap, ForgeError>,
    repo_calls: AtomicUsize,
    team_calls: AtomicUsize,
}

impl Default for StubForge {
    fn default() -> Self {
        Self {
            repos: Mutex::new(HashMap::new()),
            teams: Ok(TeamMap::new()),
            repo_calls: AtomicUsize::new(0),
            team_calls: AtomicUsize::new(0),
        }
    }
}

impl StubForge {
    fn with_repo(self, user: &str, answer: Result<RepoView, ForgeError>) -> Self {
        self.repos
            .lock()
            .expect("stub lock")
            .insert(user.to_string(), answer);
        self
    }

    fn with_teams(mut self, teams: TeamMap) -> Self {
        self.teams = Ok(teams);
        self
    }
}

impl Forge for StubForge {
    fn repository(&self, _repo: &RepoName, user: &str) -> Result<RepoView, ForgeError> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        self.repos
            .lock()
            .expect("stub lock")
            .get(user)
            .cloned()
            .unwrap_or(Err(ForgeError::NotFound))
    }

    fn team_members(&self, _owner: &str) -> Result<TeamMap, ForgeError> {
        self.team_calls.fetch_add(1, Ordering::SeqCst);
        self.teams.clone()
    }
}

fn repo_name() -> RepoName {
    RepoName::new("acme", "widgets")
}

fn view(private: bool, permissions: RepoPermissions) -> RepoView {
    RepoView {
        id: 42,
        owner: "acme".to_string(),
        name: "widgets".to_string(),
        private,
        permissions,
    }
}

fn public_view() -> RepoView {
    view(
        false,
        RepoPermissions {
            admin: false,
            push: false,
            pull: true,
        },
    )
}

fn short_ttl() -> CacheConfig {
    CacheConfig {
        capacity: NonZeroUsize::new(16).expect("non-zero"),
        ttl: Duration::from_millis(30),
    }
}

fn adapter(forge: StubForge, acl: Option<&AclSpec>) -> AccessAdapter<StubForge> {
    AccessAdapter::new(forge, repo_name(), acl, CacheConfig::default()).expect("adapter builds")
}

#[test]
fn anonymous_user_on_public_repo_reads_but_never_writes() {
    let forge = StubForge::default().with_repo("", Ok(public_view()));
    let adapter = adapter(forge, None);

    assert!(adapter.can_read(None, "master", "docs/a.txt").expect("read check"));
    assert!(!adapter.can_write(None, "master", "docs/a.txt").expect("write check"));
}

#[test]
fn anonymous_write_precheck_makes_no_backend_call() {
    let forge = StubForge::default();
    let adapter = adapter(forge, None);

    assert!(!adapter.can_write(None, "master", "anything").expect("write check"));
    assert_eq!(adapter_forge(&adapter).repo_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn anonymous_user_on_private_repo_is_denied_everything() {
    // The forge hides private repositories from the anonymous lookup.
    let forge = StubForge::default().with_repo("", Err(ForgeError::NotFound));
    let adapter = adapter(forge, None);

    assert!(!adapter.can_read(None, "master", "docs/a.txt").expect("read check"));
    assert!(!adapter.can_write(None, "master", "docs/a.txt").expect("write check"));
}

#[test]
fn push_permission_gates_writes_without_an_acl() {
    let contributor = view(
        true,
        RepoPermissions {
            admin: false,
            push: true,
            pull: true,
        },
    );
    let visitor = view(
        true,
        RepoPermissions {
            admin: false,
            push: false,
            pull: true,
        },
    );
    let forge = StubForge::default()
        .with_repo("bob", Ok(contributor))
        .with_repo("eve", Ok(visitor));
    let adapter = adapter(forge, None);

    assert!(adapter.can_write(Some("bob"), "master", "src/x").expect("write check"));
    assert!(adapter.can_read(Some("eve"), "master", "src/x").expect("read check"));
    assert!(!adapter.can_write(Some("eve"), "master", "src/x").expect("write check"));
}

#[test]
fn missing_repository_reads_as_deny_not_error() {
    let forge = StubForge::default().with_repo("ghost", Err(ForgeError::NotFound));
    let adapter = adapter(forge, None);

    assert!(!adapter.can_read(Some("ghost"), "master", "x").expect("read check"));
}

#[test]
fn transport_failure_surfaces_as_error() {
    let forge = StubForge::default().with_repo(
        "alice",
        Err(ForgeError::unavailable("connection refused")),
    );
    let adapter = adapter(forge, None);

    let error = adapter
        .can_read(Some("alice"), "master", "x")
        .expect_err("backend failure");
    assert!(matches!(error, AccessError::Backend { .. }));
}

#[test]
fn acl_team_grant_admits_members_per_path() {
    let mut teams = TeamMap::new();
    teams.insert("docs-readers".to_string(), vec!["alice".to_string()]);
    let forge = StubForge::default().with_teams(teams);

    let spec = AclSpec::new(vec![AclRule::allow(
        PrincipalSelector::Team("docs-readers".to_string()),
        "docs/**",
        AccessMode::Read,
    )]);
    let adapter = adapter(forge, Some(&spec));

    assert!(adapter.can_read(Some("alice"), "master", "docs/a.txt").expect("read check"));
    assert!(!adapter.can_read(Some("alice"), "master", "src/a.c").expect("read check"));
    assert!(!adapter.can_read(Some("mallory"), "master", "docs/a.txt").expect("read check"));
}

#[test]
fn cache_hit_within_ttl_skips_the_backend() {
    let forge = StubForge::default().with_repo("alice", Ok(public_view()));
    let adapter = AccessAdapter::new(forge, repo_name(), None, short_ttl()).expect("adapter");

    assert!(adapter.can_read(Some("alice"), "master", "a").expect("read check"));
    assert!(adapter.can_read(Some("alice"), "master", "b").expect("read check"));
    assert_eq!(adapter_forge(&adapter).repo_calls.load(Ordering::SeqCst), 1);

    std::thread::sleep(Duration::from_millis(60));
    assert!(adapter.can_read(Some("alice"), "master", "c").expect("read check"));
    assert_eq!(adapter_forge(&adapter).repo_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn team_map_is_cached_per_owner() {
    let mut teams = TeamMap::new();
    teams.insert("t".to_string(), vec!["alice".to_string()]);
    let forge = StubForge::default().with_teams(teams);
    let spec = AclSpec::new(vec![AclRule::allow(
        PrincipalSelector::Team("t".to_string()),
        "**",
        AccessMode::Read,
    )]);
    let adapter = adapter(forge, Some(&spec));

    for path in ["a", "b/c", "d"] {
        assert!(adapter.can_read(Some("alice"), "master", path).expect("read check"));
    }
    assert_eq!(adapter_forge(&adapter).team_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn distinct_users_resolve_distinct_views() {
    let forge = StubForge::default()
        .with_repo("alice", Ok(public_view()))
        .with_repo("bob", Ok(public_view()));
    let adapter = adapter(forge, None);

    assert!(adapter.can_read(Some("alice"), "master", "x").expect("read check"));
    assert!(adapter.can_read(Some("bob"), "master", "x").expect("read check"));
    assert_eq!(adapter_forge(&adapter).repo_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn invalid_acl_pattern_fails_construction() {
    let spec = AclSpec::new(vec![AclRule::allow(
        PrincipalSelector::User("alice".to_string()),
        "docs/[bad",
        AccessMode::Read,
    )]);
    let result = AccessAdapter::new(StubForge::default(), repo_name(), Some(&spec), CacheConfig::default());
    assert!(matches!(result, Err(AccessError::Pattern(_))));
}

#[test]
fn accepted_write_yields_the_hook_environment() {
    let writer = view(
        false,
        RepoPermissions {
            admin: false,
            push: true,
            pull: true,
        },
    );
    let forge = StubForge::default().with_repo("bob", Ok(writer));
    let adapter = adapter(forge, None);

    assert!(adapter.can_write(Some("bob"), "master", "src/x").expect("write check"));
    let resolved = adapter
        .repository_view(Some("bob"))
        .expect("view resolves")
        .expect("view present");
    let entries = hook_environment(&resolved, None, None);

    assert!(entries.contains(&(ENV_REPO_ID, "42".to_string())));
    assert!(entries.contains(&(ENV_REPO_IS_WIKI, "false".to_string())));
    assert!(entries.contains(&(ENV_SSH_ORIGINAL_COMMAND, "git".to_string())));
}

/// The adapter owns its forge; reach it for counter assertions.
fn adapter_forge(adapter: &AccessAdapter<StubForge>) -> &StubForge {
    adapter.forge()
}
