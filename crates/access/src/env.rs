use crate::forge::RepoView;

/// Repository identifier passed to Git hooks.
pub const ENV_REPO_ID: &str = "GITEA_REPO_ID";
/// Wiki flag passed to Git hooks; this bridge never serves wikis.
pub const ENV_REPO_IS_WIKI: &str = "GITEA_REPO_IS_WIKI";
/// Repository name passed to Git hooks.
pub const ENV_REPO_NAME: &str = "GITEA_REPO_NAME";
/// Repository owner passed to Git hooks.
pub const ENV_REPO_USER: &str = "GITEA_REPO_USER";
/// Original command the hook chain expects to see.
pub const ENV_SSH_ORIGINAL_COMMAND: &str = "SSH_ORIGINAL_COMMAND";
/// E-mail address of the pushing user, when known.
pub const ENV_PUSHER_EMAIL: &str = "GITEA_PUSHER_EMAIL";
/// Numeric identifier of the pushing user, when known.
pub const ENV_PUSHER_ID: &str = "GITEA_PUSHER_ID";
/// Deploy key used for the push, when one was.
pub const ENV_DEPLOY_KEY_ID: &str = "GITEA_DEPLOY_KEY_ID";

/// Identity of the user performing a push.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pusher {
    /// Numeric identifier assigned by the forge.
    pub id: i64,
    /// Primary e-mail address.
    pub email: String,
}

/// Environment entries for the child process that runs Git hooks on an
/// accepted write.
#[must_use]
pub fn hook_environment(
    view: &RepoView,
    pusher: Option<&Pusher>,
    deploy_key_id: Option<i64>,
) -> Vec<(&'static str, String)> {
    let mut entries = vec![
        (ENV_REPO_ID, view.id.to_string()),
        (ENV_REPO_IS_WIKI, "false".to_string()),
        (ENV_REPO_NAME, view.name.clone()),
        (ENV_REPO_USER, view.owner.clone()),
        (ENV_SSH_ORIGINAL_COMMAND, "git".to_string()),
    ];
    if let Some(pusher) = pusher {
        entries.push((ENV_PUSHER_EMAIL, pusher.email.clone()));
        entries.push((ENV_PUSHER_ID, pusher.id.to_string()));
    }
    if let Some(deploy_key) = deploy_key_id {
        entries.push((ENV_DEPLOY_KEY_ID, deploy_key.to_string()));
    }
    entries
}
