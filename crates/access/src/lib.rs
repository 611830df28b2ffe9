#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `access` decides, for a user, branch, and repository path, whether the
//! gitsvn bridge may serve a read or accept a write. When a per-path ACL is
//! configured the decision is delegated to compiled path patterns; otherwise
//! the repository's intrinsic permissions, as resolved by the forge, apply.
//! Repository metadata and organization team membership are held in bounded,
//! time-expiring caches so that hot-path checks stay off the network.
//!
//! # Design
//!
//! - [`Forge`] is the backend contract: per-user repository resolution and
//!   organization team membership. Transport failures and missing resources
//!   arrive pre-classified as [`ForgeError`] variants.
//! - [`AclSpec`] is the configured rule list; [`PathAcl`] is its compiled
//!   form. Rules are evaluated in order with the last matching rule winning
//!   and a default of deny. A rule that names a directory covers everything
//!   beneath it.
//! - [`AccessAdapter`] ties the pieces together: an anonymous write is
//!   denied before any I/O, a missing repository reads as deny rather than
//!   an error, and only transport failures surface to the caller.
//! - [`TtlCache`] is the shared cache shape: bounded LRU, time-to-live from
//!   write, and single-flight loading so concurrent misses for one key
//!   collapse into one backend call.
//!
//! # Invariants
//!
//! - The adapter is safe under concurrent calls; the caches are its only
//!   mutable state.
//! - Anonymous users can never write and never match an ACL principal.
//! - A failed cache load never poisons the slot: the next caller retries.
//!
//! # Errors
//!
//! [`AccessError::Pattern`] reports an ACL rule whose path pattern does not
//! compile, at adapter construction. [`AccessError::Backend`] reports a
//! forge transport failure at check time. A missing resource is not an
//! error: it is a deny.

mod acl;
mod adapter;
mod cache;
mod env;
mod error;
mod forge;

pub use acl::{AccessMode, AclRule, AclSpec, PathAcl, PrincipalSelector, Verdict};
pub use adapter::AccessAdapter;
pub use cache::{CacheConfig, TtlCache};
pub use env::{
    hook_environment, Pusher, ENV_DEPLOY_KEY_ID, ENV_PUSHER_EMAIL, ENV_PUSHER_ID, ENV_REPO_ID,
    ENV_REPO_IS_WIKI, ENV_REPO_NAME, ENV_REPO_USER, ENV_SSH_ORIGINAL_COMMAND,
};
pub use error::AccessError;
pub use forge::{Forge, ForgeError, RepoName, RepoPermissions, RepoView, TeamMap};
