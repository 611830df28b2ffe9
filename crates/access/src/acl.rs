use pathglob::PathGlob;

use crate::error::AccessError;
use crate::forge::TeamMap;

/// Who an ACL rule applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrincipalSelector {
    /// A user, selected directly by login.
    User(String),
    /// Every member of an organization team, resolved at check time.
    Team(String),
}

/// Level of access an ACL rule speaks about. Write subsumes read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessMode {
    /// Read the path.
    Read,
    /// Modify the path (implies read).
    Write,
}

/// Outcome a matching rule contributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Grant the requested access.
    Allow,
    /// Withdraw the requested access.
    Deny,
}

/// One configured ACL rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AclRule {
    /// Principal the rule selects.
    pub principal: PrincipalSelector,
    /// Branch the rule is scoped to; `None` applies on every branch.
    pub branch: Option<String>,
    /// Path pattern the rule guards, in gitignore syntax.
    pub pattern: String,
    /// Access level the rule grants or withdraws.
    pub mode: AccessMode,
    /// Whether a match grants or withdraws access.
    pub verdict: Verdict,
}

impl AclRule {
    /// Creates an allow rule for `principal` on `pattern`.
    #[must_use]
    pub fn allow(principal: PrincipalSelector, pattern: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            principal,
            branch: None,
            pattern: pattern.into(),
            mode,
            verdict: Verdict::Allow,
        }
    }

    /// Creates a deny rule for `principal` on `pattern`.
    #[must_use]
    pub fn deny(principal: PrincipalSelector, pattern: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            principal,
            branch: None,
            pattern: pattern.into(),
            mode,
            verdict: Verdict::Deny,
        }
    }

    /// Scopes the rule to a single branch.
    #[must_use]
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Ordered ACL specification for one repository.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AclSpec {
    rules: Vec<AclRule>,
}

impl AclSpec {
    /// Builds a specification from rules in evaluation order.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = AclRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[AclRule] {
        &self.rules
    }

    /// Reports whether the specification holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// An ACL with every path pattern compiled, ready for evaluation.
///
/// Rules are walked in order and the last matching rule wins; when nothing
/// matches the answer is deny.
#[derive(Clone, Debug)]
pub struct PathAcl {
    rules: Vec<CompiledAclRule>,
}

impl PathAcl {
    /// Compiles every rule pattern, failing on the first invalid one.
    pub fn compile(spec: &AclSpec) -> Result<Self, AccessError> {
        let rules = spec
            .rules
            .iter()
            .map(|rule| {
                Ok(CompiledAclRule {
                    principal: rule.principal.clone(),
                    branch: rule.branch.clone(),
                    glob: PathGlob::compile(&rule.pattern)?,
                    mode: rule.mode,
                    verdict: rule.verdict,
                })
            })
            .collect::<Result<Vec<_>, AccessError>>()?;
        Ok(Self { rules })
    }

    /// Decides `mode` access for `user` on `path` at `branch`.
    ///
    /// `None` is the anonymous user, which never matches a principal
    /// selector. `teams` is the resolved membership map for the owning
    /// organization.
    #[must_use]
    pub fn permits(
        &self,
        user: Option<&str>,
        teams: &TeamMap,
        branch: &str,
        path: &str,
        mode: AccessMode,
    ) -> bool {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut verdict = None;
        for rule in &self.rules {
            if rule.applies_to(user, teams)
                && rule.covers_branch(branch)
                && rule.covers_mode(mode)
                && rule.matches_path(&segments)
            {
                verdict = Some(rule.verdict);
            }
        }
        matches!(verdict, Some(Verdict::Allow))
    }
}

#[derive(Clone, Debug)]
struct CompiledAclRule {
    principal: PrincipalSelector,
    branch: Option<String>,
    glob: PathGlob,
    mode: AccessMode,
    verdict: Verdict,
}

impl CompiledAclRule {
    fn applies_to(&self, user: Option<&str>, teams: &TeamMap) -> bool {
        let Some(user) = user else {
            return false;
        };
        match &self.principal {
            PrincipalSelector::User(name) => name == user,
            PrincipalSelector::Team(team) => teams
                .get(team)
                .is_some_and(|members| members.iter().any(|member| member == user)),
        }
    }

    fn covers_branch(&self, branch: &str) -> bool {
        self.branch
            .as_deref()
            .map_or(true, |scoped| scoped == branch)
    }

    fn covers_mode(&self, requested: AccessMode) -> bool {
        match (self.mode, requested) {
            (AccessMode::Write, _) | (AccessMode::Read, AccessMode::Read) => true,
            (AccessMode::Read, AccessMode::Write) => false,
        }
    }

    /// The node type of the requested path is unknown at this layer, so
    /// positions are treated as directories; a rule naming a directory
    /// thereby covers the whole subtree beneath it.
    fn matches_path(&self, segments: &[&str]) -> bool {
        (0..=segments.len())
            .rev()
            .any(|depth| self.glob.matches_segments(&segments[..depth], true))
    }
}
