//! Access-control decision point.

use super::types::{AuthorizationRequirement, DenialReason};

/// Collects the outcome of evaluating a request's requirements.
///
/// Every requirement starts pending. Handlers mark it with [`succeed`] or
/// record a failure with [`fail`]; any failure makes the whole request fail,
/// and so does a requirement left pending.
///
/// [`succeed`]: AuthorizationContext::succeed
/// [`fail`]: AuthorizationContext::fail
#[derive(Debug, Default)]
pub struct AuthorizationContext {
    pending: Vec<AuthorizationRequirement>,
    failures: Vec<DenialReason>,
    succeeded: usize,
}

impl AuthorizationContext {
    pub fn new(requirements: impl IntoIterator<Item = AuthorizationRequirement>) -> Self {
        Self {
            pending: requirements.into_iter().collect(),
            failures: Vec::new(),
            succeeded: 0,
        }
    }

    /// Marks `requirement` satisfied.
    pub fn succeed(&mut self, requirement: &AuthorizationRequirement) {
        if let Some(index) = self.pending.iter().position(|r| r == requirement) {
            self.pending.remove(index);
            self.succeeded += 1;
        }
    }

    /// Records an explicit denial.
    pub fn fail(&mut self, reason: DenialReason) {
        self.failures.push(reason);
    }

    pub fn pending(&self) -> &[AuthorizationRequirement] {
        &self.pending
    }

    pub fn failures(&self) -> &[DenialReason] {
        &self.failures
    }

    pub fn has_failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True only if nothing failed, nothing is pending and at least one
    /// requirement was satisfied.
    pub fn is_granted(&self) -> bool {
        self.failures.is_empty() && self.pending.is_empty() && self.succeeded > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(group: &str) -> AuthorizationRequirement {
        AuthorizationRequirement::new(["GroupMember.Read.All"], group)
    }

    #[test]
    fn test_undecided_requirement_does_not_succeed() {
        let context = AuthorizationContext::new([requirement("g1")]);
        assert!(!context.is_granted());
        assert!(!context.has_failed());
    }

    #[test]
    fn test_succeed_clears_pending() {
        let mut context = AuthorizationContext::new([requirement("g1")]);
        context.succeed(&requirement("g1"));
        assert!(context.pending().is_empty());
        assert!(context.is_granted());
    }

    #[test]
    fn test_failure_overrides_success() {
        let mut context = AuthorizationContext::new([requirement("g1"), requirement("g2")]);
        context.succeed(&requirement("g1"));
        context.fail(DenialReason::NotAMember);
        context.succeed(&requirement("g2"));
        assert!(!context.is_granted());
        assert_eq!(context.failures(), &[DenialReason::NotAMember]);
    }

    #[test]
    fn test_succeeding_unknown_requirement_is_ignored() {
        let mut context = AuthorizationContext::new([requirement("g1")]);
        context.succeed(&requirement("other"));
        assert!(!context.is_granted());
    }

    #[test]
    fn test_empty_context_never_succeeds() {
        assert!(!AuthorizationContext::default().is_granted());
    }
}
