use crate::{Kind, Policy, Registration, ResolveError, Scope};
use pundit_common::{ConditionalSend, ConditionalSync, SharedCell};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Source of policies that are loaded on first use rather than registered
/// up front.
///
/// A resolver is consulted only when a kind has no registration yet. Closures
/// of the right shape are resolvers too:
///
/// ```rust
/// use pundit::{DenyAll, Entity, Kind, Policies, Registration, ResolveError};
///
/// #[derive(Debug)]
/// struct Post;
/// impl Entity for Post {}
///
/// let resolver = |kind: &Kind| -> Result<Registration<()>, ResolveError> {
///     if kind.is::<Post>() {
///         Ok(Registration::new(DenyAll::<Post>::new()))
///     } else {
///         Err(ResolveError::NotFound(kind.policy()))
///     }
/// };
/// let policies = Policies::<()>::new().with_resolver(resolver);
///
/// assert!(!policies.contains(&Kind::of::<Post>()));
/// assert!(policies.resolve(&Kind::of::<Post>()).is_ok());
/// assert!(policies.contains(&Kind::of::<Post>()));
/// ```
pub trait Resolve<U>: ConditionalSend + ConditionalSync {
    /// Load the policy governing `kind`.
    fn resolve(&self, kind: &Kind) -> Result<Registration<U>, ResolveError>;
}

impl<U, F> Resolve<U> for F
where
    F: Fn(&Kind) -> Result<Registration<U>, ResolveError> + ConditionalSend + ConditionalSync,
{
    fn resolve(&self, kind: &Kind) -> Result<Registration<U>, ResolveError> {
        self(kind)
    }
}

/// Table of policies, one per entity type.
///
/// Built once at startup and handed to a
/// [`Dispatcher`](crate::Dispatcher). Registering a second policy for the
/// same entity type replaces the first.
pub struct Policies<U> {
    registered: HashMap<Kind, Registration<U>>,
    resolver: Option<Box<dyn Resolve<U>>>,
    resolved: SharedCell<HashMap<Kind, Registration<U>>>,
}

impl<U> Policies<U> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            registered: HashMap::new(),
            resolver: None,
            resolved: SharedCell::new(HashMap::new()),
        }
    }

    /// Register the permission checks of `policy`.
    pub fn register<P: Policy<U>>(mut self, policy: P) -> Self {
        self.add(Registration::new(policy));
        self
    }

    /// Register the permission checks and the scope of `policy`.
    pub fn register_scoped<P: Scope<U>>(mut self, policy: P) -> Self {
        self.add(Registration::scoped(policy));
        self
    }

    /// Install `resolver` as the fallback for kinds without a registration.
    pub fn with_resolver<R: Resolve<U> + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Add a prepared registration, replacing any earlier one for the same
    /// entity type.
    pub fn add(&mut self, registration: Registration<U>) {
        let policy = registration.policy().clone();
        if self
            .registered
            .insert(registration.entity(), registration)
            .is_some()
        {
            tracing::warn!(%policy, "Replacing previously registered policy");
        }
    }

    /// Returns true if a policy for `kind` is registered or was already
    /// resolved. Does not consult the resolver.
    pub fn contains(&self, kind: &Kind) -> bool {
        self.registered.contains_key(kind) || self.resolved.read().contains_key(kind)
    }

    /// The policy for `kind`, or `None` if it is not defined.
    pub fn lookup(&self, kind: &Kind) -> Option<Registration<U>> {
        self.resolve(kind).ok()
    }

    /// The policy for `kind`, forcing the resolver when it has not been
    /// loaded yet.
    ///
    /// Successful resolutions are cached. Failures are not, so a policy that
    /// was still loading can be picked up by a later call.
    pub fn resolve(&self, kind: &Kind) -> Result<Registration<U>, ResolveError> {
        if let Some(registration) = self.registered.get(kind) {
            return Ok(registration.clone());
        }

        if let Some(registration) = self.resolved.read().get(kind) {
            return Ok(registration.clone());
        }

        let Some(resolver) = &self.resolver else {
            return Err(ResolveError::NotFound(kind.policy()));
        };

        let registration = resolver.resolve(kind)?;
        if registration.entity() != *kind {
            return Err(ResolveError::Failed {
                policy: kind.policy(),
                reason: format!("resolver produced {}", registration.policy()),
            });
        }

        tracing::debug!(policy = %registration.policy(), "Resolved policy on demand");

        Ok(self
            .resolved
            .write()
            .entry(*kind)
            .or_insert(registration)
            .clone())
    }
}

impl<U> Default for Policies<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Debug for Policies<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policies")
            .field("registered", &self.registered.values().collect::<Vec<_>>())
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DenyAll, Entity, Target};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Post;
    impl Entity for Post {}

    #[derive(Debug)]
    struct Comment;
    impl Entity for Comment {}

    struct Lenient;

    impl Policy<()> for Lenient {
        type Entity = Post;

        fn index(&self, _target: Target<'_, Post>, _user: &()) -> bool {
            true
        }
    }

    #[test]
    fn it_looks_up_registered_policies() {
        let policies = Policies::<()>::new().register(DenyAll::<Post>::new());

        assert!(policies.contains(&Kind::of::<Post>()));
        assert!(policies.lookup(&Kind::of::<Post>()).is_some());
        assert!(policies.lookup(&Kind::of::<Comment>()).is_none());
        assert_eq!(
            policies.resolve(&Kind::of::<Comment>()).unwrap_err(),
            ResolveError::NotFound(Kind::of::<Comment>().policy())
        );
    }

    #[test]
    fn it_replaces_earlier_registration() {
        let policies = Policies::<()>::new()
            .register(DenyAll::<Post>::new())
            .register(Lenient);

        let registration = policies.lookup(&Kind::of::<Post>()).unwrap();
        assert_eq!(
            registration.check(&crate::Action::Index, &Kind::of::<Post>().into(), &()),
            Some(true)
        );
    }

    #[test]
    fn it_caches_successful_resolutions() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let resolver = move |_kind: &Kind| -> Result<Registration<()>, ResolveError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Registration::new(DenyAll::<Post>::new()))
        };
        let policies = Policies::<()>::new().with_resolver(resolver);

        assert!(!policies.contains(&Kind::of::<Post>()));
        assert!(policies.resolve(&Kind::of::<Post>()).is_ok());
        assert!(policies.resolve(&Kind::of::<Post>()).is_ok());
        assert!(policies.contains(&Kind::of::<Post>()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn it_retries_failed_resolutions() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let resolver = move |kind: &Kind| -> Result<Registration<()>, ResolveError> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ResolveError::Failed {
                    policy: kind.policy(),
                    reason: "still loading".into(),
                })
            } else {
                Ok(Registration::new(DenyAll::<Post>::new()))
            }
        };
        let policies = Policies::<()>::new().with_resolver(resolver);

        assert!(policies.resolve(&Kind::of::<Post>()).is_err());
        assert!(policies.resolve(&Kind::of::<Post>()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn it_rejects_resolutions_for_another_kind() {
        let resolver = |_kind: &Kind| -> Result<Registration<()>, ResolveError> {
            Ok(Registration::new(DenyAll::<Post>::new()))
        };
        let policies = Policies::<()>::new().with_resolver(resolver);

        let error = policies.resolve(&Kind::of::<Comment>()).unwrap_err();
        assert_eq!(
            error,
            ResolveError::Failed {
                policy: Kind::of::<Comment>().policy(),
                reason: "resolver produced Post::Policy".into(),
            }
        );
        assert!(!policies.contains(&Kind::of::<Comment>()));
    }
}
