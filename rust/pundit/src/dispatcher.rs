use crate::{
    Action, AuthorizeError, Decision, Denial, DispatchError, Kind, Policies, Query, Registration,
    Source, Subject,
};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Entry point for authorization checks.
///
/// A dispatcher finds the policy registered for the subject's entity type
/// and asks it. It never caches answers and never catches panics raised by
/// policy code. Clones share the same [`Policies`].
pub struct Dispatcher<U> {
    policies: Arc<Policies<U>>,
}

impl<U> Dispatcher<U> {
    /// Dispatcher over `policies`.
    pub fn new(policies: Policies<U>) -> Self {
        Self {
            policies: Arc::new(policies),
        }
    }

    /// The policy table this dispatcher consults.
    pub fn policies(&self) -> &Policies<U> {
        &self.policies
    }

    /// Asks the policy of `subject` whether `user` may perform `action`.
    ///
    /// Fails with [`DispatchError::InvalidSubject`] when the subject is
    /// absent, and with [`DispatchError::NotDefined`] when no policy governs
    /// its type or the policy does not define `action`. A `false` answer is
    /// not an error.
    pub fn can<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
        action: impl Into<Action>,
    ) -> Result<bool, DispatchError> {
        self.check(&subject.into(), user, &action.into())
    }

    /// Whether `user` may list entities of the subject's type.
    pub fn can_index<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Index)
    }

    /// Whether `user` may view the subject.
    pub fn can_show<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Show)
    }

    /// Whether `user` may persist a new entity.
    pub fn can_create<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Create)
    }

    /// Whether `user` may prepare a new entity.
    pub fn can_new<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::New)
    }

    /// Whether `user` may persist changes to the subject.
    pub fn can_update<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Update)
    }

    /// Whether `user` may prepare changes to the subject.
    pub fn can_edit<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Edit)
    }

    /// Whether `user` may remove the subject.
    pub fn can_delete<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
    ) -> Result<bool, DispatchError> {
        self.can(subject, user, Action::Delete)
    }

    /// Restricts `source` to what `user` may see, using the scope of the
    /// policy governing the source's entity type.
    ///
    /// The policy output is returned unchanged. Fails with
    /// [`DispatchError::NotDefined`] when there is no such policy, or it has no
    /// scope taking `Q` and producing `O`.
    pub fn scope<Q: Query, O: 'static>(
        &self,
        source: Source<Q>,
        user: &U,
    ) -> Result<O, DispatchError> {
        let kind = source.kind();
        let registration = self.registration(&kind, "scope")?;

        tracing::trace!(policy = %registration.policy(), "Dispatching scope");

        registration
            .scope(source, user)
            .ok_or_else(|| not_defined(&kind, "scope"))
    }

    fn check(&self, subject: &Subject<'_>, user: &U, action: &Action) -> Result<bool, DispatchError> {
        let kind = subject.kind().ok_or(DispatchError::InvalidSubject)?;
        let registration = self.registration(&kind, action.as_str())?;

        tracing::trace!(policy = %registration.policy(), %action, "Dispatching check");

        registration
            .check(action, subject, user)
            .ok_or_else(|| not_defined(&kind, action.as_str()))
    }

    fn registration(&self, kind: &Kind, operation: &str) -> Result<Registration<U>, DispatchError> {
        self.policies.resolve(kind).map_err(|error| {
            tracing::debug!(%error, operation, "Unable to resolve policy");
            not_defined(kind, operation)
        })
    }
}

impl<U: Debug> Dispatcher<U> {
    /// Like [`Dispatcher::can`], but a refusal comes back as a
    /// [`Decision::Denied`] carrying the message
    /// `User <user> cannot <action> <subject>`.
    pub fn authorize<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
        action: impl Into<Action>,
    ) -> Result<Decision, DispatchError> {
        let subject = subject.into();
        let action = action.into();

        Ok(if self.check(&subject, user, &action)? {
            Decision::Granted
        } else {
            Decision::Denied(Denial::new(user, &action, &subject))
        })
    }

    /// Like [`Dispatcher::authorize`], but a refusal is an
    /// [`AuthorizeError::NotAuthorized`] error.
    pub fn enforce<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        user: &U,
        action: impl Into<Action>,
    ) -> Result<(), AuthorizeError> {
        self.authorize(subject, user, action)?
            .into_result()
            .map_err(AuthorizeError::NotAuthorized)
    }
}

fn not_defined(kind: &Kind, operation: &str) -> DispatchError {
    tracing::debug!(policy = %kind.policy(), operation, "Policy operation not defined");

    DispatchError::NotDefined {
        policy: kind.policy(),
        operation: operation.to_owned(),
    }
}

impl<U> Clone for Dispatcher<U> {
    fn clone(&self) -> Self {
        Self {
            policies: self.policies.clone(),
        }
    }
}

impl<U> From<Policies<U>> for Dispatcher<U> {
    fn from(policies: Policies<U>) -> Self {
        Self::new(policies)
    }
}

impl<U> Debug for Dispatcher<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policies", &self.policies)
            .finish()
    }
}
