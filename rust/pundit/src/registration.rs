use crate::{Action, Kind, Policy, PolicyId, Query, Scope, Source, Subject};
use pundit_common::{ConditionalSend, ConditionalSync};
use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Type erased view of a registered policy.
trait Handler<U>: ConditionalSend + ConditionalSync {
    fn entity(&self) -> Kind;

    /// `None` when the subject is not of the governed type or the action is
    /// not defined by the policy.
    fn check(&self, action: &Action, subject: &Subject<'_>, user: &U) -> Option<bool>;

    /// `(Query, Output)` type identities of the scope, if the policy has one.
    fn scope_signature(&self) -> Option<(TypeId, TypeId)>;

    fn scope(&self, source: Box<dyn Any>, user: &U) -> Option<Box<dyn Any>>;
}

fn check<U, P: Policy<U>>(
    policy: &P,
    action: &Action,
    subject: &Subject<'_>,
    user: &U,
) -> Option<bool> {
    let target = subject.target::<P::Entity>()?;
    Some(match action {
        Action::Index => policy.index(target, user),
        Action::Show => policy.show(target, user),
        Action::Create => policy.create(target, user),
        Action::New => policy.new(target, user),
        Action::Update => policy.update(target, user),
        Action::Edit => policy.edit(target, user),
        Action::Delete => policy.delete(target, user),
        Action::Custom(name) => {
            return match name.parse() {
                Ok(Action::Custom(_)) => policy.check(name, target, user),
                Ok(standard) => check(policy, &standard, subject, user),
                Err(never) => match never {},
            };
        }
    })
}

struct Permissions<P>(P);

impl<U, P: Policy<U>> Handler<U> for Permissions<P> {
    fn entity(&self) -> Kind {
        Kind::of::<P::Entity>()
    }

    fn check(&self, action: &Action, subject: &Subject<'_>, user: &U) -> Option<bool> {
        check(&self.0, action, subject, user)
    }

    fn scope_signature(&self) -> Option<(TypeId, TypeId)> {
        None
    }

    fn scope(&self, _source: Box<dyn Any>, _user: &U) -> Option<Box<dyn Any>> {
        None
    }
}

struct Scoped<P>(P);

impl<U, P: Scope<U>> Handler<U> for Scoped<P> {
    fn entity(&self) -> Kind {
        Kind::of::<P::Entity>()
    }

    fn check(&self, action: &Action, subject: &Subject<'_>, user: &U) -> Option<bool> {
        check(&self.0, action, subject, user)
    }

    fn scope_signature(&self) -> Option<(TypeId, TypeId)> {
        Some((TypeId::of::<P::Query>(), TypeId::of::<P::Output>()))
    }

    fn scope(&self, source: Box<dyn Any>, user: &U) -> Option<Box<dyn Any>> {
        let source = source.downcast::<Source<P::Query>>().ok()?;
        Some(Box::new(self.0.scope(*source, user)))
    }
}

/// A policy prepared for the registry.
///
/// Registrations erase the concrete policy type so that policies for
/// different entities can live in one [`Policies`](crate::Policies) table.
/// They are cheap to clone.
pub struct Registration<U> {
    policy: PolicyId,
    handler: Arc<dyn Handler<U>>,
}

impl<U> Registration<U> {
    /// Registration exposing the permission checks of `policy`.
    pub fn new<P: Policy<U>>(policy: P) -> Self {
        Self::from_handler(Arc::new(Permissions(policy)))
    }

    /// Registration exposing both the permission checks and the scope of
    /// `policy`.
    pub fn scoped<P: Scope<U>>(policy: P) -> Self {
        Self::from_handler(Arc::new(Scoped(policy)))
    }

    fn from_handler(handler: Arc<dyn Handler<U>>) -> Self {
        Self {
            policy: handler.entity().policy(),
            handler,
        }
    }

    /// Identifier of the registered policy.
    pub fn policy(&self) -> &PolicyId {
        &self.policy
    }

    /// The entity type the policy governs.
    pub fn entity(&self) -> Kind {
        self.handler.entity()
    }

    /// Returns true if the policy takes part in scoping.
    pub fn is_scoped(&self) -> bool {
        self.handler.scope_signature().is_some()
    }

    pub(crate) fn check(&self, action: &Action, subject: &Subject<'_>, user: &U) -> Option<bool> {
        self.handler.check(action, subject, user)
    }

    /// Runs the scope if the policy has one taking `Q` and producing `O`.
    pub(crate) fn scope<Q: Query, O: 'static>(&self, source: Source<Q>, user: &U) -> Option<O> {
        if self.handler.scope_signature()? != (TypeId::of::<Q>(), TypeId::of::<O>()) {
            return None;
        }

        let output = self.handler.scope(Box::new(source), user)?;
        output.downcast::<O>().ok().map(|output| *output)
    }
}

impl<U> Clone for Registration<U> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<U> Debug for Registration<U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("policy", &self.policy)
            .field("scoped", &self.is_scoped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DenyAll, Entity, Target};

    #[derive(Debug)]
    struct Post;
    impl Entity for Post {}

    #[derive(Debug)]
    struct Comment;
    impl Entity for Comment {}

    #[derive(Debug, PartialEq)]
    struct Posts(Kind);

    impl Query for Posts {
        fn origin(&self) -> Kind {
            self.0
        }
    }

    struct PostPolicy;

    impl Policy<()> for PostPolicy {
        type Entity = Post;

        fn show(&self, _target: Target<'_, Post>, _user: &()) -> bool {
            true
        }

        fn check(&self, action: &str, _target: Target<'_, Post>, _user: &()) -> Option<bool> {
            (action == "publish").then_some(true)
        }
    }

    impl Scope<()> for PostPolicy {
        type Query = Posts;
        type Output = usize;

        fn scope(&self, _source: Source<Posts>, _user: &()) -> usize {
            3
        }
    }

    #[test]
    fn it_derives_identifier_from_entity() {
        let registration = Registration::<()>::new(DenyAll::<Post>::new());

        assert_eq!(registration.policy().as_str(), "Post::Policy");
        assert_eq!(registration.entity(), Kind::of::<Post>());
        assert!(!registration.is_scoped());
    }

    #[test]
    fn it_routes_standard_and_custom_actions() {
        let registration = Registration::new(PostPolicy);
        let subject = Subject::from(&Post);

        assert_eq!(registration.check(&Action::Show, &subject, &()), Some(true));
        assert_eq!(registration.check(&Action::Edit, &subject, &()), Some(false));
        assert_eq!(
            registration.check(&Action::custom("publish"), &subject, &()),
            Some(true)
        );
        assert_eq!(
            registration.check(&Action::custom("archive"), &subject, &()),
            None
        );
    }

    #[test]
    fn it_routes_standard_names_wrapped_as_custom() {
        let registration = Registration::new(PostPolicy);
        let subject = Subject::from(&Post);
        let wrapped = Action::Custom("show?".into());

        assert_eq!(registration.check(&wrapped, &subject, &()), Some(true));
        assert_eq!(
            registration.check(&Action::custom("show?"), &subject, &()),
            Some(true)
        );
    }

    #[test]
    fn it_refuses_subjects_of_other_kinds() {
        let registration = Registration::new(PostPolicy);

        assert_eq!(
            registration.check(&Action::Show, &Subject::from(&Comment), &()),
            None
        );
        assert_eq!(
            registration.check(&Action::Show, &Subject::absent(), &()),
            None
        );
    }

    #[test]
    fn it_scopes_only_with_matching_signature() {
        let registration = Registration::scoped(PostPolicy);
        assert!(registration.is_scoped());

        let output: Option<usize> = registration.scope(Source::<Posts>::of::<Post>(), &());
        assert_eq!(output, Some(3));

        let output: Option<String> = registration.scope(Source::<Posts>::of::<Post>(), &());
        assert_eq!(output, None);

        let unscoped = Registration::new(PostPolicy);
        let output: Option<usize> = unscoped.scope(Source::<Posts>::of::<Post>(), &());
        assert_eq!(output, None);
    }
}
