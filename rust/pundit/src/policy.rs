use crate::{Entity, Target};
use pundit_common::{ConditionalSend, ConditionalSync};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Permission checks for one [`Entity`] type, acting for users of type `U`.
///
/// Every operation defaults to `false`, so a policy starts out denying
/// everything and only overrides what it allows. Each operation receives the
/// subject as a [`Target`]: either the instance being checked or the bare
/// type when no instance exists yet (e.g. `create` on a listing page).
///
/// ```rust
/// use pundit::{Entity, Policy, Target};
///
/// #[derive(Debug)]
/// struct Post {
///     author: u64,
///     published: bool,
/// }
///
/// impl Entity for Post {}
///
/// struct PostPolicy;
///
/// impl Policy<u64> for PostPolicy {
///     type Entity = Post;
///
///     fn show(&self, post: Target<'_, Post>, _user: &u64) -> bool {
///         post.entity().is_none_or(|post| post.published)
///     }
///
///     fn edit(&self, post: Target<'_, Post>, user: &u64) -> bool {
///         post.entity().is_some_and(|post| post.author == *user)
///     }
/// }
///
/// let draft = Post { author: 1, published: false };
/// assert!(PostPolicy.edit(Target::Entity(&draft), &1));
/// assert!(!PostPolicy.show(Target::Entity(&draft), &2));
/// assert!(!PostPolicy.delete(Target::Entity(&draft), &1));
/// ```
pub trait Policy<U>: ConditionalSend + ConditionalSync + 'static {
    /// The entity type this policy governs.
    type Entity: Entity;

    /// Whether `user` may list entities.
    fn index(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may view the entity.
    fn show(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may persist a new entity.
    fn create(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may prepare a new entity.
    #[allow(clippy::new_ret_no_self, clippy::wrong_self_convention)]
    fn new(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may persist changes to the entity.
    fn update(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may prepare changes to the entity.
    fn edit(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Whether `user` may remove the entity.
    fn delete(&self, _target: Target<'_, Self::Entity>, _user: &U) -> bool {
        false
    }

    /// Answers an application defined action. `None` means the policy does
    /// not define `action`, which the dispatcher reports as not defined
    /// rather than as a denial.
    fn check(&self, _action: &str, _target: Target<'_, Self::Entity>, _user: &U) -> Option<bool> {
        None
    }
}

/// Policy that overrides nothing and therefore denies every action.
pub struct DenyAll<E>(PhantomData<fn() -> E>);

impl<E> DenyAll<E> {
    /// Deny-all policy for `E`.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for DenyAll<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for DenyAll<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Entity> Debug for DenyAll<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DenyAll<{}>", E::name())
    }
}

impl<E: Entity, U> Policy<U> for DenyAll<E> {
    type Entity = E;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    #[derive(Debug)]
    struct Note;
    impl Entity for Note {}

    struct Owner;

    struct NotePolicy;

    impl Policy<Owner> for NotePolicy {
        type Entity = Note;

        fn update(&self, _target: Target<'_, Note>, _user: &Owner) -> bool {
            true
        }
    }

    fn outcomes<P: Policy<Owner, Entity = Note>>(policy: &P, target: Target<'_, Note>) -> Vec<bool> {
        Action::STANDARD
            .iter()
            .map(|action| match action {
                Action::Index => policy.index(target, &Owner),
                Action::Show => policy.show(target, &Owner),
                Action::Create => policy.create(target, &Owner),
                Action::New => policy.new(target, &Owner),
                Action::Update => policy.update(target, &Owner),
                Action::Edit => policy.edit(target, &Owner),
                Action::Delete => policy.delete(target, &Owner),
                Action::Custom(_) => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn it_denies_everything_by_default() {
        let policy = DenyAll::<Note>::new();
        assert_eq!(outcomes(&policy, Target::Entity(&Note)), vec![false; 7]);
        assert_eq!(outcomes(&policy, Target::Type), vec![false; 7]);
        assert_eq!(
            Policy::<Owner>::check(&policy, "archive", Target::Type, &Owner),
            None
        );
    }

    #[test]
    fn it_keeps_defaults_for_operations_not_overridden() {
        assert_eq!(
            outcomes(&NotePolicy, Target::Entity(&Note)),
            vec![false, false, false, false, true, false, false]
        );
    }

    #[test]
    fn it_formats_deny_all_with_entity_name() {
        assert_eq!(format!("{:?}", DenyAll::<Note>::new()), "DenyAll<Note>");
    }
}
