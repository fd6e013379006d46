use crate::{Entity, Kind};
use std::any::Any;
use std::fmt::{Debug, Display, Formatter};

/// Object safe view of an [`Entity`] instance.
trait Erased: Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Entity> Erased for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Reference<'a> {
    Entity(Kind, &'a dyn Erased),
    Type(Kind),
    Absent,
}

/// The thing whose accessibility is being checked.
///
/// A subject is either a borrowed [`Entity`] instance or a bare [`Kind`]
/// marker standing for the type itself. It may also be absent, in which case
/// every dispatch fails with [`DispatchError::InvalidSubject`] before any
/// policy is looked up.
///
/// ```rust
/// use pundit::{Entity, Kind, Subject};
///
/// #[derive(Debug)]
/// struct Post;
/// impl Entity for Post {}
///
/// let post = Post;
/// assert_eq!(Subject::from(&post).kind(), Some(Kind::of::<Post>()));
/// assert!(Subject::from(Kind::of::<Post>()).is_type());
/// assert!(Subject::from(None::<&Post>).is_absent());
/// ```
///
/// [`DispatchError::InvalidSubject`]: crate::DispatchError::InvalidSubject
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a>(Reference<'a>);

impl<'a> Subject<'a> {
    /// A subject that refers to nothing.
    pub fn absent() -> Self {
        Self(Reference::Absent)
    }

    /// Kind of the subject, or `None` when it is absent.
    pub fn kind(&self) -> Option<Kind> {
        match self.0 {
            Reference::Entity(kind, _) | Reference::Type(kind) => Some(kind),
            Reference::Absent => None,
        }
    }

    /// Returns true if the subject is a bare type marker.
    pub fn is_type(&self) -> bool {
        matches!(self.0, Reference::Type(_))
    }

    /// Returns true if the subject refers to nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self.0, Reference::Absent)
    }

    /// Borrow the subject as a `T` instance, if it is one.
    pub fn downcast<T: Entity>(&self) -> Option<&'a T> {
        match self.0 {
            Reference::Entity(_, value) => value.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Typed view of the subject for a policy governing `E`. Returns `None`
    /// when the subject is absent or of another kind.
    pub fn target<E: Entity>(&self) -> Option<Target<'a, E>> {
        match self.0 {
            Reference::Entity(..) => self.downcast().map(Target::Entity),
            Reference::Type(kind) if kind.is::<E>() => Some(Target::Type),
            _ => None,
        }
    }
}

impl Default for Subject<'_> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<'a, T: Entity> From<&'a T> for Subject<'a> {
    fn from(value: &'a T) -> Self {
        Self(Reference::Entity(Kind::of::<T>(), value))
    }
}

impl<'a, T: Entity> From<Option<&'a T>> for Subject<'a> {
    fn from(value: Option<&'a T>) -> Self {
        value.map(Subject::from).unwrap_or_default()
    }
}

impl From<Kind> for Subject<'_> {
    fn from(kind: Kind) -> Self {
        Self(Reference::Type(kind))
    }
}

/// Instances render through their [`Debug`] impl, type markers by name.
impl Display for Subject<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Reference::Entity(_, value) => write!(f, "{value:?}"),
            Reference::Type(kind) => write!(f, "{kind}"),
            Reference::Absent => f.write_str("nothing"),
        }
    }
}

/// Subject as seen by the policy governing `E`.
pub enum Target<'a, E> {
    /// A concrete instance.
    Entity(&'a E),
    /// The type itself, no instance.
    Type,
}

impl<'a, E> Target<'a, E> {
    /// The instance, if one was passed.
    pub fn entity(&self) -> Option<&'a E> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Type => None,
        }
    }

    /// Returns true if the check is against the type rather than an instance.
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type)
    }
}

impl<E> Clone for Target<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Target<'_, E> {}

impl<E: Debug> Debug for Target<'_, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity(entity) => f.debug_tuple("Entity").field(entity).finish(),
            Self::Type => f.write_str("Type"),
        }
    }
}
