use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Separator placed between an entity name and [`POLICY_SUFFIX`].
pub const POLICY_SEPARATOR: &str = "::";

/// Conventional suffix that turns an entity name into its policy identifier.
pub const POLICY_SUFFIX: &str = "Policy";

/// Application record type that can be the subject of an authorization check.
///
/// Implementing `Entity` is an opt-in: the dispatcher never inspects fields,
/// it only routes the value to the policy registered for its type and renders
/// it with [`Debug`] in denial messages.
///
/// ```rust
/// use pundit::{Entity, Kind};
///
/// #[derive(Debug)]
/// struct Post {
///     title: String,
/// }
///
/// impl Entity for Post {}
///
/// assert_eq!(Kind::of::<Post>().name(), "Post");
/// assert_eq!(Kind::of::<Post>().policy().as_str(), "Post::Policy");
/// ```
pub trait Entity: Any + Debug {
    /// Name of the entity used to derive its policy identifier.
    ///
    /// By default, derives the name from the struct name, without module
    /// path or generic arguments (`Page<Post>` is `Page`). Override this
    /// method to use a custom name.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or(path)
    }
}

/// Bare type marker for an [`Entity`] type.
///
/// A `Kind` stands in for "the type itself" wherever no instance is at hand.
/// Two kinds are equal when they denote the same Rust type; the name is only
/// carried along for identifiers and messages.
#[derive(Clone, Copy)]
pub struct Kind {
    id: TypeId,
    name: &'static str,
}

impl Kind {
    /// Type marker for the entity type `T`.
    pub fn of<T: Entity>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::name(),
        }
    }

    /// Rust type identity of the marked entity.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Entity name, see [`Entity::name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Policy identifier conventionally associated with this kind.
    pub fn policy(&self) -> PolicyId {
        PolicyId::from(*self)
    }

    /// Returns true if this kind marks `T`.
    pub fn is<T: Entity>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Identifier of the policy that governs a [`Kind`], e.g. `Post::Policy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Kind> for PolicyId {
    fn from(kind: Kind) -> Self {
        Self(format!("{}{POLICY_SEPARATOR}{POLICY_SUFFIX}", kind.name()))
    }
}

impl Display for PolicyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PolicyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
