use crate::{Entity, Kind, Policy};
use std::fmt::{Debug, Formatter};

/// Query value that knows which entity type it ranges over.
pub trait Query: 'static {
    /// The entity type the query selects from.
    fn origin(&self) -> Kind;
}

/// Input to a scope: a query to refine, or the bare entity type when there is
/// no query yet.
pub enum Source<Q> {
    /// A query whose origin selects the policy.
    Query(Q),
    /// The entity type itself.
    Type(Kind),
}

impl<Q> Source<Q> {
    /// Scope source for the bare entity type `T`.
    pub fn of<T: Entity>() -> Self {
        Self::Type(Kind::of::<T>())
    }

    /// The query, if one was given.
    pub fn query(&self) -> Option<&Q> {
        match self {
            Self::Query(query) => Some(query),
            Self::Type(_) => None,
        }
    }

    /// Consumes the source and returns the query, if one was given.
    pub fn into_query(self) -> Option<Q> {
        match self {
            Self::Query(query) => Some(query),
            Self::Type(_) => None,
        }
    }
}

impl<Q: Query> Source<Q> {
    /// Entity type whose policy scopes this source.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Query(query) => query.origin(),
            Self::Type(kind) => *kind,
        }
    }
}

impl<Q: Clone> Clone for Source<Q> {
    fn clone(&self) -> Self {
        match self {
            Self::Query(query) => Self::Query(query.clone()),
            Self::Type(kind) => Self::Type(*kind),
        }
    }
}

impl<Q: PartialEq> PartialEq for Source<Q> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Query(a), Self::Query(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl<Q: Debug> Debug for Source<Q> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(query) => f.debug_tuple("Query").field(query).finish(),
            Self::Type(kind) => f.debug_tuple("Type").field(kind).finish(),
        }
    }
}

/// Collection filter of a policy.
///
/// Scoping narrows a query down to the entities `user` may see. Unlike the
/// permission checks there is no sensible default, so a policy only takes part
/// in scoping when it implements this trait and is registered with
/// [`Policies::register_scoped`](crate::Policies::register_scoped).
pub trait Scope<U>: Policy<U> {
    /// Query value being refined. Opaque to the dispatcher.
    type Query: Query;

    /// Value produced by the scope, usually a refined `Query`.
    type Output: 'static;

    /// Restrict `source` to what `user` may see.
    fn scope(&self, source: Source<Self::Query>, user: &U) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Post;
    impl Entity for Post {}

    #[derive(Debug, Clone, PartialEq)]
    struct Select {
        from: Kind,
        limit: usize,
    }

    impl Query for Select {
        fn origin(&self) -> Kind {
            self.from
        }
    }

    #[test]
    fn it_resolves_kind_from_query_origin() {
        let source = Source::Query(Select {
            from: Kind::of::<Post>(),
            limit: 10,
        });

        assert_eq!(source.kind(), Kind::of::<Post>());
        assert_eq!(source.query().map(|query| query.limit), Some(10));
    }

    #[test]
    fn it_resolves_kind_from_type_marker() {
        let source = Source::<Select>::of::<Post>();

        assert_eq!(source.kind(), Kind::of::<Post>());
        assert_eq!(source.clone().into_query(), None);
        assert_eq!(source, Source::Type(Kind::of::<Post>()));
    }
}
