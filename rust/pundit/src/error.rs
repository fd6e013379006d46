use crate::{Denial, PolicyId};

/// Errors that prevent a policy from being consulted at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The subject is neither an entity instance nor a type marker.
    #[error("Invalid argument: first parameter must be a type marker or an entity")]
    InvalidSubject,

    /// No policy is defined for the subject, or it does not export the
    /// requested operation.
    #[error("Policy not defined: {policy} does not define '{operation}'")]
    NotDefined {
        /// Identifier of the policy that was looked up.
        policy: PolicyId,
        /// The operation sought (an action name or `scope`).
        operation: String,
    },
}

/// Errors returned by [`Dispatcher::enforce`](crate::Dispatcher::enforce).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizeError {
    /// The policy could not be consulted.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The policy was consulted and denied the action.
    #[error("{0}")]
    NotAuthorized(Denial),
}

/// Error a [`Resolve`](crate::Resolve) implementation reports when it cannot
/// produce a policy on demand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The resolver knows of no policy for the requested kind.
    #[error("Policy not found: {0}")]
    NotFound(PolicyId),

    /// The policy exists but could not be loaded.
    #[error("Failed to load {policy}: {reason}")]
    Failed {
        /// Identifier of the policy being loaded.
        policy: PolicyId,
        /// Description of the failure.
        reason: String,
    },
}
