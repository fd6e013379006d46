use crate::{Action, Subject};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Outcome of [`Dispatcher::authorize`](crate::Dispatcher::authorize).
///
/// A denial is not an error: it is the normal answer of a policy that said
/// no.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// The policy allowed the action.
    Granted,
    /// The policy refused the action.
    Denied(Denial),
}

impl Decision {
    /// Returns true if the action was allowed.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The denial, if the action was refused.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Granted => None,
            Self::Denied(denial) => Some(denial),
        }
    }

    /// Converts into a `Result`, with the denial as the error.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Granted => Ok(()),
            Self::Denied(denial) => Err(denial),
        }
    }
}

/// Human-readable explanation of a refused action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denial {
    message: String,
}

impl Denial {
    /// Denial reading `User <user> cannot <action> <subject>`.
    pub fn new<U: Debug + ?Sized>(user: &U, action: &Action, subject: &Subject<'_>) -> Self {
        Self {
            message: format!("User {user:?} cannot {action} {subject}"),
        }
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Denial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
