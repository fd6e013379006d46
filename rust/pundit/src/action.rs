use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Named permission check.
///
/// The seven standard actions map onto the operations of
/// [`Policy`](crate::Policy). Any other name is a [`Action::Custom`] action
/// which a policy may answer through [`Policy::check`](crate::Policy::check).
///
/// Standard actions display with a trailing `?` (`show?`), custom ones
/// display verbatim. Parsing accepts standard names with or without the `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// List entities.
    Index,
    /// View a single entity.
    Show,
    /// Persist a new entity.
    Create,
    /// Prepare a new entity.
    New,
    /// Persist changes to an entity.
    Update,
    /// Prepare changes to an entity.
    Edit,
    /// Remove an entity.
    Delete,
    /// Application defined action. Build it with [`Action::custom`], which
    /// maps standard names to their own variant.
    Custom(Cow<'static, str>),
}

impl Action {
    /// The standard actions in canonical order.
    pub const STANDARD: [Action; 7] = [
        Action::Index,
        Action::Show,
        Action::Create,
        Action::New,
        Action::Update,
        Action::Edit,
        Action::Delete,
    ];

    /// Action with the given name. Standard names (`show`, `show?`, ...)
    /// yield the standard variant, anything else a [`Action::Custom`].
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        match name.parse() {
            Ok(Self::Custom(_)) => Self::Custom(name),
            Ok(action) => action,
            Err(never) => match never {},
        }
    }

    /// Returns true for the seven standard actions.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Display form of the action, e.g. `edit?`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Index => "index?",
            Self::Show => "show?",
            Self::Create => "create?",
            Self::New => "new?",
            Self::Update => "update?",
            Self::Edit => "edit?",
            Self::Delete => "delete?",
            Self::Custom(name) => &**name,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name.strip_suffix('?').unwrap_or(name) {
            "index" => Self::Index,
            "show" => Self::Show,
            "create" => Self::Create,
            "new" => Self::New,
            "update" => Self::Update,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            _ => Self::Custom(Cow::Owned(name.to_owned())),
        })
    }
}

impl From<&'static str> for Action {
    fn from(name: &'static str) -> Self {
        Self::custom(name)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        match name.parse() {
            Ok(action) => Ok(action),
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_names_with_and_without_question_mark() {
        assert_eq!("edit?".parse::<Action>().unwrap(), Action::Edit);
        assert_eq!("edit".parse::<Action>().unwrap(), Action::Edit);
        assert_eq!(
            "publish".parse::<Action>().unwrap(),
            Action::custom("publish")
        );
    }

    #[test]
    fn it_displays_standard_actions_as_predicates() {
        let names: Vec<String> = Action::STANDARD.iter().map(Action::to_string).collect();
        assert_eq!(
            names,
            ["index?", "show?", "create?", "new?", "update?", "edit?", "delete?"]
        );
        assert_eq!(Action::custom("publish").to_string(), "publish");
    }

    #[test]
    fn it_maps_standard_names_given_as_custom() {
        assert_eq!(Action::custom("show?"), Action::Show);
        assert_eq!(Action::custom(String::from("delete")), Action::Delete);
        assert_eq!(Action::custom("show!").to_string(), "show!");
        assert!(!Action::custom("show!").is_standard());
    }

    #[test]
    fn it_converts_static_strings() {
        assert_eq!(Action::from("show?"), Action::Show);
        assert!(!Action::from("archive").is_standard());
    }

    #[test]
    fn it_serializes_as_display_form() {
        assert_eq!(serde_json::to_string(&Action::Delete).unwrap(), "\"delete?\"");
        let action: Action = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(action, Action::Update);
    }
}
