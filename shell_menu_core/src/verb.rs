//! Shell verbs: the textual command names the shell dispatches on.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A shell verb, such as `"delete"` or `"properties"`.
///
/// The five verbs the bridge offers convenience calls for have their own variants; anything
/// else is passed through untouched as [`Verb::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    Copy,
    Cut,
    Paste,
    Rename,
    Delete,
    Custom(String),
}

impl Verb {
    /// Parse a verb name. Well-known names map to their variant regardless of case.
    pub fn new(verb: impl Into<String>) -> Result<Self> {
        let verb = verb.into();
        if verb.is_empty() || verb.contains('\0') {
            return Err(Error::InvalidVerb(verb));
        }

        Ok(match verb.to_ascii_lowercase().as_str() {
            "copy" => Verb::Copy,
            "cut" => Verb::Cut,
            "paste" => Verb::Paste,
            "rename" => Verb::Rename,
            "delete" => Verb::Delete,
            _ => Verb::Custom(verb),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verb::Copy => "copy",
            Verb::Cut => "cut",
            Verb::Paste => "paste",
            Verb::Rename => "rename",
            Verb::Delete => "delete",
            Verb::Custom(verb) => verb,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Verb::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_verbs_are_recognised() {
        assert_eq!(Verb::new("delete").unwrap(), Verb::Delete);
        assert_eq!(Verb::new("Copy").unwrap(), Verb::Copy);
        assert_eq!("paste".parse::<Verb>().unwrap(), Verb::Paste);
    }

    #[test]
    fn custom_verbs_pass_through_unchanged() {
        let verb = Verb::new("Properties").unwrap();
        assert_eq!(verb, Verb::Custom("Properties".to_string()));
        assert_eq!(verb.as_str(), "Properties");
    }

    #[test]
    fn empty_and_nul_verbs_are_rejected() {
        assert!(matches!(Verb::new(""), Err(Error::InvalidVerb(_))));
        assert!(matches!(Verb::new("open\0now"), Err(Error::InvalidVerb(_))));
    }
}
