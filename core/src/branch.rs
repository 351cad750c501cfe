//! Branch identifiers.

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A branch of a tree, identified by its two incident node labels.
///
/// Branches are written as `(child, parent)`, where the child is the node below the branch.
/// The child label doubles as the lookup key when annotating a tree, since in a rooted tree
/// every node except the root sits below exactly one branch.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(try_from = "String")]
pub struct Branch {
    child: String,
    parent: String,
}

impl Branch {
    /// Creates a new branch.
    pub fn new<C, P>(child: C, parent: P) -> Self
    where
        C: Into<String>,
        P: Into<String>,
    {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }

    /// Returns the label of the node below the branch.
    pub fn child(&self) -> &str {
        &self.child
    }

    /// Returns the label of the node above the branch.
    pub fn parent(&self) -> &str {
        &self.parent
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.child, self.parent)
    }
}

impl FromStr for Branch {
    type Err = ParseBranchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| ParseBranchError(String::from(s)))?;

        match inner.split_once(',') {
            Some((child, parent)) if !child.trim().is_empty() && !parent.trim().is_empty() => {
                Ok(Self::new(child.trim(), parent.trim()))
            }
            _ => Err(ParseBranchError(String::from(s))),
        }
    }
}

impl TryFrom<String> for Branch {
    type Error = ParseBranchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

/// An error associated with parsing a branch identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseBranchError(String);

impl fmt::Display for ParseBranchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse '{}' as branch, expected '(child, parent)'",
            self.0
        )
    }
}

impl std::error::Error for ParseBranchError {}
