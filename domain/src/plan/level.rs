//! Enablement levels
//!
//! Every plan node carries a level. Before a build starts, each level in the
//! tree is checked against the known set; while running, a node is executed
//! only if its level is admitted by the active set.
//!
//! | Level | Admitted when |
//! |-------|---------------|
//! | `always` | always |
//! | `never` | never |
//! | named (e.g. `verbose`) | the name is in the active set |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnablementLevel {
    #[default]
    Always,
    Never,
    Named(String),
}

impl EnablementLevel {
    pub fn named(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            EnablementLevel::Always => "always",
            EnablementLevel::Never => "never",
            EnablementLevel::Named(name) => name,
        }
    }
}

impl From<String> for EnablementLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "always" => EnablementLevel::Always,
            "never" => EnablementLevel::Never,
            _ => EnablementLevel::Named(value.trim().to_string()),
        }
    }
}

impl From<EnablementLevel> for String {
    fn from(level: EnablementLevel) -> Self {
        level.as_str().to_string()
    }
}

impl FromStr for EnablementLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::UnsupportedEnablementLevel(s.to_string()));
        }
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for EnablementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The levels a build knows about and the subset that is switched on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelSet {
    known: BTreeSet<String>,
    active: BTreeSet<String>,
}

impl LevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named level; it stays inactive until [`activate`](Self::activate)
    pub fn with_known(mut self, name: impl Into<String>) -> Self {
        self.known.insert(name.into());
        self
    }

    /// Register and switch on a named level
    pub fn activate(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.known.insert(name.clone());
        self.active.insert(name);
        self
    }

    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn active(&self) -> &BTreeSet<String> {
        &self.active
    }

    /// Whether a node at `level` should run
    ///
    /// Unknown named levels are never admitted; [`validate`](Self::validate)
    /// rejects them before a build starts.
    pub fn admits(&self, level: &EnablementLevel) -> bool {
        match level {
            EnablementLevel::Always => true,
            EnablementLevel::Never => false,
            EnablementLevel::Named(name) => self.active.contains(name),
        }
    }

    pub fn validate(&self, level: &EnablementLevel) -> Result<(), DomainError> {
        match level {
            EnablementLevel::Named(name) if !self.known.contains(name) => {
                Err(DomainError::UnsupportedEnablementLevel(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("always".parse::<EnablementLevel>().unwrap(), EnablementLevel::Always);
        assert_eq!("NEVER".parse::<EnablementLevel>().unwrap(), EnablementLevel::Never);
        assert_eq!(
            "verbose".parse::<EnablementLevel>().unwrap(),
            EnablementLevel::Named("verbose".to_string())
        );
        assert!("  ".parse::<EnablementLevel>().is_err());
    }

    #[test]
    fn test_always_and_never_ignore_active_set() {
        let empty = LevelSet::new();
        let busy = LevelSet::new().activate("verbose").activate("docs");
        for levels in [&empty, &busy] {
            assert!(levels.admits(&EnablementLevel::Always));
            assert!(!levels.admits(&EnablementLevel::Never));
        }
    }

    #[test]
    fn test_named_levels() {
        let levels = LevelSet::new().with_known("docs").activate("verbose");
        assert!(levels.admits(&EnablementLevel::named("verbose")));
        assert!(!levels.admits(&EnablementLevel::named("docs")));
        assert!(!levels.admits(&EnablementLevel::named("unknown")));

        assert!(levels.validate(&EnablementLevel::named("docs")).is_ok());
        assert_eq!(
            levels.validate(&EnablementLevel::named("unknown")),
            Err(DomainError::UnsupportedEnablementLevel("unknown".to_string()))
        );
        assert!(levels.validate(&EnablementLevel::Never).is_ok());
    }
}
