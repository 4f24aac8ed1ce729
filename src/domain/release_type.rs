use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Release type keyword selecting which version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Premajor,
    Minor,
    Preminor,
    Patch,
    Prepatch,
    Prerelease,
}

impl ReleaseType {
    /// All accepted keywords, in the order they are listed to users
    pub const ALL: [ReleaseType; 7] = [
        ReleaseType::Major,
        ReleaseType::Premajor,
        ReleaseType::Minor,
        ReleaseType::Preminor,
        ReleaseType::Patch,
        ReleaseType::Prepatch,
        ReleaseType::Prerelease,
    ];

    /// Get the keyword as a string
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Premajor => "premajor",
            ReleaseType::Minor => "minor",
            ReleaseType::Preminor => "preminor",
            ReleaseType::Patch => "patch",
            ReleaseType::Prepatch => "prepatch",
            ReleaseType::Prerelease => "prerelease",
        }
    }

    /// Whether the resulting version carries a pre-release suffix
    pub fn is_prerelease(&self) -> bool {
        matches!(
            self,
            ReleaseType::Premajor
                | ReleaseType::Preminor
                | ReleaseType::Prepatch
                | ReleaseType::Prerelease
        )
    }

    /// Comma-separated list of accepted keywords, for error and help text
    pub fn keywords() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ReleaseType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                ReleaseError::invalid_argument(format!(
                    "unknown release type '{}' (expected one of: {})",
                    s,
                    Self::keywords()
                ))
            })
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_keyword() {
        for release_type in ReleaseType::ALL {
            let parsed: ReleaseType = release_type.name().parse().unwrap();
            assert_eq!(parsed, release_type);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Major".parse::<ReleaseType>().is_err());
        assert!("PATCH".parse::<ReleaseType>().is_err());
    }

    #[test]
    fn test_parse_unknown_keyword() {
        let err = "hotfix".parse::<ReleaseType>().unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidArgument(_)));
        let msg = err.to_string();
        assert!(msg.contains("hotfix"));
        assert!(msg.contains("prerelease"));
    }

    #[test]
    fn test_parse_empty_keyword() {
        assert!("".parse::<ReleaseType>().is_err());
    }

    #[test]
    fn test_is_prerelease() {
        assert!(!ReleaseType::Major.is_prerelease());
        assert!(!ReleaseType::Patch.is_prerelease());
        assert!(ReleaseType::Preminor.is_prerelease());
        assert!(ReleaseType::Prerelease.is_prerelease());
    }

    #[test]
    fn test_display() {
        assert_eq!(ReleaseType::Prepatch.to_string(), "prepatch");
    }
}
