//! Target platform of a scaffolded project.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A platform with its own subtree in the template repository.
///
/// The set is closed: the template repository only ships `arch/ios`,
/// `arch/flutter` and `arch/android`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Flutter,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Self::Ios, Self::Flutter, Self::Android];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Flutter => "flutter",
            Self::Android => "android",
        }
    }

    /// Subtree of the template repository holding this platform's files.
    pub fn template_dir(self) -> PathBuf {
        PathBuf::from("arch").join(self.as_str())
    }

    /// File name of the generated editor rule, e.g. `ios4dev.mdc`.
    pub fn rule_file_name(self) -> String {
        format!("{}4dev.mdc", self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    /// Matching is exact: `IOS` is rejected just like the command line does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_platforms() {
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("flutter".parse::<Platform>().unwrap(), Platform::Flutter);
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
    }

    #[test]
    fn rejects_unknown_and_wrong_case() {
        assert!(matches!(
            "web".parse::<Platform>(),
            Err(DomainError::UnknownPlatform(p)) if p == "web"
        ));
        assert!("IOS".parse::<Platform>().is_err());
    }

    #[test]
    fn template_dir_is_under_arch() {
        assert_eq!(
            Platform::Flutter.template_dir(),
            PathBuf::from("arch").join("flutter")
        );
    }

    #[test]
    fn rule_file_names() {
        assert_eq!(Platform::Ios.rule_file_name(), "ios4dev.mdc");
        assert_eq!(Platform::Android.rule_file_name(), "android4dev.mdc");
    }
}
