use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic interface version for a node type or runner.
///
/// Unlike a crate version, this tracks only the shape of the input/output
/// contract: a major bump means existing workflows referencing this node
/// must be migrated; a minor bump is backward compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InterfaceVersion {
    major: u32,
    minor: u32,
}

impl InterfaceVersion {
    /// Create a new interface version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }

    /// Returns `true` if a caller requiring `self` can be satisfied by `other`.
    ///
    /// Compatible means same major version and `other.minor >= self.minor`
    /// (newer minor versions only add optional fields).
    #[must_use]
    pub const fn is_compatible_with(self, other: &Self) -> bool {
        self.major == other.major && other.minor >= self.minor
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_same_major_higher_minor() {
        let required = InterfaceVersion::new(1, 0);
        let provided = InterfaceVersion::new(1, 2);
        assert!(required.is_compatible_with(&provided));
    }

    #[test]
    fn incompatibility_lower_minor() {
        let required = InterfaceVersion::new(1, 2);
        let provided = InterfaceVersion::new(1, 0);
        assert!(!required.is_compatible_with(&provided));
    }

    #[test]
    fn incompatibility_different_major() {
        let required = InterfaceVersion::new(1, 0);
        let provided = InterfaceVersion::new(2, 0);
        assert!(!required.is_compatible_with(&provided));
    }

    #[test]
    fn display_format() {
        assert_eq!(InterfaceVersion::new(3, 7).to_string(), "3.7");
    }
}
