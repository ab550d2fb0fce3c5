//! Magento release versions and the store-scoping compatibility gate.
//!
//! Versions compare component-wise as integers, so `2.10` sorts after `2.2`.
//! Patch suffixes such as `-p3` are accepted and ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// First release whose REST search endpoints accept a `store` filter.
const STORE_FILTER_SINCE: MagentoVersion = MagentoVersion::new(2, 2, 0);

/// A dotted Magento release number, e.g. `2.4.6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MagentoVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid Magento version \"{input}\": expected dotted numbers like 2.4.6")]
pub struct InvalidVersion {
    input: String,
}

impl MagentoVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether store-scoped filters can be sent to this release.
    #[must_use]
    pub fn supports_store_filter(self) -> bool {
        self >= STORE_FILTER_SINCE
    }
}

/// Returns `true` when `version >= 2.2`.
///
/// Every store-scoped endpoint (product search, categories, attributes,
/// configurable children) goes through this one check.
#[must_use]
pub fn supports_store_filter(version: MagentoVersion) -> bool {
    version.supports_store_filter()
}

impl fmt::Display for MagentoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for MagentoVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVersion {
            input: s.to_owned(),
        };

        let mut parts = [0u32; 3];
        for (idx, component) in s.trim().split('.').take(3).enumerate() {
            let digits: String = component
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if digits.is_empty() {
                return Err(invalid());
            }
            parts[idx] = digits.parse().map_err(|_| invalid())?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl Serialize for MagentoVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MagentoVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MagentoVersion {
        s.parse().expect("version should parse")
    }

    #[test]
    fn store_filter_gate_boundaries() {
        assert!(!supports_store_filter(v("2.1")));
        assert!(supports_store_filter(v("2.2")));
        assert!(supports_store_filter(v("2.3")));
        assert!(supports_store_filter(v("3.0")));
    }

    #[test]
    fn store_filter_gate_uses_numeric_ordering() {
        // Lexicographically "2.10" < "2.2"; numerically it is newer.
        assert!(supports_store_filter(v("2.10")));
        assert!(!supports_store_filter(v("2.1.99")));
        assert!(!supports_store_filter(v("1.9")));
    }

    #[test]
    fn parses_full_and_partial_versions() {
        assert_eq!(v("2"), MagentoVersion::new(2, 0, 0));
        assert_eq!(v("2.4"), MagentoVersion::new(2, 4, 0));
        assert_eq!(v("2.4.6"), MagentoVersion::new(2, 4, 6));
        assert_eq!(v(" 2.4.6 "), MagentoVersion::new(2, 4, 6));
    }

    #[test]
    fn ignores_patch_suffix() {
        assert_eq!(v("2.4.6-p3"), MagentoVersion::new(2, 4, 6));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!("latest".parse::<MagentoVersion>().is_err());
        assert!("".parse::<MagentoVersion>().is_err());
        assert!("2.x".parse::<MagentoVersion>().is_err());
    }

    #[test]
    fn display_is_dotted_triplet() {
        assert_eq!(MagentoVersion::new(2, 4, 0).to_string(), "2.4.0");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&MagentoVersion::new(2, 3, 7)).unwrap();
        assert_eq!(json, "\"2.3.7\"");
        let back: MagentoVersion = serde_json::from_str("\"2.2\"").unwrap();
        assert_eq!(back, MagentoVersion::new(2, 2, 0));
    }
}
