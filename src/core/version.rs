use super::error::VersionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Minimum number of numeric components emitted by `Display`.
const CANONICAL_COMPONENTS: usize = 3;

/// A parsed application version: numeric components plus optional build metadata.
///
/// Ordering, equality and hashing only look at the numeric components, with
/// missing trailing components read as `0`. `1.0` and `1.0.0+42` are the same
/// key.
#[derive(Debug, Clone)]
pub struct VersionValue {
    components: Vec<u64>,
    build: Option<String>,
}

impl VersionValue {
    /// Parses `X.Y.Z` or `X.Y.Z+BUILD`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let (numeric, build) = match input.split_once('+') {
            Some((numeric, build)) => {
                if build.is_empty() {
                    return Err(VersionError::invalid(input, "empty build metadata"));
                }
                (numeric, Some(build.to_string()))
            }
            None => (input, None),
        };

        if numeric.is_empty() {
            return Err(VersionError::invalid(input, "missing numeric version"));
        }

        let mut components = Vec::new();
        for part in numeric.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::invalid(
                    input,
                    format!("component '{}' is not a non-negative integer", part),
                ));
            }
            let value = part.parse::<u64>().map_err(|err| {
                VersionError::invalid(input, format!("component '{}': {}", part, err))
            })?;
            components.push(value);
        }

        Ok(Self { components, build })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    pub fn patch(&self) -> u64 {
        self.component(2)
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }

    /// Components with trailing zeros removed, so `1.0` and `1.0.0` agree.
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |idx| idx + 1);
        &self.components[..len]
    }
}

impl Ord for VersionValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for idx in 0..len {
            match self.component(idx).cmp(&other.component(idx)) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VersionValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionValue {}

impl Hash for VersionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for VersionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.components.len().max(CANONICAL_COMPONENTS);
        for idx in 0..len {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", self.component(idx))?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for VersionValue {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for VersionValue {
    type Error = VersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for VersionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
