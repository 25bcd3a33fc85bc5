use thiserror::Error;

/// Boxed cause returned by a failing evolution.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format '{input}': {reason}")]
    InvalidVersionFormat { input: String, reason: String },
}

impl VersionError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidVersionFormat { input, .. } => input,
        }
    }
}

#[derive(Error, Debug)]
pub enum MoonStoneError {
    #[error(transparent)]
    InvalidVersionFormat(#[from] VersionError),

    #[error("Could not parse current application version: {0}")]
    CouldNotParseCurrentVersion(#[source] VersionError),

    #[error("Evolution for version {version} failed: {source}")]
    EvolutionBasedOnVersionFailed {
        #[source]
        source: BoxError,
        version: String,
    },

    #[error("Evolution based on predicate '{}' failed: {source}", .description.as_deref().unwrap_or("<no description>"))]
    EvolutionBasedOnPredicateFailed {
        #[source]
        source: BoxError,
        description: Option<String>,
    },

    #[error("Stored version under '{key}' is unreadable: {source}")]
    InvalidStoredVersion {
        key: String,
        #[source]
        source: VersionError,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MoonStoneError {
    /// The version string attached to a failed version-keyed evolution.
    pub fn failed_version(&self) -> Option<&str> {
        match self {
            Self::EvolutionBasedOnVersionFailed { version, .. } => Some(version),
            _ => None,
        }
    }

    /// The description attached to a failed predicate-keyed evolution.
    pub fn failed_description(&self) -> Option<&str> {
        match self {
            Self::EvolutionBasedOnPredicateFailed { description, .. } => description.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MoonStoneError>;

impl<T> From<std::sync::PoisonError<T>> for MoonStoneError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<std::io::Error> for MoonStoneError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_failure_without_description() {
        let err = MoonStoneError::EvolutionBasedOnPredicateFailed {
            source: "disk full".into(),
            description: None,
        };
        assert_eq!(
            err.to_string(),
            "Evolution based on predicate '<no description>' failed: disk full"
        );
        assert_eq!(err.failed_description(), None);
        assert_eq!(err.failed_version(), None);
    }

    #[test]
    fn test_version_failure_keeps_source() {
        let err = MoonStoneError::EvolutionBasedOnVersionFailed {
            source: "boom".into(),
            version: "1.2.0".to_string(),
        };
        assert_eq!(err.failed_version(), Some("1.2.0"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn test_registration_error_is_transparent() {
        let err: MoonStoneError = VersionError::invalid("x", "not a number").into();
        assert_eq!(err.to_string(), "Invalid version format 'x': not a number");
    }
}
