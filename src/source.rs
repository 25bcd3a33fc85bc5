//! Version-reader collaborator.

/// Supplies the version string of the running application.
pub trait VersionSource: Send {
    fn current_version_string(&self) -> String;
}

impl<F> VersionSource for F
where
    F: Fn() -> String + Send,
{
    fn current_version_string(&self) -> String {
        self()
    }
}

/// A fixed version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVersion(pub String);

impl StaticVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionSource for StaticVersion {
    fn current_version_string(&self) -> String {
        self.0.clone()
    }
}

/// Package metadata: a short marketing version and a build identifier.
///
/// Reported as `short` when both are equal, otherwise `short+build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub short_version: String,
    pub build: String,
}

impl PackageVersion {
    pub fn new(short_version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            short_version: short_version.into(),
            build: build.into(),
        }
    }
}

impl VersionSource for PackageVersion {
    fn current_version_string(&self) -> String {
        if self.short_version == self.build {
            self.short_version.clone()
        } else {
            format!("{}+{}", self.short_version, self.build)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_version_joins_differing_build() {
        assert_eq!(
            PackageVersion::new("1.4.0", "212").current_version_string(),
            "1.4.0+212"
        );
        assert_eq!(
            PackageVersion::new("1.4.0", "1.4.0").current_version_string(),
            "1.4.0"
        );
    }

    #[test]
    fn test_closure_source() {
        let source = || "3.1.0".to_string();
        assert_eq!(source.current_version_string(), "3.1.0");
        assert_eq!(StaticVersion::new("0.9.0").current_version_string(), "0.9.0");
    }
}
