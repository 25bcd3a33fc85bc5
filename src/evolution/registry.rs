use super::{Evolution, EvolutionPredicate, PredicateEvolution};
use crate::core::{Result, VersionValue};
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds version-keyed and predicate-keyed evolutions.
///
/// Version-keyed evolutions live in an unordered map and are sorted on demand.
/// Predicate-keyed evolutions keep registration order and are never deduplicated.
pub struct EvolutionRegistry {
    by_version: HashMap<VersionValue, Box<dyn Evolution>>,
    by_predicate: Vec<PredicateEvolution>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl EvolutionRegistry {
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(LogDiagnostics))
    }

    pub fn with_diagnostics(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            by_version: HashMap::new(),
            by_predicate: Vec::new(),
            diagnostics,
        }
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Arc<dyn Diagnostics>) {
        self.diagnostics = diagnostics;
    }

    /// Registers an evolution to run when the stored version crosses `version`.
    ///
    /// Registering the same version twice replaces the earlier evolution and
    /// emits a warning.
    pub fn register_by_version<E>(&mut self, version: &str, evolution: E) -> Result<&mut Self>
    where
        E: Evolution + 'static,
    {
        let key = VersionValue::parse(version)?;
        if self.by_version.contains_key(&key) {
            self.diagnostics.warn(&format!(
                "An evolution has already been added for the stage {}. Will be overridden",
                version
            ));
            // `insert` keeps the old key; drop it so the new spelling is reported.
            self.by_version.remove(&key);
        }
        self.by_version.insert(key, Box::new(evolution));
        Ok(self)
    }

    /// Registers an evolution guarded by `predicate`, evaluated on every run.
    pub fn register_by_predicate<P, E>(
        &mut self,
        predicate: P,
        description: Option<&str>,
        evolution: E,
    ) -> &mut Self
    where
        P: EvolutionPredicate + 'static,
        E: Evolution + 'static,
    {
        self.by_predicate.push(PredicateEvolution {
            predicate: Box::new(predicate),
            description: description.map(str::to_string),
            evolution: Box::new(evolution),
        });
        self
    }

    pub fn version_count(&self) -> usize {
        self.by_version.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.by_predicate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_version.is_empty() && self.by_predicate.is_empty()
    }

    /// Registered version keys in ascending order.
    pub fn versions_sorted(&self) -> Vec<VersionValue> {
        let mut versions = self.by_version.keys().cloned().collect::<Vec<_>>();
        versions.sort();
        versions
    }

    /// Predicate descriptions in registration order.
    pub fn predicate_descriptions(&self) -> Vec<Option<&str>> {
        self.by_predicate.iter().map(|entry| entry.description()).collect()
    }

    pub(crate) fn sorted_by_version_mut(&mut self) -> Vec<(&VersionValue, &mut Box<dyn Evolution>)> {
        let mut entries = self.by_version.iter_mut().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub(crate) fn predicates_mut(&mut self) -> &mut [PredicateEvolution] {
        &mut self.by_predicate
    }
}

impl Default for EvolutionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EvolutionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionRegistry")
            .field("versions", &self.versions_sorted())
            .field("predicates", &self.by_predicate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MoonStoneError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDiagnostics {
        warnings: Mutex<Vec<String>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn debug(&self, _message: &str) {}
        fn info(&self, _message: &str) {}
        fn warn(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
        fn error(&self, _message: &str) {}
    }

    fn noop() -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_register_by_version_chains() {
        let mut registry = EvolutionRegistry::new();
        registry
            .register_by_version("1.2.0", noop)
            .unwrap()
            .register_by_version("1.0.0", noop)
            .unwrap()
            .register_by_version("1.1.0", noop)
            .unwrap();

        assert_eq!(registry.version_count(), 3);
        let sorted = registry
            .versions_sorted()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(sorted, vec!["1.0.0", "1.1.0", "1.2.0"]);
    }

    #[test]
    fn test_register_invalid_version() {
        let mut registry = EvolutionRegistry::new();
        let err = registry.register_by_version("one.two", noop).err().unwrap();
        assert!(matches!(err, MoonStoneError::InvalidVersionFormat(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_version_warns_and_replaces() {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let mut registry = EvolutionRegistry::with_diagnostics(diagnostics.clone());
        registry.register_by_version("1.0", noop).unwrap();
        registry.register_by_version("1.0.0+5", noop).unwrap();

        assert_eq!(registry.version_count(), 1);
        assert_eq!(registry.versions_sorted()[0].to_string(), "1.0.0+5");
        let warnings = diagnostics.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("1.0.0+5"));
    }

    #[test]
    fn test_predicates_keep_order_and_duplicates() {
        let mut registry = EvolutionRegistry::new();
        registry
            .register_by_predicate(|| true, Some("first"), noop)
            .register_by_predicate(|| true, None, noop)
            .register_by_predicate(|| true, Some("first"), noop);

        assert_eq!(registry.predicate_count(), 3);
        assert_eq!(
            registry.predicate_descriptions(),
            vec![Some("first"), None, Some("first")]
        );
    }
}
