use crate::config::MoonStoneConfig;
use crate::core::{
    EvolutionResult, MoonStoneError, Result, VersionValue, combine_preferring_first_failure,
};
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::evolution::{Evolution, EvolutionPredicate, EvolutionRegistry};
use crate::source::VersionSource;
use crate::storage::ProgressStore;
use std::sync::Arc;
use tracing::{Level, event, info_span};

/// Evolution engine
///
/// Owns the registered evolutions and the two collaborators it needs at run
/// time: where the current version comes from, and where progress is stored.
///
/// # Examples
///
/// ```
/// use moonstone::{MemoryStore, MoonStone, MoonStoneConfig, StaticVersion};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::with_entry("MoonStone.version", "1.0.0");
/// let mut moonstone = MoonStone::new(
///     MoonStoneConfig::default(),
///     StaticVersion::new("1.1.0"),
///     store.clone(),
/// )?;
///
/// moonstone.register_by_version("1.1.0", || -> anyhow::Result<()> {
///     // move files, rewrite settings, ...
///     Ok(())
/// })?;
///
/// moonstone.evolve().into_result()?;
/// assert_eq!(moonstone.stored_version()?.unwrap().to_string(), "1.1.0");
/// # Ok(())
/// # }
/// ```
pub struct MoonStone {
    config: MoonStoneConfig,
    version_source: Box<dyn VersionSource>,
    store: Box<dyn ProgressStore>,
    diagnostics: Arc<dyn Diagnostics>,
    registry: EvolutionRegistry,
}

impl MoonStone {
    /// Creates an engine after validating `config`.
    pub fn new<V, S>(config: MoonStoneConfig, version_source: V, store: S) -> Result<Self>
    where
        V: VersionSource + 'static,
        S: ProgressStore + 'static,
    {
        config.validate()?;
        let diagnostics: Arc<dyn Diagnostics> = Arc::new(LogDiagnostics);
        Ok(Self {
            config,
            version_source: Box::new(version_source),
            store: Box::new(store),
            registry: EvolutionRegistry::with_diagnostics(diagnostics.clone()),
            diagnostics,
        })
    }

    /// Replaces the default `log`-backed diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.registry.set_diagnostics(diagnostics.clone());
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &MoonStoneConfig {
        &self.config
    }

    pub fn registry(&self) -> &EvolutionRegistry {
        &self.registry
    }

    /// See [`EvolutionRegistry::register_by_version`].
    pub fn register_by_version<E>(&mut self, version: &str, evolution: E) -> Result<&mut Self>
    where
        E: Evolution + 'static,
    {
        self.registry.register_by_version(version, evolution)?;
        Ok(self)
    }

    /// See [`EvolutionRegistry::register_by_predicate`].
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
        self.registry
            .register_by_predicate(predicate, description, evolution);
        self
    }

    /// Runs both phases in the configured order and reports the first failure.
    ///
    /// Both phases always run: a failing version phase does not stop
    /// predicate-keyed evolutions, and vice versa.
    ///
    /// Meant to be called once at startup. Overlapping runs from other
    /// processes sharing the same store must be prevented by the caller.
    pub fn evolve(&mut self) -> EvolutionResult {
        let _span = info_span!("moonstone.evolve", prefix = %self.config.prefix).entered();

        let (first, second) = if self.config.run_predicates_before_version {
            let predicates = self.evolve_with_predicates();
            let versions = self.evolve_with_versions();
            (predicates, versions)
        } else {
            let versions = self.evolve_with_versions();
            let predicates = self.evolve_with_predicates();
            (versions, predicates)
        };

        combine_preferring_first_failure(first, second)
    }

    /// Version phase: runs every registered version newer than the stored one,
    /// ascending, recording progress after each success.
    pub fn evolve_with_versions(&mut self) -> EvolutionResult {
        let raw = self.version_source.current_version_string();
        let current = match VersionValue::parse(&raw) {
            Ok(version) => version,
            Err(err) => {
                self.diagnostics.error(&format!(
                    "Could not parse the current application version '{}'",
                    raw
                ));
                return EvolutionResult::Failed(MoonStoneError::CouldNotParseCurrentVersion(err));
            }
        };

        self.run_version_evolutions(&current).into()
    }

    /// Predicate phase: runs, in registration order, every evolution whose
    /// predicate currently holds.
    pub fn evolve_with_predicates(&mut self) -> EvolutionResult {
        for entry in self.registry.predicates_mut() {
            if !entry.predicate.holds() {
                continue;
            }

            event!(Level::DEBUG, description = ?entry.description, "running predicate evolution");
            self.diagnostics.debug(&format!(
                "Running evolution based on predicate '{}'",
                entry.description.as_deref().unwrap_or("<no description>")
            ));
            if let Err(source) = entry.evolution.run() {
                event!(Level::ERROR, description = ?entry.description, error = %source, "predicate evolution failed");
                self.diagnostics.error(
                    "An evolution based on a predicate failed. Aborting evolutions.",
                );
                return EvolutionResult::Failed(MoonStoneError::EvolutionBasedOnPredicateFailed {
                    source,
                    description: entry.description.clone(),
                });
            }
        }

        EvolutionResult::Succeeded
    }

    /// The last version recorded in the store, if any.
    pub fn stored_version(&self) -> Result<Option<VersionValue>> {
        self.read_stored_version(&self.config.version_key())
    }

    /// Version-keyed evolutions the next [`evolve`](Self::evolve) would attempt.
    ///
    /// Read-only: unlike `evolve`, a missing record is not written.
    pub fn pending_versions(&self) -> Result<Vec<VersionValue>> {
        let raw = self.version_source.current_version_string();
        let current =
            VersionValue::parse(&raw).map_err(MoonStoneError::CouldNotParseCurrentVersion)?;

        let Some(previous) = self.stored_version()? else {
            return Ok(Vec::new());
        };
        if previous >= current {
            return Ok(Vec::new());
        }

        Ok(self
            .registry
            .versions_sorted()
            .into_iter()
            .filter(|version| *version > previous)
            .collect())
    }

    fn read_stored_version(&self, key: &str) -> Result<Option<VersionValue>> {
        let Some(raw) = self.store.get_string(key)? else {
            return Ok(None);
        };
        VersionValue::parse(&raw)
            .map(Some)
            .map_err(|source| MoonStoneError::InvalidStoredVersion {
                key: key.to_string(),
                source,
            })
    }

    fn run_version_evolutions(&mut self, current: &VersionValue) -> Result<()> {
        let key = self.config.version_key();

        let mut previous = match self.read_stored_version(&key)? {
            Some(previous) => previous,
            None => {
                self.store.set_string(&key, &current.to_string())?;
                event!(Level::INFO, version = %current, "recorded first-run baseline");
                self.diagnostics.info(&format!(
                    "No previous version recorded. Recording {} as the baseline.",
                    current
                ));
                current.clone()
            }
        };

        if previous >= *current {
            return Ok(());
        }

        for (version, evolution) in self.registry.sorted_by_version_mut() {
            if *version <= previous {
                continue;
            }

            event!(Level::DEBUG, version = %version, "running version evolution");
            self.diagnostics
                .debug(&format!("Running evolution for version {}", version));
            if let Err(source) = evolution.run() {
                event!(Level::ERROR, version = %version, error = %source, "version evolution failed");
                self.diagnostics.error(
                    "An evolution based on version failed. The version will be locked to the latest valid update. Aborting evolutions.",
                );
                return Err(MoonStoneError::EvolutionBasedOnVersionFailed {
                    source,
                    version: version.to_string(),
                });
            }

            self.store.set_string(&key, &version.to_string())?;
            previous = version.clone();
        }

        Ok(())
    }
}

impl std::fmt::Debug for MoonStone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoonStone")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
