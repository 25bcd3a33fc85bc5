pub mod registry;

pub use registry::EvolutionRegistry;

use crate::core::BoxError;

/// A fallible, side-effecting migration step.
///
/// Evolutions may run more than once if the process dies between the side
/// effect and the progress record being written, so they should be safe to
/// re-run.
pub trait Evolution: Send {
    fn run(&mut self) -> Result<(), BoxError>;
}

impl<F, E> Evolution for F
where
    F: FnMut() -> Result<(), E> + Send,
    E: Into<BoxError>,
{
    fn run(&mut self) -> Result<(), BoxError> {
        self().map_err(Into::into)
    }
}

/// Guard deciding whether a predicate-keyed evolution runs on this invocation.
pub trait EvolutionPredicate: Send {
    fn holds(&mut self) -> bool;
}

impl<F> EvolutionPredicate for F
where
    F: FnMut() -> bool + Send,
{
    fn holds(&mut self) -> bool {
        self()
    }
}

/// A registered predicate-keyed evolution.
pub struct PredicateEvolution {
    pub(crate) predicate: Box<dyn EvolutionPredicate>,
    pub(crate) description: Option<String>,
    pub(crate) evolution: Box<dyn Evolution>,
}

impl PredicateEvolution {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Debug for PredicateEvolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateEvolution")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
