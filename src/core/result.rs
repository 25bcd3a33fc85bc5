use super::error::MoonStoneError;

/// Outcome of an evolution phase or of a whole `evolve()` run.
#[derive(Debug)]
#[must_use]
pub enum EvolutionResult {
    Succeeded,
    Failed(MoonStoneError),
}

impl EvolutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn error(&self) -> Option<&MoonStoneError> {
        match self {
            Self::Succeeded => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Converts into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<(), MoonStoneError> {
        match self {
            Self::Succeeded => Ok(()),
            Self::Failed(err) => Err(err),
        }
    }
}

impl From<Result<(), MoonStoneError>> for EvolutionResult {
    fn from(result: Result<(), MoonStoneError>) -> Self {
        match result {
            Ok(()) => Self::Succeeded,
            Err(err) => Self::Failed(err),
        }
    }
}

/// Merges two already-computed phase results.
///
/// The first failure wins; the second failure is surfaced only when the first
/// phase succeeded.
pub fn combine_preferring_first_failure(
    first: EvolutionResult,
    second: EvolutionResult,
) -> EvolutionResult {
    match (first, second) {
        (failed @ EvolutionResult::Failed(_), _) => failed,
        (EvolutionResult::Succeeded, second) => second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_failure(msg: &str) -> EvolutionResult {
        EvolutionResult::Failed(MoonStoneError::Store(msg.to_string()))
    }

    #[test]
    fn test_both_succeed() {
        let merged =
            combine_preferring_first_failure(EvolutionResult::Succeeded, EvolutionResult::Succeeded);
        assert!(merged.is_success());
    }

    #[test]
    fn test_first_failure_wins() {
        let merged = combine_preferring_first_failure(store_failure("left"), store_failure("right"));
        assert!(matches!(merged, EvolutionResult::Failed(MoonStoneError::Store(ref m)) if m == "left"));
    }

    #[test]
    fn test_second_failure_surfaces_after_success() {
        let merged = combine_preferring_first_failure(EvolutionResult::Succeeded, store_failure("right"));
        assert!(matches!(merged, EvolutionResult::Failed(MoonStoneError::Store(ref m)) if m == "right"));
    }

    #[test]
    fn test_into_result() {
        assert!(EvolutionResult::Succeeded.into_result().is_ok());
        assert!(store_failure("x").into_result().is_err());
    }
}
