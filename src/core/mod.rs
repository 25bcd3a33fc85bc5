pub mod error;
pub mod result;
pub mod version;

pub use error::{BoxError, MoonStoneError, Result, VersionError};
pub use result::{EvolutionResult, combine_preferring_first_failure};
pub use version::VersionValue;
