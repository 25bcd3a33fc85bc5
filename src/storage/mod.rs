pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::core::Result;

/// Persistence collaborator: a tiny string key-value record.
///
/// The engine only ever touches `"<prefix>.version"`, and accesses the store
/// strictly in sequence.
pub trait ProgressStore: Send {
    fn get_string(&self, key: &str) -> Result<Option<String>>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        (**self).get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_string(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
