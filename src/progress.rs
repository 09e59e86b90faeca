// src/progress.rs
/// Lightweight progress reporting used by long-running operations
/// (batch scrape, batch wiki lint). Frontends implement this to surface
/// status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a property was fetched).
    fn item_done(&mut self, _name: &str) {}

    /// Called when one logical unit fails; the batch keeps going.
    fn item_failed(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
