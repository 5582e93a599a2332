use crate::model::Volume;
use std::path::Path;

/// Trait for reporting purge progress and per-file results.
///
/// CLI implements with indicatif/colored console output.
/// All methods have default no-op implementations.
pub trait PurgeReporter {
    fn on_run_start(&self, _root: &Path) {}
    fn on_batch_start(&self, _batch_index: usize, _files: usize) {}
    fn on_batch_complete(&self, _batch_index: usize, _cache_hits: usize, _measured: usize) {}
    /// A file fell under the silence rule. Called in dry runs too.
    fn on_flagged(&self, _path: &Path, _volume: Volume) {}
    fn on_deleted(&self, _path: &Path) {}
    fn on_delete_failed(&self, _path: &Path, _error: &str) {}
    fn on_run_complete(&self, _files_seen: usize, _duration_secs: f64) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl PurgeReporter for SilentReporter {}
