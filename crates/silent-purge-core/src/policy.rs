use crate::model::{FileRecord, Volume};
use crate::progress::PurgeReporter;
use std::fs;
use tracing::{debug, error};

/// Peak volume at or below which a file is considered silent.
pub const SILENCE_THRESHOLD: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Delete,
}

/// What happened to a single record when the policy was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Kept,
    /// Flagged for deletion but left in place (dry run).
    Reported,
    Deleted,
    /// Flagged for deletion, but removing the file failed.
    DeleteFailed,
}

/// Silent (peak <= threshold) and unmeasurable files are deleted. Unresolved volumes are
/// never deleted.
pub fn decide(volume: Volume) -> Decision {
    match volume {
        Volume::Measured(peak) if peak <= SILENCE_THRESHOLD => Decision::Delete,
        Volume::Failed => Decision::Delete,
        Volume::Measured(_) | Volume::Unmeasured => Decision::Keep,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeletionPolicy {
    pub dry_run: bool,
}

impl DeletionPolicy {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Decide for one record and, when it is flagged, report it and remove the file unless
    /// this is a dry run.
    pub fn apply(&self, record: &FileRecord, reporter: &dyn PurgeReporter) -> Outcome {
        if decide(record.volume) == Decision::Keep {
            return Outcome::Kept;
        }

        reporter.on_flagged(&record.path, record.volume);
        if self.dry_run {
            debug!("Dry run, leaving {}", record.path.display());
            return Outcome::Reported;
        }

        match fs::remove_file(&record.path) {
            Ok(()) => {
                reporter.on_deleted(&record.path);
                Outcome::Deleted
            }
            Err(e) => {
                error!("Failed to remove '{}': {}", record.path.display(), e);
                reporter.on_delete_failed(&record.path, &e.to_string());
                Outcome::DeleteFailed
            }
        }
    }
}
