use crate::config::AppConfig;
use crate::error::Error;
use crate::meter::{self, VolumeMeter};
use crate::model::FileRecord;
use crate::policy::{DeletionPolicy, Outcome};
use crate::progress::PurgeReporter;
use crate::scanner::{Batch, Batches, MediaFiles};
use crate::storage::Database;
use std::ops::AddAssign;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub struct PurgeEngine {
    config: AppConfig,
    root: PathBuf,
    dry_run: bool,
}

/// Counters for one batch or a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub files_seen: usize,
    pub cache_hits: usize,
    pub measured: usize,
    pub measure_failures: usize,
    /// Files that fell under the silence rule, dry run or not.
    pub flagged: usize,
    pub deleted: usize,
    pub delete_failures: usize,
}

impl AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.batches += other.batches;
        self.files_seen += other.files_seen;
        self.cache_hits += other.cache_hits;
        self.measured += other.measured;
        self.measure_failures += other.measure_failures;
        self.flagged += other.flagged;
        self.deleted += other.deleted;
        self.delete_failures += other.delete_failures;
    }
}

impl PurgeEngine {
    pub fn new(root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            config,
            root: root.into(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The measurement store lives inside the scanned root.
    pub fn store_path(&self) -> PathBuf {
        self.root.join(&self.config.store_file_name)
    }

    /// Open the store under the root and run the whole purge against it.
    pub fn run<M>(&self, meter: &M, reporter: &dyn PurgeReporter) -> Result<RunSummary, Error>
    where
        M: VolumeMeter + ?Sized,
    {
        let db = Database::open(self.store_path())?;
        let summary = self.run_with(&db, meter, reporter)?;
        info!("{} measurements in store", db.count_entries()?);
        Ok(summary)
    }

    /// Walk the root in batches: look up, measure misses, persist, then apply the policy.
    pub fn run_with<M>(
        &self,
        db: &Database,
        meter: &M,
        reporter: &dyn PurgeReporter,
    ) -> Result<RunSummary, Error>
    where
        M: VolumeMeter + ?Sized,
    {
        info!(
            "Scanning {} ({})",
            self.root.display(),
            if self.dry_run { "dry run" } else { "deleting" }
        );
        reporter.on_run_start(&self.root);
        let start = Instant::now();

        let policy = DeletionPolicy::new(self.dry_run);
        let files = MediaFiles::new(&self.root, &self.config.extensions);

        let mut summary = RunSummary::default();
        for (index, batch) in Batches::new(files).enumerate() {
            summary += process_batch(db, meter, &policy, batch?, index, reporter)?;
        }

        let duration = start.elapsed();
        info!(
            "Done in {:.2}s: {} files, {} cached, {} measured ({} failed), {} flagged, {} deleted, {} delete failures",
            duration.as_secs_f64(),
            summary.files_seen,
            summary.cache_hits,
            summary.measured,
            summary.measure_failures,
            summary.flagged,
            summary.deleted,
            summary.delete_failures,
        );
        reporter.on_run_complete(summary.files_seen, duration.as_secs_f64());

        Ok(summary)
    }
}

/// Run one batch through lookup, measurement, persistence and the deletion policy, in
/// that order.
///
/// Cached records are decided first, freshly measured ones after. An empty batch returns
/// without touching the store.
pub fn process_batch<M>(
    db: &Database,
    meter: &M,
    policy: &DeletionPolicy,
    batch: Batch,
    index: usize,
    reporter: &dyn PurgeReporter,
) -> Result<RunSummary, Error>
where
    M: VolumeMeter + ?Sized,
{
    let mut summary = RunSummary {
        batches: 1,
        files_seen: batch.len(),
        ..Default::default()
    };
    if batch.is_empty() {
        return Ok(summary);
    }
    reporter.on_batch_start(index, batch.len());

    let identifiers: Vec<&str> = batch.identifiers().collect();
    let found = db.lookup(&identifiers)?;

    let mut cached: Vec<FileRecord> = Vec::with_capacity(found.len());
    let mut uncached: Vec<FileRecord> = Vec::new();
    for mut record in batch.into_records() {
        match found.get(&record.identifier) {
            Some(entry) => {
                record.store_key = Some(entry.store_key);
                record.volume = entry.volume();
                cached.push(record);
            }
            None => uncached.push(record),
        }
    }
    debug!(
        "Batch {}: {} cached, {} to measure",
        index,
        cached.len(),
        uncached.len()
    );

    summary.cache_hits = cached.len();
    summary.measured = uncached.len();
    summary.measure_failures = meter::measure_all(meter, &mut uncached);

    if !uncached.is_empty() {
        let keys = db.insert_many(&uncached)?;
        for (record, key) in uncached.iter_mut().zip(keys) {
            record.store_key = Some(key);
        }
    }
    reporter.on_batch_complete(index, summary.cache_hits, summary.measured);

    for record in cached.iter().chain(uncached.iter()) {
        if !record.volume.is_resolved() {
            return Err(Error::Unresolved(record.path_str()));
        }
        match policy.apply(record, reporter) {
            Outcome::Kept => {}
            Outcome::Reported => summary.flagged += 1,
            Outcome::Deleted => {
                summary.flagged += 1;
                summary.deleted += 1;
            }
            Outcome::DeleteFailed => {
                summary.flagged += 1;
                summary.delete_failures += 1;
            }
        }
    }

    Ok(summary)
}
