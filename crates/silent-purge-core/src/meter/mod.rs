pub mod ffmpeg;

use crate::model::{FileRecord, Volume};
use std::path::Path;
use thiserror::Error;
use tracing::{trace, warn};

pub use ffmpeg::FfmpegMeter;

/// Why a single file could not be measured.
#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("failed to start decoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read decoder output: {0}")]
    Read(#[source] std::io::Error),

    #[error("decoder exited with {status}: {stderr}")]
    Decoder { status: String, stderr: String },

    #[error("no audio samples decoded")]
    NoAudio,
}

/// Source of peak volume measurements.
pub trait VolumeMeter {
    /// Peak amplitude of the file's audio on the meter's scale.
    fn measure(&self, path: &Path) -> Result<i64, MeasureError>;
}

/// Measure every record in place. A failure marks that record `Failed` and moves on.
///
/// Returns the number of failures.
pub fn measure_all<M: VolumeMeter + ?Sized>(meter: &M, records: &mut [FileRecord]) -> usize {
    let mut failures = 0;
    for record in records.iter_mut() {
        record.volume = match meter.measure(&record.path) {
            Ok(peak) => {
                trace!("Measured {}: {}", record.path.display(), peak);
                Volume::Measured(peak)
            }
            Err(e) => {
                warn!("Could not measure '{}': {}", record.path.display(), e);
                failures += 1;
                Volume::Failed
            }
        };
    }
    failures
}
