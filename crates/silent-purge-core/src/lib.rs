pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod meter;
pub mod model;
pub mod policy;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use config::AppConfig;
pub use engine::{PurgeEngine, RunSummary};
pub use error::Error;
pub use meter::{FfmpegMeter, MeasureError, VolumeMeter};
pub use model::{FileRecord, Volume};
pub use policy::{DeletionPolicy, Outcome};
pub use progress::{PurgeReporter, SilentReporter};
