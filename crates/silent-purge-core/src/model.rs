use std::fmt;
use std::path::PathBuf;

/// Stored `max_volume` value for a file the decoder could not measure.
pub const FAILED_VOLUME: i64 = -1;

/// Peak volume state of a discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Volume {
    /// Discovered but not yet resolved from the store or the decoder.
    #[default]
    Unmeasured,
    Measured(i64),
    Failed,
}

impl Volume {
    /// Decode the integer stored in the `max_volume` column.
    pub fn from_stored(value: i64) -> Self {
        if value == FAILED_VOLUME {
            Volume::Failed
        } else {
            Volume::Measured(value)
        }
    }

    /// Integer form written to the store. `None` while unmeasured.
    pub fn to_stored(self) -> Option<i64> {
        match self {
            Volume::Unmeasured => None,
            Volume::Measured(value) => Some(value),
            Volume::Failed => Some(FAILED_VOLUME),
        }
    }

    pub fn is_resolved(self) -> bool {
        !matches!(self, Volume::Unmeasured)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::Unmeasured => write!(f, "unmeasured"),
            Volume::Measured(value) => write!(f, "{}", value),
            Volume::Failed => write!(f, "{}", FAILED_VOLUME),
        }
    }
}

/// A media file found during traversal, carried through one batch.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub identifier: String,
    pub volume: Volume,
    pub file_name: String,
    pub path: PathBuf,
    /// Row id in the store, set once the file is known there.
    pub store_key: Option<i64>,
}

impl FileRecord {
    pub fn new(path: PathBuf) -> Self {
        let identifier = crate::hasher::identify(&path);
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            identifier,
            volume: Volume::Unmeasured,
            file_name,
            path,
            store_key: None,
        }
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
