use crate::model::Volume;

/// A measurement row in the `files` table.
#[derive(Debug, Clone)]
pub struct PersistedEntry {
    pub store_key: i64,
    pub max_volume: i64,
    pub identifier: String,
    pub file_name: String,
    pub path: String,
}

impl PersistedEntry {
    pub fn volume(&self) -> Volume {
        Volume::from_stored(self.max_volume)
    }
}
