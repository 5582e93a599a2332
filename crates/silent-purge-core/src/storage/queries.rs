use super::models::PersistedEntry;
use super::sqlite::Database;
use crate::model::FileRecord;
use ahash::AHashMap;
use rusqlite::{params, params_from_iter, Result};
use tracing::debug;

// Stays well under SQLITE_MAX_VARIABLE_NUMBER on older builds.
const LOOKUP_CHUNK: usize = 500;

impl Database {
    /// Fetch stored measurements for the given identifiers. Identifiers without a row are
    /// absent from the result. An empty input never touches the database.
    ///
    /// If an identifier was inserted more than once, the oldest row wins.
    pub fn lookup(&self, identifiers: &[&str]) -> Result<AHashMap<String, PersistedEntry>> {
        let mut found = AHashMap::with_capacity(identifiers.len());
        if identifiers.is_empty() {
            return Ok(found);
        }

        for chunk in identifiers.chunks(LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!(
                "SELECT id, max_volume, hash, file_name, path FROM files \
                 WHERE hash IN ({}) ORDER BY id",
                placeholders
            );
            let mut stmt = self.connection().prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok(PersistedEntry {
                    store_key: row.get(0)?,
                    max_volume: row.get(1)?,
                    identifier: row.get(2)?,
                    file_name: row.get(3)?,
                    path: row.get(4)?,
                })
            })?;

            for entry in rows {
                let entry = entry?;
                found.entry(entry.identifier.clone()).or_insert(entry);
            }
        }

        debug!(
            "Store lookup: {} of {} identifiers found",
            found.len(),
            identifiers.len()
        );
        Ok(found)
    }

    /// Insert one row per record in a single transaction and return the assigned row ids in
    /// input order. Every record must already carry a resolved volume.
    pub fn insert_many(
        &self,
        records: &[FileRecord],
    ) -> std::result::Result<Vec<i64>, crate::Error> {
        let mut values = Vec::with_capacity(records.len());
        for record in records {
            let volume = record
                .volume
                .to_stored()
                .ok_or_else(|| crate::Error::Unresolved(record.path_str()))?;
            values.push(volume);
        }

        let tx = self.connection().unchecked_transaction()?;
        let mut keys = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO files (max_volume, hash, file_name, path) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (record, volume) in records.iter().zip(values) {
                stmt.execute(params![
                    volume,
                    record.identifier,
                    record.file_name,
                    record.path_str(),
                ])?;
                keys.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        debug!("Inserted {} measurement rows", keys.len());
        Ok(keys)
    }

    pub fn count_entries(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
    }
}
