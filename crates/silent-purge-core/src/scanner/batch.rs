use crate::error::Error;
use crate::model::FileRecord;
use ahash::AHashMap;

/// Number of distinct files collected before a batch is handed to the pipeline.
pub const BATCH_SIZE: usize = 20;

/// Files processed together for one store round-trip, keyed by identifier.
///
/// Insertion order is kept. Inserting an identifier that is already present replaces the
/// earlier record in place.
#[derive(Debug, Default)]
pub struct Batch {
    records: Vec<FileRecord>,
    index: AHashMap<String, usize>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: FileRecord) {
        let existing = self.index.get(&record.identifier).copied();
        match existing {
            Some(slot) => self.records[slot] = record,
            None => {
                self.index
                    .insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&FileRecord> {
        self.index.get(identifier).map(|&slot| &self.records[slot])
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.identifier.as_str())
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

/// Pull-based grouping over a stream of discovered files.
///
/// Emits a batch every `BATCH_SIZE` distinct identifiers, then one final batch when the
/// source runs dry. The final batch may be empty.
pub struct Batches<I> {
    source: I,
    size: usize,
    pending: Batch,
    done: bool,
}

impl<I> Batches<I>
where
    I: Iterator<Item = Result<FileRecord, Error>>,
{
    pub fn new(source: I) -> Self {
        Self::with_size(source, BATCH_SIZE)
    }

    pub fn with_size(source: I, size: usize) -> Self {
        Self {
            source,
            size: size.max(1),
            pending: Batch::new(),
            done: false,
        }
    }
}

impl<I> Iterator for Batches<I>
where
    I: Iterator<Item = Result<FileRecord, Error>>,
{
    type Item = Result<Batch, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.source.next() {
                Some(Ok(record)) => {
                    self.pending.insert(record);
                    if self.pending.len() >= self.size {
                        return Some(Ok(std::mem::take(&mut self.pending)));
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.done = true;
                    return Some(Ok(std::mem::take(&mut self.pending)));
                }
            }
        }
    }
}
