use std::path::PathBuf;

use silent_purge_core::storage::Database;
use silent_purge_core::{Error, FileRecord, Volume};
use tempfile::tempdir;

fn measured_record(path: &str, volume: Volume) -> FileRecord {
    let mut record = FileRecord::new(PathBuf::from(path));
    record.volume = volume;
    record
}

#[test]
fn test_ensure_schema_is_idempotent() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("remove_silent.db");

    let db = Database::open(&db_path).unwrap();
    db.insert_many(&[measured_record("/m/a.mp4", Volume::Measured(7))])
        .unwrap();
    db.ensure_schema().unwrap();
    db.ensure_schema().unwrap();
    drop(db);

    let reopened = Database::open(&db_path).unwrap();
    assert_eq!(reopened.count_entries().unwrap(), 1);
}

#[test]
fn test_lookup_with_no_identifiers_is_empty() {
    let db = Database::open_in_memory().unwrap();
    let found = db.lookup(&[]).unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_empty_lookup_never_queries() {
    let db = Database::open_in_memory().unwrap();
    db.connection().execute_batch("DROP TABLE files").unwrap();

    assert!(db.lookup(&[]).unwrap().is_empty());
    assert!(db.lookup(&["abc"]).is_err());
}

#[test]
fn test_insert_and_lookup() {
    let db = Database::open_in_memory().unwrap();
    let records = vec![
        measured_record("/m/loud.mp4", Volume::Measured(9000)),
        measured_record("/m/broken.avi", Volume::Failed),
        measured_record("/m/zero.rm", Volume::Measured(0)),
    ];
    let keys = db.insert_many(&records).unwrap();
    assert_eq!(keys.len(), 3);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));

    let missing = FileRecord::new(PathBuf::from("/m/unknown.mp4"));
    let ids: Vec<&str> = records
        .iter()
        .map(|r| r.identifier.as_str())
        .chain(std::iter::once(missing.identifier.as_str()))
        .collect();
    let found = db.lookup(&ids).unwrap();

    assert_eq!(found.len(), 3);
    assert!(!found.contains_key(&missing.identifier));

    let loud = &found[&records[0].identifier];
    assert_eq!(loud.store_key, keys[0]);
    assert_eq!(loud.volume(), Volume::Measured(9000));
    assert_eq!(loud.file_name, "loud.mp4");
    assert_eq!(loud.path, "/m/loud.mp4");

    let broken = &found[&records[1].identifier];
    assert_eq!(broken.max_volume, -1);
    assert_eq!(broken.volume(), Volume::Failed);

    assert_eq!(found[&records[2].identifier].volume(), Volume::Measured(0));
}

#[test]
fn test_duplicate_rows_resolve_to_oldest() {
    let db = Database::open_in_memory().unwrap();
    let first = db
        .insert_many(&[measured_record("/m/a.mp4", Volume::Measured(10))])
        .unwrap();
    db.insert_many(&[measured_record("/m/a.mp4", Volume::Measured(999))])
        .unwrap();
    assert_eq!(db.count_entries().unwrap(), 2);

    let id = FileRecord::new(PathBuf::from("/m/a.mp4")).identifier;
    let found = db.lookup(&[id.as_str()]).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[&id].store_key, first[0]);
    assert_eq!(found[&id].max_volume, 10);
}

#[test]
fn test_insert_rejects_unmeasured_record() {
    let db = Database::open_in_memory().unwrap();
    let records = vec![
        measured_record("/m/ok.mp4", Volume::Measured(500)),
        FileRecord::new(PathBuf::from("/m/pending.mp4")),
    ];

    let err = db.insert_many(&records).unwrap_err();
    assert!(matches!(err, Error::Unresolved(_)));
    assert_eq!(db.count_entries().unwrap(), 0);
}

#[test]
fn test_lookup_larger_than_one_chunk() {
    let db = Database::open_in_memory().unwrap();
    let records: Vec<FileRecord> = (0..1200)
        .map(|i| measured_record(&format!("/m/{}.mp4", i), Volume::Measured(i)))
        .collect();
    db.insert_many(&records).unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
    let found = db.lookup(&ids).unwrap();
    assert_eq!(found.len(), 1200);
    assert_eq!(found[&records[1100].identifier].max_volume, 1100);
}
