use crate::error::Error;
use crate::model::FileRecord;
use std::io;
use std::path::Path;
use tracing::{error, trace};
use walkdir::WalkDir;

/// Lazy recursive traversal yielding one `FileRecord` per in-scope media file.
///
/// Directories that cannot be read because of permissions are logged and skipped. Any other
/// traversal error is yielded to the caller.
pub struct MediaFiles {
    walker: walkdir::IntoIter,
    extensions: Vec<String>,
}

impl MediaFiles {
    pub fn new(root: &Path, extensions: &[String]) -> Self {
        Self {
            walker: WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }
}

impl Iterator for MediaFiles {
    type Item = Result<FileRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy();
                    if !has_media_extension(&name, &self.extensions) {
                        continue;
                    }
                    trace!("Discovered {}", entry.path().display());
                    return Some(Ok(FileRecord::new(entry.into_path())));
                }
                Err(err) => {
                    let denied = err
                        .io_error()
                        .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied);
                    if denied {
                        error!("Access denied during traversal: {}", err);
                        continue;
                    }
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

/// Case-insensitive suffix match of a file name against lowercase extensions.
pub fn has_media_extension(file_name: &str, extensions: &[String]) -> bool {
    let lower = file_name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
}
