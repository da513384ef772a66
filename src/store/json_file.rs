use crate::{
    data::student::StudentRecord,
    error::{ReadStoreSnafu, RosterResult, WriteStoreSnafu},
    store::{RecordStore, decode_students, encode_students},
};
use async_trait::async_trait;
use snafu::ResultExt;
use std::{io::ErrorKind, path::PathBuf};

/// The roster as a single JSON array on disk.
///
/// There is no file locking here; serialising writers is the caller's job.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn try_load(&self) -> RosterResult<Vec<StudentRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "No roster file yet");
                return Ok(vec![]);
            }
            Err(source) => return Err(source).context(ReadStoreSnafu),
        };

        decode_students(&contents)
    }

    async fn save(&self, students: &[StudentRecord]) -> RosterResult<()> {
        let contents = encode_students(students)?;
        tokio::fs::write(&self.path, contents)
            .await
            .context(WriteStoreSnafu)?;

        debug!(path = ?self.path, count = students.len(), "Saved roster");
        Ok(())
    }
}
