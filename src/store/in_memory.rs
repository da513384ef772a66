use crate::{
    data::student::StudentRecord,
    error::{RosterResult, WriteStoreSnafu},
    store::{RecordStore, decode_students, encode_students},
};
use async_trait::async_trait;
use snafu::ResultExt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Keeps the encoded roster in memory instead of on disk.
///
/// Contents are held as text so that a corrupt store behaves the same as a corrupt file.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    contents: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// The last text written, or `None` if nothing has been saved yet.
    #[allow(dead_code)]
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }

    /// Makes every subsequent `save` fail with an I/O error.
    #[allow(dead_code)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn try_load(&self) -> RosterResult<Vec<StudentRecord>> {
        match self.contents.lock().await.as_deref() {
            Some(contents) => decode_students(contents),
            None => Ok(vec![]),
        }
    }

    async fn save(&self, students: &[StudentRecord]) -> RosterResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("writes disabled")).context(WriteStoreSnafu);
        }

        let encoded = encode_students(students)?;
        *self.contents.lock().await = Some(encoded);
        Ok(())
    }
}
