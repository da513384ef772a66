use crate::{
    data::student::StudentRecord,
    error::{ParseStoreSnafu, RosterResult, SerialiseStoreSnafu},
};
use async_trait::async_trait;
use snafu::ResultExt;
use std::fmt::Debug;

pub mod in_memory;
pub mod json_file;

/// Whole-collection persistence for the roster.
///
/// Every mutation is a full read-modify-write: callers `try_load`/`load` everything, change
/// it, then `save` everything back.
#[async_trait]
pub trait RecordStore: Debug + Send + Sync {
    /// Reads all records. A store that has never been written is empty; unreadable or
    /// unparseable contents are errors.
    async fn try_load(&self) -> RosterResult<Vec<StudentRecord>>;

    /// Overwrites the stored collection with `students`.
    async fn save(&self, students: &[StudentRecord]) -> RosterResult<()>;

    /// Like [`RecordStore::try_load`], but any failure (including blank contents) degrades to
    /// an empty roster.
    async fn load(&self) -> Vec<StudentRecord> {
        match self.try_load().await {
            Ok(students) => students,
            Err(e) => {
                warn!(?e, "Unable to load students, treating roster as empty");
                vec![]
            }
        }
    }
}

/// Blank contents are not an empty array here, only an absent store is.
pub fn decode_students(contents: &str) -> RosterResult<Vec<StudentRecord>> {
    serde_json::from_str(contents).context(ParseStoreSnafu)
}

/// Pretty-printed with two-space indentation.
pub fn encode_students(students: &[StudentRecord]) -> RosterResult<String> {
    serde_json::to_string_pretty(students).context(SerialiseStoreSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_contents_are_not_a_roster() {
        assert!(decode_students("").is_err());
        assert!(decode_students("  \n").is_err());
        assert!(decode_students("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_contents_are_rejected() {
        assert!(decode_students("{\"student_id\": \"S1\"}").is_err());
        assert!(decode_students("[{").is_err());
    }

    #[test]
    fn encoding_uses_two_space_indent() {
        let students = vec![StudentRecord {
            student_id: "S1".to_string(),
            ..StudentRecord::default()
        }];

        let encoded = encode_students(&students).unwrap();
        assert!(encoded.starts_with("[\n  {\n    \"student_id\": \"S1\","));
        assert_eq!(decode_students(&encoded).unwrap(), students);
    }
}
