use crate::data::student::StudentRecord;
use serde::Deserialize;

/// Search box and gender dropdown from the roster page.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct StudentFilter {
    pub search: String,
    pub gender: String,
}

impl StudentFilter {
    /// Case-insensitive substring match of `search` against name or course, plus a
    /// case-insensitive exact gender match when a gender is selected.
    pub fn matches(&self, student: &StudentRecord) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = student.name.to_lowercase().contains(&search)
            || student.course.to_lowercase().contains(&search);
        let matches_gender =
            self.gender.is_empty() || student.gender.to_lowercase() == self.gender.to_lowercase();

        matches_search && matches_gender
    }

    pub fn apply(&self, students: Vec<StudentRecord>) -> Vec<StudentRecord> {
        students
            .into_iter()
            .filter(|student| self.matches(student))
            .collect()
    }
}
