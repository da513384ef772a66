use crate::data::student::StudentRecord;
use regex::Regex;
use serde::Deserialize;
use snafu::{Snafu, ensure};
use std::sync::LazyLock;

static LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("letters-only pattern is valid"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// Rules are checked in declaration order; only the first failure is reported.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ValidationError {
    #[snafu(display("Please fill in all required fields!"))]
    MissingRequiredFields,
    #[snafu(display("Name should only contain letters!"))]
    NameNotLetters,
    #[snafu(display("Gender should only contain letters!"))]
    GenderNotLetters,
    #[snafu(display("Gender must be either Male or Female!"))]
    UnknownGender,
    #[snafu(display("Please enter a valid Gmail address (e.g., example@gmail.com)."))]
    InvalidEmail,
}

/// The add-student form as submitted from the roster page.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct NewStudentForm {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub email: String,
    pub course: String,
    pub year: String,
    pub university: String,
}

impl NewStudentForm {
    #[must_use]
    pub fn trimmed(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        Self {
            student_id: trim(self.student_id),
            name: trim(self.name),
            gender: trim(self.gender),
            email: trim(self.email),
            course: trim(self.course),
            year: trim(self.year),
            university: trim(self.university),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure!(
            !(self.student_id.is_empty()
                || self.name.is_empty()
                || self.gender.is_empty()
                || self.email.is_empty()),
            MissingRequiredFieldsSnafu
        );
        ensure!(LETTERS_ONLY.is_match(&self.name), NameNotLettersSnafu);
        ensure!(LETTERS_ONLY.is_match(&self.gender), GenderNotLettersSnafu);

        let gender = self.gender.to_lowercase();
        ensure!(gender == "male" || gender == "female", UnknownGenderSnafu);
        ensure!(EMAIL.is_match(&self.email), InvalidEmailSnafu);

        Ok(())
    }

    pub fn into_student(self) -> StudentRecord {
        StudentRecord {
            student_id: self.student_id,
            name: self.name,
            gender: self.gender,
            email: self.email,
            course: self.course,
            year: self.year,
            university: self.university,
            ..StudentRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewStudentForm {
        NewStudentForm {
            student_id: "S2".to_string(),
            name: "Bo Smith".to_string(),
            gender: "Male".to_string(),
            email: "bo@x.com".to_string(),
            course: "CS".to_string(),
            year: "1".to_string(),
            university: "U".to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let form = NewStudentForm {
            course: String::new(),
            year: String::new(),
            university: String::new(),
            ..valid()
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn required_fields_come_first() {
        // the name is also invalid, but the missing email wins
        let form = NewStudentForm {
            name: "B0".to_string(),
            email: "   ".to_string(),
            ..valid()
        }
        .trimmed();
        assert_eq!(form.validate(), Err(ValidationError::MissingRequiredFields));
    }

    #[test]
    fn name_must_be_letters() {
        let form = NewStudentForm {
            name: "R2D2".to_string(),
            gender: "robot".to_string(),
            ..valid()
        };
        assert_eq!(form.validate(), Err(ValidationError::NameNotLetters));
    }

    #[test]
    fn gender_letters_checked_before_enumeration() {
        let form = NewStudentForm {
            gender: "m4le".to_string(),
            ..valid()
        };
        assert_eq!(form.validate(), Err(ValidationError::GenderNotLetters));

        let form = NewStudentForm {
            gender: "other".to_string(),
            ..valid()
        };
        assert_eq!(form.validate(), Err(ValidationError::UnknownGender));
    }

    #[test]
    fn gender_is_case_insensitive() {
        let form = NewStudentForm {
            gender: "FEMALE".to_string(),
            ..valid()
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn email_needs_a_domain_and_tld() {
        for email in ["bo", "bo@x", "bo@x.c", "b o@x.com"] {
            let form = NewStudentForm {
                email: email.to_string(),
                ..valid()
            };
            assert_eq!(form.validate(), Err(ValidationError::InvalidEmail), "{email}");
        }
    }

    #[test]
    fn trimming_applies_to_every_field() {
        let form = NewStudentForm {
            student_id: "  S2 ".to_string(),
            university: "\tU\n".to_string(),
            ..valid()
        }
        .trimmed();

        let student = form.into_student();
        assert_eq!(student.student_id, "S2");
        assert_eq!(student.university, "U");
    }
}
