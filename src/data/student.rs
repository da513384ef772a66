use crate::{
    error::{DeleteStudentSnafu, RosterResult, SaveStudentSnafu, StudentNotFoundSnafu},
    routes::sse::SseEvent,
    state::RosterState,
};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use snafu::{ResultExt, ensure};

/// One roster entry, stored exactly as clients send it.
///
/// Nothing here is validated: missing fields become empty strings and unknown fields are
/// carried through untouched. Numbers, booleans and `null` are readable as text, but are
/// written back as they were found unless the field has since changed.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub email: String,
    pub course: String,
    pub year: String,
    pub university: String,
    pub extra: Map<String, Value>,
    /// Original values of the named fields that weren't JSON strings.
    pub non_string_fields: Map<String, Value>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::String(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

impl TryFrom<Map<String, Value>> for StudentRecord {
    type Error = String;

    fn try_from(mut extra: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut non_string_fields = Map::new();
        let mut take = |key: &'static str| -> Result<String, String> {
            match extra.remove(key) {
                None => Ok(String::new()),
                Some(Value::String(s)) => Ok(s),
                Some(other) => {
                    let text = scalar_text(&other).ok_or_else(|| {
                        format!("expected a string-like value for `{key}`, found {other}")
                    })?;
                    non_string_fields.insert(key.to_string(), other);
                    Ok(text)
                }
            }
        };

        let student_id = take("student_id")?;
        let name = take("name")?;
        let gender = take("gender")?;
        let email = take("email")?;
        let course = take("course")?;
        let year = take("year")?;
        let university = take("university")?;

        Ok(Self {
            student_id,
            name,
            gender,
            email,
            course,
            year,
            university,
            extra,
            non_string_fields,
        })
    }
}

impl Serialize for StudentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let named = [
            ("student_id", &self.student_id),
            ("name", &self.name),
            ("gender", &self.gender),
            ("email", &self.email),
            ("course", &self.course),
            ("year", &self.year),
            ("university", &self.university),
        ];

        let mut map = serializer.serialize_map(Some(named.len() + self.extra.len()))?;
        for (key, text) in named {
            match self.non_string_fields.get(key) {
                Some(original) if scalar_text(original).as_ref() == Some(text) => {
                    map.serialize_entry(key, original)?;
                }
                _ => map.serialize_entry(key, text)?,
            }
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl StudentRecord {
    /// Ids are compared strictly: a legacy numeric `student_id` never matches a path id.
    pub fn has_id(&self, id: &str) -> bool {
        !self.non_string_fields.contains_key("student_id") && self.student_id == id
    }

    pub async fn get_all(state: &RosterState) -> Vec<Self> {
        state.store().load().await
    }

    pub async fn insert(self, state: &RosterState) -> RosterResult<()> {
        Self::insert_many(vec![self], state).await.map(|_| ())
    }

    /// Appends `new_students` in one read-modify-write cycle, returning how many were added.
    pub async fn insert_many(new_students: Vec<Self>, state: &RosterState) -> RosterResult<usize> {
        let _guard = state.lock_for_mutation().await;
        let store = state.store();

        let mut students = store.load().await;
        let added = new_students.len();
        students.extend(new_students);

        store.save(&students).await.context(SaveStudentSnafu)?;
        state.send_sse_event(SseEvent::CrudStudent);

        Ok(added)
    }

    /// Removes every record that [`has_id`](Self::has_id) `id`.
    ///
    /// Unlike listing, an unreadable or corrupt store is an error here, so that "no match"
    /// stays distinguishable from "couldn't look".
    pub async fn remove_by_id(id: &str, state: &RosterState) -> RosterResult<usize> {
        let _guard = state.lock_for_mutation().await;
        let store = state.store();

        let mut students = store.try_load().await?;
        let before = students.len();
        students.retain(|student| !student.has_id(id));
        let removed = before - students.len();

        ensure!(removed > 0, StudentNotFoundSnafu { id });

        store.save(&students).await.context(DeleteStudentSnafu)?;
        state.send_sse_event(SseEvent::CrudStudent);

        Ok(removed)
    }
}
