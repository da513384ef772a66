use crate::{data::student::StudentRecord, error::RosterResult, state::RosterState};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

/// `{"message": ...}`, the body of every non-list JSON response.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Always succeeds: an unreadable roster is reported as an empty one.
pub async fn get_students(State(state): State<RosterState>) -> impl IntoResponse {
    let students = StudentRecord::get_all(&state).await;
    ([(header::CACHE_CONTROL, "no-store")], Json(students))
}

pub async fn post_student(
    State(state): State<RosterState>,
    Json(student): Json<StudentRecord>,
) -> RosterResult<(StatusCode, Json<ApiMessage>)> {
    info!(id = ?student.student_id, name = ?student.name, "Received new student");

    student.insert(&state).await?;

    info!("Student saved");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::new("Student added successfully!")),
    ))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<ApiMessage>> {
    let removed = StudentRecord::remove_by_id(&id, &state).await?;

    info!(?id, removed, "Deleted student");
    Ok(Json(ApiMessage::new("Student deleted successfully")))
}
