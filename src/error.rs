use crate::routes::students::ApiMessage;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error reading file"))]
    ReadStore { source: std::io::Error },
    #[snafu(display("Invalid JSON data"))]
    ParseStore { source: serde_json::Error },
    #[snafu(display("Error serialising students"))]
    SerialiseStore { source: serde_json::Error },
    #[snafu(display("Error writing file"))]
    WriteStore { source: std::io::Error },
    #[snafu(display("Error saving student"))]
    SaveStudent {
        #[snafu(source(from(RosterError, Box::new)))]
        source: Box<RosterError>,
    },
    #[snafu(display("Error deleting student"))]
    DeleteStudent {
        #[snafu(source(from(RosterError, Box::new)))]
        source: Box<RosterError>,
    },
    #[snafu(display("Student not found"))]
    StudentNotFound { id: String },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unknown store kind {:?}, expected `file` or `memory`", found))]
    UnknownStoreKind { found: String },
    #[snafu(display("Error with multipart form input"))]
    Multipart {
        source: axum::extract::multipart::MultipartError,
    },
    #[snafu(display("Error with CSVs"))]
    Csv { source: csv::Error },
    #[snafu(display("Error finishing CSV export"))]
    FinishCsv { source: std::io::Error },
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let status_code = match &self {
            Self::ReadStore { .. } | Self::ParseStore { .. } => ISE,
            Self::SerialiseStore { .. } | Self::WriteStore { .. } => ISE,
            Self::SaveStudent { .. } | Self::DeleteStudent { .. } => ISE,
            Self::StudentNotFound { .. } => NF,
            Self::BadEnvVar { .. } => ISE,
            Self::ParsePort { .. } => ISE,
            Self::UnknownStoreKind { .. } => ISE,
            Self::Multipart { source } => source.status(),
            Self::Csv { .. } => BI,
            Self::FinishCsv { .. } => ISE,
        };

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Request failed");
        }

        (status_code, Json(ApiMessage::new(self.to_string()))).into_response()
    }
}
