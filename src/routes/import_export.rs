use crate::{
    data::student::StudentRecord,
    error::{CsvSnafu, FinishCsvSnafu, MultipartSnafu, RosterError, RosterResult},
    maud_conveniences::{
        error_notice, form_submit_button, render_table, subtitle, success_notice, title,
    },
    state::RosterState,
};
use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

const CSV_HEADERS: [&str; 7] = [
    "Student ID",
    "Full Name",
    "Gender",
    "Gmail",
    "Program",
    "Year Level",
    "University",
];

/// One spreadsheet row, using the column names of the roster exports.
#[derive(Serialize, Deserialize, Debug)]
struct CsvStudent {
    #[serde(rename = "Student ID")]
    student_id: String,
    #[serde(rename = "Full Name")]
    name: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Gmail")]
    email: String,
    #[serde(rename = "Program")]
    course: String,
    #[serde(rename = "Year Level")]
    year: String,
    #[serde(rename = "University")]
    university: String,
}

impl From<CsvStudent> for StudentRecord {
    fn from(value: CsvStudent) -> Self {
        Self {
            student_id: value.student_id,
            name: value.name,
            gender: value.gender,
            email: value.email,
            course: value.course,
            year: value.year,
            university: value.university,
            ..Self::default()
        }
    }
}

impl From<StudentRecord> for CsvStudent {
    fn from(value: StudentRecord) -> Self {
        Self {
            student_id: value.student_id,
            name: value.name,
            gender: value.gender,
            email: value.email,
            course: value.course,
            year: value.year,
            university: value.university,
        }
    }
}

/// Parses every row it can, collecting the rest as errors instead of giving up.
pub fn parse_roster_csv(bytes: &[u8]) -> (Vec<StudentRecord>, Vec<RosterError>) {
    let mut students = vec![];
    let mut errors = vec![];

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);
    for record in rdr.deserialize::<CsvStudent>() {
        match record {
            Ok(student) => students.push(student.into()),
            Err(source) => errors.push(RosterError::Csv { source }),
        }
    }

    (students, errors)
}

pub async fn get_import_export_page(State(state): State<RosterState>) -> Markup {
    state.render(html! {
        div class="rounded shadow-xl flex flex-col p-4 m-2 bg-gray-800 max-w-4xl w-full" {
            (title("Import / Export"))

            div class="mb-8" {
                (subtitle("Export Students"))
                a href="/import_export/export_students.csv" download class="bg-pink-600 hover:bg-pink-700 font-bold py-2 px-4 rounded" {
                    "Download as CSV"
                }
            }

            div {
                (subtitle("Import Students"))

                div id="import_students_form" {
                    (render_table(
                        ["Column", "Example"],
                        vec![
                            [html!{"Student ID"}, html!{"2023-00123"}],
                            [html!{"Full Name"}, html!{"Ann Smith"}],
                            [html!{"Gender"}, html!{"Female"}],
                            [html!{"Gmail"}, html!{"ann@gmail.com"}],
                            [html!{"Program"}, html!{"BS Computer Science"}],
                            [html!{"Year Level"}, html!{"2"}],
                            [html!{"University"}, html!{"State University"}],
                        ]
                    ))
                    p class="italic" {"NB: Imported rows are added to the roster as-is, without validation."}
                    br;

                    form hx-put="/import_export/import_students" hx-swap="innerHTML" hx-target="#import_students_form" hx-encoding="multipart/form-data" {
                        label for="students_csv" class="block text-sm font-medium text-gray-400 mb-2" {"Upload Students CSV"}
                        input multiple type="file" name="students_csv" id="students_csv" accept=".csv" class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4 file:rounded file:border-0 file:text-sm file:font-semibold file:bg-violet-50 file:text-violet-700 hover:file:bg-violet-100 mb-4";

                        (form_submit_button("Import Students"))
                    }
                }
            }
        }
    })
}

pub async fn put_import_students(
    State(state): State<RosterState>,
    mut multipart: Multipart,
) -> Markup {
    let mut files = vec![];
    loop {
        match multipart.next_field().await.context(MultipartSnafu) {
            Ok(Some(field)) => match field.bytes().await.context(MultipartSnafu) {
                Ok(bytes) => files.push(bytes),
                Err(e) => return render_failure(&e),
            },
            Ok(None) => break,
            Err(e) => return render_failure(&e),
        }
    }

    match import_students(&state, files.iter().map(|bytes| &bytes[..])).await {
        Ok(markup) => markup,
        Err(e) => render_failure(&e),
    }
}

fn render_failure(e: &RosterError) -> Markup {
    error!(?e, "Failed to import students");
    error_notice(e.to_string())
}

async fn import_students<'a>(
    state: &RosterState,
    files: impl Iterator<Item = &'a [u8]>,
) -> RosterResult<Markup> {
    let mut students = vec![];
    let mut syntax_errors = vec![];
    for file in files {
        let (parsed, errors) = parse_roster_csv(file);
        students.extend(parsed);
        syntax_errors.extend(errors);
    }

    let imported = if students.is_empty() {
        0
    } else {
        StudentRecord::insert_many(students, state).await?
    };
    info!(imported, errors = syntax_errors.len(), "Imported students");

    Ok(html! {
        (success_notice(format!("Imported {imported} student(s).")))
        @if !syntax_errors.is_empty() {
            (subtitle("Skipped Rows"))
            ul class="list-disc list-inside text-red-400" {
                @for e in &syntax_errors {
                    li {(snafu::Report::from_error(e).to_string())}
                }
            }
        }
    })
}

pub async fn get_export_students_csv(
    State(state): State<RosterState>,
) -> RosterResult<impl IntoResponse> {
    let students = StudentRecord::get_all(&state).await;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(CSV_HEADERS).context(CsvSnafu)?;
    for student in students {
        wtr.serialize(CsvStudent::from(student)).context(CsvSnafu)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context(FinishCsvSnafu)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        bytes,
    ))
}
