use crate::{
    data::{filter::StudentFilter, student::StudentRecord, validation::NewStudentForm},
    maud_conveniences::{
        error_notice, escape, form_element, form_submit_button, render_table,
        simple_form_element, subtitle, success_notice,
    },
    state::RosterState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
};
use maud::{Markup, html};

pub async fn internal_get_students_table(
    State(state): State<RosterState>,
    Query(filter): Query<StudentFilter>,
) -> Markup {
    let students = filter.apply(StudentRecord::get_all(&state).await);

    render_table(
        [
            "Student ID",
            "Full Name",
            "Gender",
            "Email",
            "Program",
            "Year Level",
            "University",
            "Actions",
        ],
        students
            .into_iter()
            .map(|student| {
                let delete_url = format!(
                    "/internal/students_table/{}",
                    urlencoding::encode(&student.student_id)
                );
                [
                    escape(&student.student_id),
                    escape(&student.name),
                    escape(&student.gender),
                    escape(&student.email),
                    escape(&student.course),
                    escape(&student.year),
                    escape(&student.university),
                    html! {
                        button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete=(delete_url) hx-confirm="Are you sure you want to delete this student?" hx-target="#table_notice" {
                            "Delete"
                        }
                    },
                ]
            })
            .collect(),
    )
}

/// The table's delete button. Runs the same delete as `DELETE /students/{id}` but answers
/// with a notice for `#table_notice`; the table itself refreshes from the change feed.
pub async fn internal_delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> Markup {
    match StudentRecord::remove_by_id(&id, &state).await {
        Ok(removed) => {
            info!(?id, removed, "Deleted student from table");
            success_notice("Student deleted successfully!")
        }
        Err(e) => {
            warn!(?e, ?id, "Failed to delete student from table");
            error_notice(format!("Failed to delete student: {e}"))
        }
    }
}

pub fn render_student_form(notice: Option<Markup>, values: &NewStudentForm) -> Markup {
    html! {
        div id="student_form" {
            (subtitle("Add Student"))
            @if let Some(notice) = notice {
                (notice)
            }
            form hx-post="/internal/students/new" hx-trigger="submit" hx-target="#student_form" hx-swap="outerHTML" class="p-4" {
                (simple_form_element("student_id", "Student ID", true, None, &values.student_id))
                (simple_form_element("name", "Full Name", true, None, &values.name))
                (form_element("gender", "Gender", html! {
                    input required list="gender_options" type="text" id="gender" name="gender" value=(values.gender) class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
                    datalist id="gender_options" {
                        option value="Male" {}
                        option value="Female" {}
                    }
                }))
                (simple_form_element("email", "Gmail", true, Some("text"), &values.email))
                (simple_form_element("course", "Program", false, None, &values.course))
                (simple_form_element("year", "Year Level", false, None, &values.year))
                (simple_form_element("university", "University", false, None, &values.university))

                (form_submit_button("Add Student"))
            }
        }
    }
}

/// The page's add-student form. Unlike `POST /students`, this validates before saving and
/// keeps what was typed when a rule fails.
pub async fn internal_post_new_student(
    State(state): State<RosterState>,
    Form(form): Form<NewStudentForm>,
) -> Markup {
    let form = form.trimmed();

    if let Err(e) = form.validate() {
        debug!(?e, "Rejected new student form");
        return render_student_form(Some(error_notice(e.to_string())), &form);
    }

    let student = form.clone().into_student();
    info!(id = ?student.student_id, "Adding student from form");

    match student.insert(&state).await {
        Ok(()) => render_student_form(
            Some(success_notice("Student added successfully!")),
            &NewStudentForm::default(),
        ),
        Err(e) => {
            error!(?e, "Failed to add student from form");
            render_student_form(Some(error_notice("Failed to add student.")), &form)
        }
    }
}
