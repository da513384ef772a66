use crate::{
    data::validation::NewStudentForm,
    maud_conveniences::title,
    routes::all_students::render_student_form,
    state::RosterState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full flex flex-col space-y-4" {
            (title("Student Roster"))

            form id="filters" hx-get="/internal/students_table" hx-target="#students_table" hx-trigger="input, change" class="flex flex-row space-x-4" {
                input type="search" id="search" name="search" placeholder="Search by name or program..." class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
                select id="gender_filter" name="gender" class="shadow border rounded py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {
                    option value="" {"All Genders"}
                    option value="Male" {"Male"}
                    option value="Female" {"Female"}
                }
            }

            div id="table_notice" {}
            div id="students_table" hx-get="/internal/students_table" hx-include="#filters" hx-trigger="load, sse:crud_student" {}

            (render_student_form(None, &NewStudentForm::default()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::in_memory::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn page_wires_table_to_filters_and_feed() {
        let state = RosterState::from_store(Arc::new(InMemoryStore::new()));
        let page = get_index_route(State(state)).await.into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("hx-trigger=\"load, sse:crud_student\""));
        assert!(page.contains("hx-include=\"#filters\""));
        assert!(page.contains("hx-post=\"/internal/students/new\""));
        assert!(page.contains("id=\"table_notice\""));
    }

    #[tokio::test]
    async fn filter_and_form_ids_are_distinct() {
        let state = RosterState::from_store(Arc::new(InMemoryStore::new()));
        let page = get_index_route(State(state)).await.into_string();

        assert!(page.contains("id=\"gender_filter\" name=\"gender\""));
        assert_eq!(page.matches("id=\"gender\"").count(), 1);
    }
}
