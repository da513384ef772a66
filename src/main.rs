#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    routes::{
        all_students::{
            internal_delete_student, internal_get_students_table, internal_post_new_student,
        },
        import_export::{get_export_students_csv, get_import_export_page, put_import_students},
        index::get_index_route,
        sse::sse_feed,
        students::{delete_student, get_students, post_student},
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod state;
mod store;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

fn router(state: RosterState) -> Router {
    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        .route("/", get(get_index_route))
        .route("/students", get(get_students).post(post_student))
        .route("/students/{id}", delete(delete_student))
        .route(
            "/internal/students_table",
            get(internal_get_students_table),
        )
        .route(
            "/internal/students_table/{id}",
            delete(internal_delete_student),
        )
        .route("/internal/students/new", post(internal_post_new_student))
        .route("/import_export", get(get_import_export_page))
        .route(
            "/import_export/import_students",
            put(put_import_students),
        )
        .route(
            "/import_export/export_students.csv",
            get(get_export_students_csv),
        )
        .route("/sse_feed", get(sse_feed))
        .layer(trace_layer)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        debug!(?e, "No .env file loaded, using process environment");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let state = RosterState::new(&config);
    let app = router(state);

    let server_address = config.server_address();
    let listener = TcpListener::bind(&server_address)
        .await
        .expect("unable to listen on server address");

    info!(?server_address, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::in_memory::InMemoryStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn json_api_through_the_router() {
        let app = router(RosterState::from_store(Arc::new(InMemoryStore::new())));

        let response = send(&app, Method::GET, "/students", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert_eq!(body_json(response).await, json!([]));

        let bo = json!({"student_id": "S2", "name": "Bo"});
        let response = send(&app, Method::POST, "/students", Some(bo)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Student added successfully!"})
        );

        let response = send(&app, Method::GET, "/students", None).await;
        assert_eq!(body_json(response).await[0]["student_id"], json!("S2"));

        let response = send(&app, Method::DELETE, "/students/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Student not found"})
        );

        let response = send(&app, Method::DELETE, "/students/S2", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Student deleted successfully"})
        );
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected_by_the_router() {
        let store = Arc::new(InMemoryStore::new());
        let app = router(RosterState::from_store(store.clone()));

        for body in [json!([1]), json!({"name": ["Ann"]})] {
            let response = send(&app, Method::POST, "/students", Some(body)).await;
            assert!(response.status().is_client_error());
        }
        assert_eq!(store.contents().await, None);
    }

    #[tokio::test]
    async fn page_and_table_delete_are_routed() {
        let app = router(RosterState::from_store(Arc::new(InMemoryStore::new())));

        let response = send(&app, Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, "/internal/students_table/S404", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Student not found"));
    }
}
