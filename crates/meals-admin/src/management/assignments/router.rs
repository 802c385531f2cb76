use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::AssignmentDraft;
use super::repository::AssignmentRepository;
use super::service::{AssignmentService, AssignmentServiceError};
use crate::management::volunteers::VolunteerRepository;

/// Optional `?month=` filter; the current month applies when absent.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
}

/// Router builder exposing assignment creation and the monthly schedule.
pub fn assignment_router<A, V>(service: Arc<AssignmentService<A, V>>) -> Router
where
    A: AssignmentRepository + 'static,
    V: VolunteerRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assignments",
            get(list_handler::<A, V>).post(create_handler::<A, V>),
        )
        .route("/api/v1/assignments/schedule", get(schedule_handler::<A, V>))
        .with_state(service)
}

fn error_response(err: AssignmentServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status(), Json(payload)).into_response()
}

pub(crate) async fn list_handler<A, V>(
    State(service): State<Arc<AssignmentService<A, V>>>,
) -> Response
where
    A: AssignmentRepository + 'static,
    V: VolunteerRepository + 'static,
{
    match service.list() {
        Ok(assignments) => (StatusCode::OK, Json(assignments)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<A, V>(
    State(service): State<Arc<AssignmentService<A, V>>>,
    Json(draft): Json<AssignmentDraft>,
) -> Response
where
    A: AssignmentRepository + 'static,
    V: VolunteerRepository + 'static,
{
    match service.create(draft) {
        Ok(assignment) => (StatusCode::CREATED, Json(assignment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn schedule_handler<A, V>(
    State(service): State<Arc<AssignmentService<A, V>>>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    A: AssignmentRepository + 'static,
    V: VolunteerRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.schedule(query.month, today) {
        Ok(scheduled) => (StatusCode::OK, Json(scheduled)).into_response(),
        Err(err) => error_response(err),
    }
}
