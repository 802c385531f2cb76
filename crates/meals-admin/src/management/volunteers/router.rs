use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{VolunteerDraft, VolunteerId};
use super::repository::{AccountNotifier, VolunteerRepository};
use super::service::{VolunteerService, VolunteerServiceError};
use crate::management::assignments::{AssignmentRepository, MonthQuery};

/// Router builder exposing the volunteer management endpoints.
pub fn volunteer_router<V, A, N>(service: Arc<VolunteerService<V, A, N>>) -> Router
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/volunteers",
            get(list_handler::<V, A, N>).post(create_handler::<V, A, N>),
        )
        .route("/api/v1/volunteers/export", get(export_handler::<V, A, N>))
        .route(
            "/api/v1/volunteers/:volunteer_id",
            get(detail_handler::<V, A, N>)
                .put(update_handler::<V, A, N>)
                .delete(delete_handler::<V, A, N>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/records",
            post(record_handler::<V, A, N>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/assignments",
            get(assignments_handler::<V, A, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordJobRequest {
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) description: String,
}

fn error_response(err: VolunteerServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status(), Json(payload)).into_response()
}

pub(crate) async fn list_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    match service.list() {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Json(draft): Json<VolunteerDraft>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    let today = Local::now().date_naive();
    match service.create(draft, today) {
        Ok(volunteer) => (StatusCode::CREATED, Json(volunteer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Path(volunteer_id): Path<u64>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    match service.get(VolunteerId(volunteer_id)) {
        Ok(volunteer) => (StatusCode::OK, Json(volunteer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Path(volunteer_id): Path<u64>,
    Json(draft): Json<VolunteerDraft>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    match service.update(VolunteerId(volunteer_id), draft) {
        Ok(volunteer) => (StatusCode::OK, Json(volunteer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Path(volunteer_id): Path<u64>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    match service.delete(VolunteerId(volunteer_id)) {
        Ok(released) => {
            let payload = json!({
                "deleted": volunteer_id,
                "released_assignments": released,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn record_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Path(volunteer_id): Path<u64>,
    Json(request): Json<RecordJobRequest>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    let date = request
        .date
        .unwrap_or_else(|| Local::now().date_naive());
    match service.record_job(VolunteerId(volunteer_id), date, request.description) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn assignments_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
    Path(volunteer_id): Path<u64>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    let today = Local::now().date_naive();
    match service.assignments_for(VolunteerId(volunteer_id), query.month, today) {
        Ok(scheduled) => (StatusCode::OK, Json(scheduled)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<V, A, N>(
    State(service): State<Arc<VolunteerService<V, A, N>>>,
) -> Response
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    match service.export(Local::now().naive_local()) {
        Ok(export) => {
            let disposition = export.content_disposition();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, super::VolunteerExport::CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.body,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}
