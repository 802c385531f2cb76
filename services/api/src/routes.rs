use crate::infra::{deserialize_optional_date, AppState, Stores};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Datelike, Local, NaiveDate};
use meals_admin::management::assignments::assignment_router;
use meals_admin::management::customers::customer_router;
use meals_admin::management::volunteers::volunteer_router;
use meals_admin::schedule::RecurrenceRule;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveDayQuery {
    pub(crate) week_of_month: i32,
    pub(crate) day_of_week: i32,
    #[serde(default)]
    pub(crate) month: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResolveDayResponse {
    pub(crate) week_of_month: i32,
    pub(crate) day_of_week: i32,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) occurs: bool,
    pub(crate) day: Option<u32>,
    pub(crate) date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
}

pub(crate) fn with_management_routes(stores: &Stores) -> axum::Router {
    volunteer_router(stores.volunteers.clone())
        .merge(assignment_router(stores.assignments.clone()))
        .merge(customer_router(stores.customers.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/schedule/resolve",
            axum::routing::get(resolve_day_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Resolves a recurrence for the requested month; unresolvable input answers `occurs: false`.
pub(crate) async fn resolve_day_endpoint(
    Query(query): Query<ResolveDayQuery>,
) -> Json<ResolveDayResponse> {
    let today = query
        .today
        .unwrap_or_else(|| Local::now().date_naive());
    let rule = RecurrenceRule::new(query.week_of_month, query.day_of_week);
    let result = rule.try_resolve(query.month, today);

    Json(ResolveDayResponse {
        week_of_month: query.week_of_month,
        day_of_week: query.day_of_week,
        year: today.year(),
        month: query.month.unwrap_or_else(|| today.month()),
        occurs: result.is_ok(),
        day: result.as_ref().ok().copied(),
        date: rule.resolve_date(query.month, today),
        reason: result.err().map(|err| err.to_string()),
    })
}
