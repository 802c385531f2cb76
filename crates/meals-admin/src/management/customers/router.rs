use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::CustomerView;
use super::repository::CustomerRepository;
use crate::management::repository::RepositoryError;

pub fn customer_router<C>(repository: Arc<C>) -> Router
where
    C: CustomerRepository + 'static,
{
    Router::new()
        .route("/api/v1/customers", get(list_handler::<C>))
        .with_state(repository)
}

fn customer_views<C: CustomerRepository>(
    repository: &C,
) -> Result<Vec<CustomerView>, RepositoryError> {
    let records = repository.records()?;
    let mut customers = repository.customers()?;
    customers.sort_by_key(|customer| customer.id);

    Ok(customers
        .into_iter()
        .map(|customer| {
            let records = records
                .iter()
                .filter(|record| record.customer == customer.id)
                .cloned()
                .collect();
            CustomerView { customer, records }
        })
        .collect())
}

pub(crate) async fn list_handler<C>(State(repository): State<Arc<C>>) -> Response
where
    C: CustomerRepository + 'static,
{
    match customer_views(repository.as_ref()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
