use crate::core::{AggregationService, UpstreamClient};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod handlers;
mod health;

pub const API_PREFIX: &str = "/api/v1";

pub fn router<C: UpstreamClient + 'static>(service: Arc<AggregationService<C>>) -> Router {
    let employee_routes = Router::new()
        .route("/employee", get(handlers::get_all_employees::<C>))
        .route(
            "/employee/search/:search_string",
            get(handlers::search_employees_by_name::<C>),
        )
        .route("/employee/highest-salary", get(handlers::highest_salary::<C>))
        .route(
            "/employee/top-10-highest-earning",
            get(handlers::top_ten_earners::<C>),
        )
        .route("/employee/:id", get(handlers::get_employee_by_id::<C>))
        .route("/create", post(handlers::create_employee::<C>))
        .route("/deleteById/:id", delete(handlers::delete_employee_by_id::<C>))
        .with_state(service);

    Router::new()
        .nest(API_PREFIX, employee_routes)
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}
