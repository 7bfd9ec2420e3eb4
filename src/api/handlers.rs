use crate::core::{AggregationService, FieldBag, UpstreamClient, TOP_EARNERS_LIMIT};
use crate::domain::model::EmployeeRecord;
use crate::utils::error::FacadeError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

type Service<C> = State<Arc<AggregationService<C>>>;
type ApiResult<T> = Result<T, FacadeError>;

#[tracing::instrument(skip(service))]
pub async fn get_all_employees<C: UpstreamClient>(
    State(service): Service<C>,
) -> ApiResult<Json<Vec<EmployeeRecord>>> {
    tracing::info!("calling api to get all employees");
    Ok(Json(service.list_all().await?))
}

#[tracing::instrument(skip(service))]
pub async fn search_employees_by_name<C: UpstreamClient>(
    State(service): Service<C>,
    Path(search_string): Path<String>,
) -> ApiResult<Json<Vec<EmployeeRecord>>> {
    tracing::info!("calling api to get employees whose name contains: {}", search_string);
    Ok(Json(service.search_by_name_substring(&search_string).await?))
}

#[tracing::instrument(skip(service))]
pub async fn get_employee_by_id<C: UpstreamClient>(
    State(service): Service<C>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmployeeRecord>> {
    tracing::info!("calling api to get employee with id: {}", id);
    Ok(Json(service.get_by_id(&id).await?))
}

#[tracing::instrument(skip(service))]
pub async fn highest_salary<C: UpstreamClient>(State(service): Service<C>) -> ApiResult<Json<i32>> {
    tracing::info!("calling api to get highest salary among all employees");
    Ok(Json(service.highest_salary().await?))
}

#[tracing::instrument(skip(service))]
pub async fn top_ten_earners<C: UpstreamClient>(
    State(service): Service<C>,
) -> ApiResult<Json<Vec<String>>> {
    tracing::info!("calling api to get top ten highest salaried employees");
    Ok(Json(service.top_earning_names(TOP_EARNERS_LIMIT).await?))
}

/// 請求主體必須是 JSON 物件；其他形狀屬於未分類錯誤
#[tracing::instrument(skip_all)]
pub async fn create_employee<C: UpstreamClient>(
    State(service): Service<C>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmployeeRecord>)> {
    tracing::info!("calling api to create employee");

    let Json(body) = body.map_err(|rejection| FacadeError::Unexpected {
        message: format!("unreadable create request body: {}", rejection.body_text()),
    })?;

    let fields = FieldBag::from_json(&body).ok_or_else(|| FacadeError::Unexpected {
        message: "create request body is not a JSON object".to_string(),
    })?;

    let created = service.create(&fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(skip(service))]
pub async fn delete_employee_by_id<C: UpstreamClient>(
    State(service): Service<C>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    tracing::info!("calling api to delete employee with id: {}", id);
    service.delete_by_id(&id).await
}
