// src/handlers/visit_plans.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::visit_plan::{
        CheckInPayload, CreateVisitPlanPayload, UpdateVisitPlanPayload, VisitPlanDetail,
        VisitPlanWithCustomer,
    },
};

// Filtros da listagem: dia exato OU mês (YYYY-MM). O dia ganha se os dois
// vierem juntos, como no app original.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPlansQuery {
    #[param(example = "2025-03-10")]
    pub date: Option<NaiveDate>,
    #[param(example = "2025-03")]
    pub month: Option<String>,
}

// GET /api/visit-plans
#[utoipa::path(
    get,
    path = "/api/visit-plans",
    tag = "VisitPlans",
    params(ListPlansQuery),
    responses((status = 200, description = "Planos do usuário", body = Vec<VisitPlanWithCustomer>)),
    security(("api_jwt" = []))
)]
pub async fn list_visit_plans(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListPlansQuery>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state
        .visit_plan_service
        .list(user.id, query.date, query.month.as_deref())
        .await?;
    Ok(Json(plans))
}

// GET /api/visit-plans/{id}
#[utoipa::path(
    get,
    path = "/api/visit-plans/{id}",
    tag = "VisitPlans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano com cliente e relatórios embutidos", body = VisitPlanDetail),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_visit_plan(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let plan = app_state.visit_plan_service.get(user.id, id).await?;
    Ok(Json(plan))
}

// POST /api/visit-plans
#[utoipa::path(
    post,
    path = "/api/visit-plans",
    tag = "VisitPlans",
    request_body = CreateVisitPlanPayload,
    responses(
        (status = 201, description = "Plano criado com status PENDING", body = VisitPlanWithCustomer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_visit_plan(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateVisitPlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let plan = app_state
        .visit_plan_service
        .create(user.id, payload.customer_id, payload.planned_date)
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

// PUT /api/visit-plans/{id}
#[utoipa::path(
    put,
    path = "/api/visit-plans/{id}",
    tag = "VisitPlans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    request_body = UpdateVisitPlanPayload,
    responses(
        (status = 200, description = "Plano atualizado", body = VisitPlanWithCustomer),
        (status = 400, description = "Transição de status inválida"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_visit_plan(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVisitPlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let plan = app_state.visit_plan_service.update(user.id, id, &payload).await?;
    Ok(Json(plan))
}

// DELETE /api/visit-plans/{id}
#[utoipa::path(
    delete,
    path = "/api/visit-plans/{id}",
    tag = "VisitPlans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano removido"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_visit_plan(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.visit_plan_service.delete(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// POST /api/visit-plans/{id}/check-in
#[utoipa::path(
    post,
    path = "/api/visit-plans/{id}/check-in",
    tag = "VisitPlans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    request_body = CheckInPayload,
    responses(
        (status = 200, description = "Plano transicionado para CHECKED_IN", body = VisitPlanWithCustomer),
        (status = 400, description = "Transição inválida ou fora do geofence"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_in_visit_plan(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckInPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let plan = app_state.visit_plan_service.check_in(user.id, id, &payload).await?;
    Ok(Json(plan))
}
