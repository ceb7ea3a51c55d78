// src/handlers/visit_reports.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::visit_report::{
        CreateVisitReportPayload, UpdateVisitReportPayload, VisitReportWithRelations,
    },
};

// GET /api/visit-reports
#[utoipa::path(
    get,
    path = "/api/visit-reports",
    tag = "VisitReports",
    responses((status = 200, description = "Relatórios com cliente e plano embutidos", body = Vec<VisitReportWithRelations>)),
    security(("api_jwt" = []))
)]
pub async fn list_visit_reports(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    // Escopo por dono só quando a flag de política pede.
    let owner = app_state.policy.scope_reports_to_owner.then_some(user.id);
    let reports = app_state.visit_report_service.list(owner).await?;
    Ok(Json(reports))
}

// GET /api/visit-reports/{id}
#[utoipa::path(
    get,
    path = "/api/visit-reports/{id}",
    tag = "VisitReports",
    params(("id" = Uuid, Path, description = "ID do relatório")),
    responses(
        (status = 200, description = "Relatório", body = VisitReportWithRelations),
        (status = 404, description = "Relatório não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_visit_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let owner = app_state.policy.scope_reports_to_owner.then_some(user.id);
    let report = app_state.visit_report_service.get(id, owner).await?;
    Ok(Json(report))
}

// POST /api/visit-reports
#[utoipa::path(
    post,
    path = "/api/visit-reports",
    tag = "VisitReports",
    request_body = CreateVisitReportPayload,
    responses(
        (status = 201, description = "Relatório criado", body = VisitReportWithRelations),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_visit_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateVisitReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state.visit_report_service.create(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

// PUT /api/visit-reports/{id}
#[utoipa::path(
    put,
    path = "/api/visit-reports/{id}",
    tag = "VisitReports",
    params(("id" = Uuid, Path, description = "ID do relatório")),
    request_body = UpdateVisitReportPayload,
    responses(
        (status = 200, description = "Relatório atualizado", body = VisitReportWithRelations),
        (status = 404, description = "Relatório não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_visit_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVisitReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let owner = app_state.policy.scope_reports_to_owner.then_some(user.id);
    let report = app_state.visit_report_service.update(id, owner, &payload).await?;
    Ok(Json(report))
}

// DELETE /api/visit-reports/{id}
#[utoipa::path(
    delete,
    path = "/api/visit-reports/{id}",
    tag = "VisitReports",
    params(("id" = Uuid, Path, description = "ID do relatório")),
    responses(
        (status = 200, description = "Relatório removido"),
        (status = 404, description = "Relatório não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_visit_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let owner = app_state.policy.scope_reports_to_owner.then_some(user.id);
    app_state.visit_report_service.delete(id, owner).await?;
    Ok(Json(json!({ "success": true })))
}
