// src/handlers/invitations.rs

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
    middleware::rbac::{AdminOnly, RequireRole},
    models::invitation::{
        CreateInvitationPayload, CreatedInvitation, InvitationWithInviter,
        VerifyInvitationResponse,
    },
};

// GET /api/invitations — admin
#[utoipa::path(
    get,
    path = "/api/invitations",
    tag = "Invitations",
    responses(
        (status = 200, description = "Todos os convites, mais recentes primeiro", body = Vec<InvitationWithInviter>),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invitations(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let invitations = app_state.invitation_service.list().await?;
    Ok(Json(invitations))
}

// GET /api/invitations/verify/{token} — público (tela de cadastro)
#[utoipa::path(
    get,
    path = "/api/invitations/verify/{token}",
    tag = "Invitations",
    params(("token" = String, Path, description = "Token do convite")),
    responses(
        (status = 200, description = "Convite válido", body = VerifyInvitationResponse),
        (status = 400, description = "Convite já aceito ou expirado"),
        (status = 404, description = "Token desconhecido")
    )
)]
pub async fn verify_invitation(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state.invitation_service.verify(&token).await?;
    Ok(Json(response))
}

// POST /api/invitations — admin
#[utoipa::path(
    post,
    path = "/api/invitations",
    tag = "Invitations",
    request_body = CreateInvitationPayload,
    responses(
        (status = 201, description = "Convite criado, com a URL de cadastro", body = CreatedInvitation),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invitation(
    State(app_state): State<AppState>,
    RequireRole(admin, ..): RequireRole<AdminOnly>,
    Json(payload): Json<CreateInvitationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let created = app_state
        .invitation_service
        .create(admin.id, &payload.email, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// DELETE /api/invitations/{id} — admin
#[utoipa::path(
    delete,
    path = "/api/invitations/{id}",
    tag = "Invitations",
    params(("id" = Uuid, Path, description = "ID do convite")),
    responses(
        (status = 200, description = "Convite removido"),
        (status = 403, description = "Acesso restrito a administradores"),
        (status = 404, description = "Convite não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invitation(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.invitation_service.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
