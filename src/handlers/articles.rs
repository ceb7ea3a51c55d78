// src/handlers/articles.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{ManagerOrAdmin, RequireRole},
    },
    models::article::{Article, CreateArticlePayload, UpdateArticlePayload},
};

// GET /api/articles
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "Articles",
    responses((status = 200, description = "Artigos publicados", body = Vec<Article>)),
    security(("api_jwt" = []))
)]
pub async fn list_articles(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let owner = app_state.policy.scope_articles_to_owner.then_some(user.id);
    let articles = app_state.article_repo.list(owner).await?;
    Ok(Json(articles))
}

// GET /api/articles/{id}
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "ID do artigo")),
    responses(
        (status = 200, description = "Artigo", body = Article),
        (status = 404, description = "Artigo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_article(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let owner = app_state.policy.scope_articles_to_owner.then_some(user.id);
    let article = app_state
        .article_repo
        .find(id, owner)
        .await?
        .ok_or(AppError::NotFound("Artigo"))?;
    Ok(Json(article))
}

// POST /api/articles — publicação é tarefa de gerente/admin.
#[utoipa::path(
    post,
    path = "/api/articles",
    tag = "Articles",
    request_body = CreateArticlePayload,
    responses(
        (status = 201, description = "Artigo criado", body = Article),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_article(
    State(app_state): State<AppState>,
    RequireRole(user, ..): RequireRole<ManagerOrAdmin>,
    Json(payload): Json<CreateArticlePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let article = app_state
        .article_repo
        .create(user.id, &payload.title, payload.content.as_deref().unwrap_or(""))
        .await?;

    Ok((StatusCode::CREATED, Json(article)))
}

// PUT /api/articles/{id}
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "ID do artigo")),
    request_body = UpdateArticlePayload,
    responses(
        (status = 200, description = "Artigo atualizado", body = Article),
        (status = 403, description = "Papel insuficiente"),
        (status = 404, description = "Artigo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_article(
    State(app_state): State<AppState>,
    _role: RequireRole<ManagerOrAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticlePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let article = app_state
        .article_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::NotFound("Artigo"))?;
    Ok(Json(article))
}

// DELETE /api/articles/{id}
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    tag = "Articles",
    params(("id" = Uuid, Path, description = "ID do artigo")),
    responses(
        (status = 200, description = "Artigo removido"),
        (status = 403, description = "Papel insuficiente"),
        (status = 404, description = "Artigo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_article(
    State(app_state): State<AppState>,
    _role: RequireRole<ManagerOrAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.article_repo.delete(id).await? {
        return Err(AppError::NotFound("Artigo"));
    }
    Ok(Json(json!({ "success": true })))
}
