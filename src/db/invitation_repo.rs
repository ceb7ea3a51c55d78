// src/db/invitation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        invitation::{Invitation, InvitationWithInviter, InviterSummary},
    },
};

// Linha achatada do JOIN com users, só para a listagem do admin.
#[derive(sqlx::FromRow)]
struct InvitationInviterRow {
    id: Uuid,
    email: String,
    token: String,
    role: Role,
    invited_by: Uuid,
    expires_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    inviter_name: String,
    inviter_email: String,
}

#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem do admin, com o resumo de quem convidou embutido.
    pub async fn list_with_inviter(&self) -> Result<Vec<InvitationWithInviter>, AppError> {
        let rows = sqlx::query_as::<_, InvitationInviterRow>(
            r#"
            SELECT i.id, i.email, i.token, i.role, i.invited_by,
                   i.expires_at, i.accepted_at, i.created_at,
                   u.name  AS inviter_name,
                   u.email AS inviter_email
            FROM invitations i
            JOIN users u ON u.id = i.invited_by
            ORDER BY i.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| InvitationWithInviter {
                invitation: Invitation {
                    id: r.id,
                    email: r.email,
                    token: r.token,
                    role: r.role,
                    invited_by: r.invited_by,
                    expires_at: r.expires_at,
                    accepted_at: r.accepted_at,
                    created_at: r.created_at,
                },
                invited_by_user: InviterSummary {
                    id: r.invited_by,
                    name: r.inviter_name,
                    email: r.inviter_email,
                },
            })
            .collect())
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError> {
        let invitation =
            sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(invitation)
    }

    pub async fn create(
        &self,
        email: &str,
        token: &str,
        role: Role,
        invited_by: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, AppError> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (email, token, role, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(token)
        .bind(role)
        .bind(invited_by)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(invitation)
    }

    // Marca o convite como aceito. O predicado `accepted_at IS NULL` garante
    // o consumo único mesmo com dois registros concorrentes: só um UPDATE
    // afeta a linha.
    pub async fn accept<'e, E>(&self, executor: E, token: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE invitations SET accepted_at = now() WHERE token = $1 AND accepted_at IS NULL",
        )
        .bind(token)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
