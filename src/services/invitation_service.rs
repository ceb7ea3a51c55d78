// src/services/invitation_service.rs

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvitationRepository,
    models::{
        auth::Role,
        invitation::{
            CreatedInvitation, InvitationValidity, InvitationWithInviter,
            VerifyInvitationResponse,
        },
    },
};

#[derive(Clone)]
pub struct InvitationService {
    repo: InvitationRepository,
    frontend_url: String,
    validity: Duration,
}

impl InvitationService {
    pub fn new(repo: InvitationRepository, frontend_url: String, validity: Duration) -> Self {
        Self { repo, frontend_url, validity }
    }

    pub async fn list(&self) -> Result<Vec<InvitationWithInviter>, AppError> {
        self.repo.list_with_inviter().await
    }

    pub async fn create(
        &self,
        invited_by: Uuid,
        email: &str,
        role: Option<Role>,
    ) -> Result<CreatedInvitation, AppError> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.validity;

        let invitation = self
            .repo
            .create(email, &token, role.unwrap_or(Role::User), invited_by, expires_at)
            .await?;

        tracing::info!("✉️ Convite criado para {} ({:?})", invitation.email, invitation.role);

        // URL pronta para envio, apontando para a tela de cadastro do app.
        let invite_url = format!("{}/signup?token={}", self.frontend_url, token);
        Ok(CreatedInvitation { invitation, invite_url })
    }

    // Verificação pública usada pela tela de cadastro: token desconhecido é
    // 404; aceito ou vencido é 400 com a razão.
    pub async fn verify(&self, token: &str) -> Result<VerifyInvitationResponse, AppError> {
        let invitation = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::NotFound("Convite"))?;

        match invitation.validity_at(Utc::now()) {
            InvitationValidity::AlreadyAccepted => {
                Err(AppError::InvalidInvitation("Este convite já foi aceito."))
            }
            InvitationValidity::Expired => {
                Err(AppError::InvalidInvitation("Este convite expirou."))
            }
            InvitationValidity::Valid => Ok(VerifyInvitationResponse {
                valid: true,
                email: invitation.email,
                role: invitation.role,
            }),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Convite"));
        }
        Ok(())
    }
}
