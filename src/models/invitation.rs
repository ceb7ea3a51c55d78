// src/models/invitation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

// Convite de registro: um token de uso único, com prazo, amarrado a um
// e-mail e a um papel pré-definido.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub role: Role,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationValidity {
    Valid,
    AlreadyAccepted,
    Expired,
}

impl Invitation {
    // Um convite só vale enquanto não foi aceito e não venceu.
    // A aceitação tem precedência sobre o vencimento na mensagem de erro.
    pub fn validity_at(&self, now: DateTime<Utc>) -> InvitationValidity {
        if self.accepted_at.is_some() {
            InvitationValidity::AlreadyAccepted
        } else if self.expires_at < now {
            InvitationValidity::Expired
        } else {
            InvitationValidity::Valid
        }
    }
}

// Resumo público de quem convidou, embutido na listagem do admin.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviterSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationWithInviter {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub invited_by_user: InviterSummary,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "user2@example.com")]
    pub email: String,

    // Papel atribuído no registro; USER quando omitido.
    pub role: Option<Role>,
}

// Resposta do POST: o convite + a URL pronta para envio.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitation {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub invite_url: String,
}

// Resposta do verify público.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyInvitationResponse {
    pub valid: bool,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn convite(accepted: Option<DateTime<Utc>>, expires: DateTime<Utc>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            email: "user2@example.com".into(),
            token: Uuid::new_v4().to_string(),
            role: Role::Manager,
            invited_by: Uuid::new_v4(),
            expires_at: expires,
            accepted_at: accepted,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn convite_dentro_do_prazo_e_valido() {
        let now = Utc::now();
        let inv = convite(None, now + Duration::days(7));
        assert_eq!(inv.validity_at(now), InvitationValidity::Valid);
    }

    #[test]
    fn convite_aceito_nao_vale_de_novo() {
        let now = Utc::now();
        let inv = convite(Some(now - Duration::hours(1)), now + Duration::days(7));
        assert_eq!(inv.validity_at(now), InvitationValidity::AlreadyAccepted);
    }

    #[test]
    fn convite_vencido_e_rejeitado() {
        let now = Utc::now();
        let inv = convite(None, now - Duration::seconds(1));
        assert_eq!(inv.validity_at(now), InvitationValidity::Expired);
    }

    #[test]
    fn aceitacao_tem_precedencia_sobre_vencimento() {
        let now = Utc::now();
        let inv = convite(Some(now - Duration::days(10)), now - Duration::days(9));
        assert_eq!(inv.validity_at(now), InvitationValidity::AlreadyAccepted);
    }
}
