// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{InvitationRepository, UserRepository},
    models::{
        auth::{AuthResponse, Claims, Role, User},
        invitation::InvitationValidity,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    invitation_repo: InvitationRepository,
    jwt_secret: String,
    token_validity: Duration,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        invitation_repo: InvitationRepository,
        jwt_secret: String,
        token_validity: Duration,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, invitation_repo, jwt_secret, token_validity, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        invitation_token: Option<&str>,
    ) -> Result<AuthResponse, AppError> {
        // 1. Convite (quando informado) decide o papel do novo usuário.
        //    Qualquer violação interrompe antes de tocar na tabela users.
        let role = match invitation_token {
            Some(token) => {
                let invitation = self
                    .invitation_repo
                    .find_by_token(token)
                    .await?
                    .ok_or(AppError::InvalidInvitation("Token de convite inválido."))?;

                match invitation.validity_at(Utc::now()) {
                    InvitationValidity::AlreadyAccepted => {
                        return Err(AppError::InvalidInvitation("Este convite já foi aceito."));
                    }
                    InvitationValidity::Expired => {
                        return Err(AppError::InvalidInvitation("Este convite expirou."));
                    }
                    InvitationValidity::Valid => {}
                }

                if invitation.email != email {
                    return Err(AppError::InvalidInvitation(
                        "O e-mail não corresponde ao convite.",
                    ));
                }

                invitation.role
            }
            None => Role::User,
        };

        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // 2. Hashing fora da transação (não toca no banco)
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 3. Usuário + aceite do convite na mesma transação: um registro que
        //    falha no meio não cria usuário nem queima o convite.
        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(&mut *tx, email, &password_hash, name, role)
            .await?;

        if let Some(token) = invitation_token {
            let consumed = self.invitation_repo.accept(&mut *tx, token).await?;
            if !consumed {
                // Outro registro aceitou o convite entre a checagem e aqui;
                // o rollback desfaz o usuário criado acima.
                return Err(AppError::InvalidInvitation("Este convite já foi aceito."));
            }
        }

        tx.commit().await?;

        tracing::info!("👤 Novo usuário registrado: {} ({:?})", user.email, user.role);

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        // O mesmo erro para e-mail desconhecido e senha errada: a resposta
        // não revela se o cadastro existe.
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::NotFound("Usuário"))
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        issue_token(&self.jwt_secret, user, self.token_validity)
    }
}

// Emite um JWT HS256 com id, e-mail e papel do usuário nas claims.
pub fn issue_token(secret: &str, user: &User, validity: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + validity;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn usuario(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "maria@example.com".into(),
            password_hash: "$2b$10$hash".into(),
            name: "Maria".into(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_carrega_o_papel_do_usuario() {
        let user = usuario(Role::Manager);
        let token = issue_token("segredo-de-teste", &user, Duration::days(7)).unwrap();
        let claims = decode_token("segredo-de-teste", &token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Manager);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_expirado_e_rejeitado() {
        let user = usuario(Role::User);
        // Validade negativa além da folga padrão de 60s do jsonwebtoken.
        let token = issue_token("segredo-de-teste", &user, Duration::seconds(-120)).unwrap();
        assert!(matches!(
            decode_token("segredo-de-teste", &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn token_com_segredo_errado_e_rejeitado() {
        let user = usuario(Role::Admin);
        let token = issue_token("segredo-de-teste", &user, Duration::days(1)).unwrap();
        assert!(matches!(
            decode_token("outro-segredo", &token),
            Err(AppError::InvalidToken)
        ));
    }
}
