// src/config.rs

use chrono::Duration;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;

use crate::{
    db::{
        ArticleRepository, CustomerRepository, InvitationRepository, UserRepository,
        VisitPlanRepository, VisitReportRepository,
    },
    services::{
        auth::AuthService, invitation_service::InvitationService,
        visit_plan_service::VisitPlanService, visit_report_service::VisitReportService,
    },
};

// Flags de política que o spec deixa explícitas em vez de chutar:
// o guard de transição de status e o escopo por dono nas leituras de
// relatórios e artigos.
#[derive(Clone, Copy, Debug)]
pub struct PolicyFlags {
    pub enforce_status_transitions: bool,
    pub scope_reports_to_owner: bool,
    pub scope_articles_to_owner: bool,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub policy: PolicyFlags,
    pub allowed_origins: Vec<String>,

    pub auth_service: AuthService,
    pub visit_plan_service: VisitPlanService,
    pub visit_report_service: VisitReportService,
    pub invitation_service: InvitationService,

    pub customer_repo: CustomerRepository,
    pub article_repo: ArticleRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let token_validity = env_duration("JWT_EXPIRES_IN", Duration::days(7));
        let invitation_validity = env_duration("INVITATION_EXPIRES_IN", Duration::days(7));

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // Allow-list de CORS: origens de dev + o frontend configurado.
        let mut allowed_origins = vec![
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string(),
        ];
        if !allowed_origins.contains(&frontend_url) {
            allowed_origins.push(frontend_url.clone());
        }

        // Raio máximo do geofence de check-in. Sem a variável, o guard fica
        // desligado (comportamento original do app).
        let check_in_max_distance_m = env::var("CHECK_IN_MAX_DISTANCE_METERS")
            .ok()
            .map(|raw| {
                raw.parse::<f64>()
                    .expect("CHECK_IN_MAX_DISTANCE_METERS deve ser um número em metros")
            });

        let policy = PolicyFlags {
            enforce_status_transitions: env_flag("ENFORCE_STATUS_TRANSITIONS", true),
            scope_reports_to_owner: env_flag("SCOPE_REPORTS_TO_OWNER", false),
            scope_articles_to_owner: env_flag("SCOPE_ARTICLES_TO_OWNER", false),
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let visit_plan_repo = VisitPlanRepository::new(db_pool.clone());
        let visit_report_repo = VisitReportRepository::new(db_pool.clone());
        let article_repo = ArticleRepository::new(db_pool.clone());
        let invitation_repo = InvitationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            invitation_repo.clone(),
            jwt_secret,
            token_validity,
            db_pool.clone(),
        );
        let visit_plan_service = VisitPlanService::new(
            visit_plan_repo.clone(),
            customer_repo.clone(),
            visit_report_repo.clone(),
            policy.enforce_status_transitions,
            check_in_max_distance_m,
        );
        let visit_report_service =
            VisitReportService::new(visit_report_repo, customer_repo.clone(), visit_plan_repo);
        let invitation_service =
            InvitationService::new(invitation_repo, frontend_url, invitation_validity);

        Ok(Self {
            db_pool,
            policy,
            allowed_origins,
            auth_service,
            visit_plan_service,
            visit_report_service,
            invitation_service,
            customer_repo,
            article_repo,
        })
    }
}

// Interpreta durações no formato do .env original: "7d", "12h", "30m" ou
// segundos puros ("3600").
pub fn parse_duration_spec(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (number, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
        _ => (raw, None),
    };

    let value: i64 = number.trim().parse().ok()?;
    if value < 0 {
        return None;
    }

    match unit {
        Some('d') => Some(Duration::days(value)),
        Some('h') => Some(Duration::hours(value)),
        Some('m') => Some(Duration::minutes(value)),
        Some('s') | None => Some(Duration::seconds(value)),
        _ => None,
    }
}

fn env_duration(name: &str, default: Duration) -> Duration {
    match env::var(name) {
        Ok(raw) => parse_duration_spec(&raw)
            .unwrap_or_else(|| panic!("{} inválida: {:?}", name, raw)),
        Err(_) => default,
    }
}

// Valor definido mas irreconhecível derruba a inicialização, como nas
// durações: um typo não pode desligar uma política em silêncio.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => {
            parse_flag(&raw).unwrap_or_else(|| panic!("{} inválida: {:?}", name, raw))
        }
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duracao_em_dias_horas_minutos() {
        assert_eq!(parse_duration_spec("7d"), Some(Duration::days(7)));
        assert_eq!(parse_duration_spec("12h"), Some(Duration::hours(12)));
        assert_eq!(parse_duration_spec("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_duration_spec("45s"), Some(Duration::seconds(45)));
    }

    #[test]
    fn duracao_em_segundos_puros() {
        assert_eq!(parse_duration_spec("3600"), Some(Duration::seconds(3600)));
    }

    #[test]
    fn flag_reconhece_as_duas_direcoes() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
    }

    #[test]
    fn flag_irreconhecivel_nao_vira_false() {
        // "on" não pode desligar uma política que por padrão é estrita.
        assert_eq!(parse_flag("on"), None);
        assert_eq!(parse_flag("enabled"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn duracao_invalida() {
        assert_eq!(parse_duration_spec(""), None);
        assert_eq!(parse_duration_spec("d"), None);
        assert_eq!(parse_duration_spec("7w"), None);
        assert_eq!(parse_duration_spec("-1d"), None);
        assert_eq!(parse_duration_spec("sete"), None);
    }
}
