// src/models/visit_plan.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::Customer;
use crate::models::visit_report::VisitReport;

// Mapeia o CREATE TYPE visit_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "visit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Pending,
    CheckedIn,
    Completed,
    Cancelled,
}

impl VisitStatus {
    // Tabela de transições do ciclo de vida:
    // PENDING -> CHECKED_IN -> COMPLETED, com CANCELLED como saída alternativa.
    // COMPLETED e CANCELLED são terminais.
    pub fn can_transition_to(self, next: VisitStatus) -> bool {
        use VisitStatus::*;
        matches!(
            (self, next),
            (Pending, CheckedIn) | (Pending, Cancelled) | (CheckedIn, Completed) | (CheckedIn, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, VisitStatus::Completed | VisitStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPlan {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub planned_date: NaiveDate,
    pub status: VisitStatus,

    pub check_in_time: Option<DateTime<Utc>>,
    pub check_in_latitude: Option<String>,
    pub check_in_longitude: Option<String>,
    pub check_in_photo_url: Option<String>,
    pub check_in_notes: Option<String>,
    pub check_out_time: Option<DateTime<Utc>>,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Plano com o cliente embutido, como o app consome nas listagens.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPlanWithCustomer {
    #[serde(flatten)]
    pub plan: VisitPlan,
    pub customer: Option<Customer>,
}

// Detalhe de um plano: além do cliente, os relatórios já preenchidos
// para a visita.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPlanDetail {
    #[serde(flatten)]
    pub plan: VisitPlan,
    pub customer: Option<Customer>,
    pub reports: Vec<VisitReport>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitPlanPayload {
    pub customer_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub planned_date: NaiveDate,
}

// Campos permitidos no update (lista explícita). O check-out é um update
// com status COMPLETED; o carimbo de check_out_time é do serviço, não do app.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitPlanPayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub planned_date: Option<NaiveDate>,
    pub status: Option<VisitStatus>,
    pub check_in_notes: Option<String>,
}

// Evidência de chegada: coordenadas + foto carimbada + observação.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPayload {
    #[validate(length(min = 1, message = "A latitude é obrigatória."))]
    #[schema(example = "31.230412")]
    pub latitude: String,

    #[validate(length(min = 1, message = "A longitude é obrigatória."))]
    #[schema(example = "121.473698")]
    pub longitude: String,

    #[validate(length(min = 1, message = "A foto do check-in é obrigatória."))]
    pub photo_url: String,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::VisitStatus::*;
    use super::*;
    use uuid::Uuid;

    #[test]
    fn detalhe_embute_os_relatorios() {
        let plan = VisitPlan {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            planned_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            status: Pending,
            check_in_time: None,
            check_in_latitude: None,
            check_in_longitude: None,
            check_in_photo_url: None,
            check_in_notes: None,
            check_out_time: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let detalhe = VisitPlanDetail { plan, customer: None, reports: vec![] };
        let v = serde_json::to_value(&detalhe).unwrap();

        // Campos do plano achatados na raiz, relatórios sempre presentes
        assert_eq!(v["status"], "PENDING");
        assert_eq!(v["plannedDate"], "2025-03-10");
        assert!(v["reports"].as_array().is_some());
    }

    #[test]
    fn transicoes_validas() {
        assert!(Pending.can_transition_to(CheckedIn));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(CheckedIn.can_transition_to(Completed));
        assert!(CheckedIn.can_transition_to(Cancelled));
    }

    #[test]
    fn transicoes_invalidas() {
        // Sem pular o check-in nem voltar atrás.
        assert!(!Pending.can_transition_to(Completed));
        assert!(!CheckedIn.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(CheckedIn));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn estados_terminais() {
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!CheckedIn.is_terminal());
    }
}
