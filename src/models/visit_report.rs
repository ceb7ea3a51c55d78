// src/models/visit_report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::Customer;
use crate::models::visit_plan::VisitPlanWithCustomer;

// Relatório preenchido após a visita. Os anexos são data URIs, como o app
// manda, guardados em TEXT[].
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub id: Uuid,
    pub visit_plan_id: Uuid,
    pub customer_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub communication_points: String,
    pub customer_feedback: String,
    pub follow_up_tasks: String,
    pub attachments: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Relatório com as relações embutidas, como o app consome: o cliente e o
// plano de origem (este com o próprio cliente dentro).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitReportWithRelations {
    #[serde(flatten)]
    pub report: VisitReport,
    pub customer: Option<Customer>,
    pub visit_plan: Option<VisitPlanWithCustomer>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitReportPayload {
    pub visit_plan_id: Uuid,
    pub customer_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub communication_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub follow_up_tasks: Option<String>,
    pub attachments: Option<Vec<String>>,
}

// Campos permitidos no update (lista explícita)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitReportPayload {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub communication_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub follow_up_tasks: Option<String>,
    pub attachments: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visit_plan::{VisitPlan, VisitStatus};
    use chrono::NaiveDate;

    fn cliente(id: Uuid) -> Customer {
        Customer {
            id,
            name: "Mercado Central".into(),
            phone: "13800138000".into(),
            address: "Rua A, 1".into(),
            latitude: None,
            longitude: None,
            notes: String::new(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plano(id: Uuid, customer_id: Uuid) -> VisitPlan {
        VisitPlan {
            id,
            customer_id,
            planned_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            status: VisitStatus::Completed,
            check_in_time: None,
            check_in_latitude: None,
            check_in_longitude: None,
            check_in_photo_url: None,
            check_in_notes: None,
            check_out_time: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn relatorio(visit_plan_id: Uuid, customer_id: Uuid) -> VisitReport {
        VisitReport {
            id: Uuid::new_v4(),
            visit_plan_id,
            customer_id,
            start_time: Utc::now(),
            end_time: Utc::now(),
            communication_points: "Apresentação da linha nova".into(),
            customer_feedback: String::new(),
            follow_up_tasks: String::new(),
            attachments: vec![],
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resposta_embute_cliente_e_plano() {
        let customer_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let customer = cliente(customer_id);
        let plan = plano(plan_id, customer_id);

        let embutido = VisitReportWithRelations {
            report: relatorio(plan_id, customer_id),
            customer: Some(customer.clone()),
            visit_plan: Some(VisitPlanWithCustomer { plan, customer: Some(customer) }),
        };

        let v = serde_json::to_value(&embutido).unwrap();
        // Campos do relatório achatados na raiz
        assert_eq!(v["communicationPoints"], "Apresentação da linha nova");
        // Relações embutidas, o plano com o próprio cliente dentro
        assert_eq!(v["customer"]["name"], "Mercado Central");
        assert_eq!(v["visitPlan"]["status"], "COMPLETED");
        assert_eq!(v["visitPlan"]["customer"]["id"], customer_id.to_string());
    }

    #[test]
    fn relacoes_ausentes_viram_null() {
        let embutido = VisitReportWithRelations {
            report: relatorio(Uuid::new_v4(), Uuid::new_v4()),
            customer: None,
            visit_plan: None,
        };

        let v = serde_json::to_value(&embutido).unwrap();
        assert!(v["customer"].is_null());
        assert!(v["visitPlan"].is_null());
    }
}
