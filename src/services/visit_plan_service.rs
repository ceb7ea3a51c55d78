// src/services/visit_plan_service.rs

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::{error::AppError, geo},
    db::{CustomerRepository, PlanFilter, VisitPlanRepository, VisitReportRepository},
    models::visit_plan::{
        CheckInPayload, UpdateVisitPlanPayload, VisitPlan, VisitPlanDetail,
        VisitPlanWithCustomer, VisitStatus,
    },
};

// Ciclo de vida do plano de visita. O guard de transição e o geofence de
// check-in são opcionais por configuração; desligados, vale o comportamento
// leniente do app original.
#[derive(Clone)]
pub struct VisitPlanService {
    repo: VisitPlanRepository,
    customer_repo: CustomerRepository,
    report_repo: VisitReportRepository,
    enforce_transitions: bool,
    max_check_in_distance_m: Option<f64>,
}

impl VisitPlanService {
    pub fn new(
        repo: VisitPlanRepository,
        customer_repo: CustomerRepository,
        report_repo: VisitReportRepository,
        enforce_transitions: bool,
        max_check_in_distance_m: Option<f64>,
    ) -> Self {
        Self { repo, customer_repo, report_repo, enforce_transitions, max_check_in_distance_m }
    }

    pub async fn list(
        &self,
        owner: Uuid,
        date: Option<NaiveDate>,
        month: Option<&str>,
    ) -> Result<Vec<VisitPlanWithCustomer>, AppError> {
        let filter = if let Some(date) = date {
            PlanFilter::OnDate(date)
        } else if let Some(month) = month {
            let (from, to) = month_range(month)
                .ok_or_else(|| AppError::BadRequest(format!("mês inválido: {:?}", month)))?;
            PlanFilter::InRange { from, to }
        } else {
            PlanFilter::All
        };

        let plans = self.repo.list_by_owner(owner, filter).await?;
        self.embed_customers(plans).await
    }

    // Detalhe do plano: o cliente e os relatórios já preenchidos.
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<VisitPlanDetail, AppError> {
        let plan = self
            .repo
            .find_owned(owner, id)
            .await?
            .ok_or(AppError::NotFound("Plano de visita"))?;

        let customer = self.customer_repo.find_owned(plan.created_by, plan.customer_id).await?;
        let reports = self.report_repo.list_by_plan(plan.id).await?;

        Ok(VisitPlanDetail { plan, customer, reports })
    }

    pub async fn create(
        &self,
        owner: Uuid,
        customer_id: Uuid,
        planned_date: NaiveDate,
    ) -> Result<VisitPlanWithCustomer, AppError> {
        // O cliente precisa existir e ser do chamador.
        self.customer_repo
            .find_owned(owner, customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let plan = self.repo.create(owner, customer_id, planned_date).await?;
        self.embed_customer(plan).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: &UpdateVisitPlanPayload,
    ) -> Result<VisitPlanWithCustomer, AppError> {
        let current = self
            .repo
            .find_owned(owner, id)
            .await?
            .ok_or(AppError::NotFound("Plano de visita"))?;

        let mut expected_status = None;
        let mut check_out_time = None;

        if let Some(next) = payload.status {
            if self.enforce_transitions {
                if !current.status.can_transition_to(next) {
                    return Err(AppError::InvalidTransition(format!(
                        "{:?} -> {:?}",
                        current.status, next
                    )));
                }
                // O WHERE confere o status lido acima; se outra requisição
                // transicionar no meio, o update não acha a linha.
                expected_status = Some(current.status);
            }
            // Check-out: a transição para COMPLETED carimba a hora de saída.
            if next == VisitStatus::Completed {
                check_out_time = Some(Utc::now());
            }
        }

        let updated = self
            .repo
            .apply_update(
                owner,
                id,
                payload.planned_date,
                payload.status,
                payload.check_in_notes.as_deref(),
                check_out_time,
                expected_status,
            )
            .await?;

        match updated {
            Some(plan) => self.embed_customer(plan).await,
            None if expected_status.is_some() => Err(AppError::InvalidTransition(
                "o status do plano mudou, tente novamente".to_string(),
            )),
            None => Err(AppError::NotFound("Plano de visita")),
        }
    }

    // A transição de check-in: evidência de chegada (coordenadas + foto +
    // observação) aplicada de uma vez.
    pub async fn check_in(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: &CheckInPayload,
    ) -> Result<VisitPlanWithCustomer, AppError> {
        let plan = self
            .repo
            .find_owned(owner, id)
            .await?
            .ok_or(AppError::NotFound("Plano de visita"))?;

        if self.enforce_transitions && !plan.status.can_transition_to(VisitStatus::CheckedIn) {
            return Err(AppError::InvalidTransition(format!(
                "{:?} -> CheckedIn",
                plan.status
            )));
        }

        let customer = self.customer_repo.find_owned(owner, plan.customer_id).await?;

        // Geofence: com raio configurado e cliente georreferenciado, a
        // posição enviada precisa estar dentro do raio de referência.
        if let Some(max_distance) = self.max_check_in_distance_m {
            if let Some(c) = customer
                .as_ref()
                .filter(|c| c.latitude.is_some() && c.longitude.is_some())
            {
                let ref_lat = geo::parse_coordinate(c.latitude.as_deref().unwrap_or_default())?;
                let ref_lon = geo::parse_coordinate(c.longitude.as_deref().unwrap_or_default())?;
                let lat = geo::parse_coordinate(&payload.latitude)?;
                let lon = geo::parse_coordinate(&payload.longitude)?;

                let distance = geo::ensure_within_radius(ref_lat, ref_lon, lat, lon, max_distance)?;
                tracing::info!("📍 Check-in a {:.0}m do cliente (raio {:.0}m)", distance, max_distance);
            }
        }

        let expected_status = self.enforce_transitions.then_some(plan.status);

        let updated = self
            .repo
            .check_in(
                owner,
                id,
                &payload.latitude,
                &payload.longitude,
                &payload.photo_url,
                payload.notes.as_deref(),
                expected_status,
            )
            .await?;

        match updated {
            Some(plan) => Ok(VisitPlanWithCustomer { plan, customer }),
            None if expected_status.is_some() => Err(AppError::InvalidTransition(
                "o status do plano mudou, tente novamente".to_string(),
            )),
            None => Err(AppError::NotFound("Plano de visita")),
        }
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(owner, id).await? {
            return Err(AppError::NotFound("Plano de visita"));
        }
        Ok(())
    }

    async fn embed_customer(&self, plan: VisitPlan) -> Result<VisitPlanWithCustomer, AppError> {
        let customer = self.customer_repo.find_owned(plan.created_by, plan.customer_id).await?;
        Ok(VisitPlanWithCustomer { plan, customer })
    }

    // Uma busca em lote em vez de N+1 nas listagens.
    async fn embed_customers(
        &self,
        plans: Vec<VisitPlan>,
    ) -> Result<Vec<VisitPlanWithCustomer>, AppError> {
        let mut ids: Vec<Uuid> = plans.iter().map(|p| p.customer_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let customers: HashMap<Uuid, _> = self
            .customer_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(plans
            .into_iter()
            .map(|plan| {
                let customer = customers.get(&plan.customer_id).cloned();
                VisitPlanWithCustomer { plan, customer }
            })
            .collect())
    }
}

// Calcula o intervalo semiaberto [primeiro dia do mês, primeiro dia do mês
// seguinte) a partir de "YYYY-MM".
pub fn month_range(raw: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    let from = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervalo_de_um_mes_comum() {
        let (from, to) = month_range("2025-03").unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn dezembro_vira_o_ano() {
        let (from, to) = month_range("2025-12").unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn intervalo_e_semiaberto() {
        let (from, to) = month_range("2025-03").unwrap();
        let dentro = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let fora = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(dentro >= from && dentro < to);
        assert!(!(fora < to));
    }

    #[test]
    fn mes_invalido() {
        assert!(month_range("2025-13").is_none());
        assert!(month_range("2025-00").is_none());
        assert!(month_range("2025").is_none());
        assert!(month_range("marco").is_none());
        assert!(month_range("").is_none());
    }
}
