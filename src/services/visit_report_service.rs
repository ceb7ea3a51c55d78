// src/services/visit_report_service.rs

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, VisitPlanRepository, VisitReportRepository},
    models::{
        customer::Customer,
        visit_plan::VisitPlanWithCustomer,
        visit_report::{
            CreateVisitReportPayload, UpdateVisitReportPayload, VisitReport,
            VisitReportWithRelations,
        },
    },
};

// Relatórios de visita. Toda resposta sai com as relações embutidas:
// o cliente e o plano de origem (este com o próprio cliente dentro).
#[derive(Clone)]
pub struct VisitReportService {
    repo: VisitReportRepository,
    customer_repo: CustomerRepository,
    plan_repo: VisitPlanRepository,
}

impl VisitReportService {
    pub fn new(
        repo: VisitReportRepository,
        customer_repo: CustomerRepository,
        plan_repo: VisitPlanRepository,
    ) -> Self {
        Self { repo, customer_repo, plan_repo }
    }

    pub async fn list(
        &self,
        owner: Option<Uuid>,
    ) -> Result<Vec<VisitReportWithRelations>, AppError> {
        let reports = self.repo.list(owner).await?;
        self.embed_relations(reports).await
    }

    pub async fn get(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<VisitReportWithRelations, AppError> {
        let report = self
            .repo
            .find(id, owner)
            .await?
            .ok_or(AppError::NotFound("Relatório de visita"))?;
        self.embed_one(report).await
    }

    pub async fn create(
        &self,
        owner: Uuid,
        payload: &CreateVisitReportPayload,
    ) -> Result<VisitReportWithRelations, AppError> {
        let report = self.repo.create(owner, payload).await?;
        self.embed_one(report).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        payload: &UpdateVisitReportPayload,
    ) -> Result<VisitReportWithRelations, AppError> {
        let report = self
            .repo
            .update(id, owner, payload)
            .await?
            .ok_or(AppError::NotFound("Relatório de visita"))?;
        self.embed_one(report).await
    }

    pub async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<(), AppError> {
        if !self.repo.delete(id, owner).await? {
            return Err(AppError::NotFound("Relatório de visita"));
        }
        Ok(())
    }

    async fn embed_one(
        &self,
        report: VisitReport,
    ) -> Result<VisitReportWithRelations, AppError> {
        self.embed_relations(vec![report])
            .await?
            .pop()
            .ok_or(AppError::NotFound("Relatório de visita"))
    }

    // Duas buscas em lote (planos e clientes) em vez de N+1 nas listagens.
    async fn embed_relations(
        &self,
        reports: Vec<VisitReport>,
    ) -> Result<Vec<VisitReportWithRelations>, AppError> {
        let mut plan_ids: Vec<Uuid> = reports.iter().map(|r| r.visit_plan_id).collect();
        plan_ids.sort_unstable();
        plan_ids.dedup();
        let plans = self.plan_repo.find_by_ids(&plan_ids).await?;

        let mut customer_ids: Vec<Uuid> = reports
            .iter()
            .map(|r| r.customer_id)
            .chain(plans.iter().map(|p| p.customer_id))
            .collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();

        let customers: HashMap<Uuid, Customer> = self
            .customer_repo
            .find_by_ids(&customer_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let plans: HashMap<Uuid, VisitPlanWithCustomer> = plans
            .into_iter()
            .map(|plan| {
                let customer = customers.get(&plan.customer_id).cloned();
                (plan.id, VisitPlanWithCustomer { plan, customer })
            })
            .collect();

        Ok(reports
            .into_iter()
            .map(|report| {
                let customer = customers.get(&report.customer_id).cloned();
                let visit_plan = plans.get(&report.visit_plan_id).cloned();
                VisitReportWithRelations { report, customer, visit_plan }
            })
            .collect())
    }
}
