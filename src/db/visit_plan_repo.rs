// src/db/visit_plan_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::visit_plan::{VisitPlan, VisitStatus},
};

// Filtro da listagem: tudo, um dia exato ou um intervalo semiaberto
// [from, to) calculado a partir de ?month=YYYY-MM.
#[derive(Debug, Clone, Copy)]
pub enum PlanFilter {
    All,
    OnDate(NaiveDate),
    InRange { from: NaiveDate, to: NaiveDate },
}

#[derive(Clone)]
pub struct VisitPlanRepository {
    pool: PgPool,
}

impl VisitPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(
        &self,
        owner: Uuid,
        filter: PlanFilter,
    ) -> Result<Vec<VisitPlan>, AppError> {
        let plans = match filter {
            PlanFilter::All => {
                sqlx::query_as::<_, VisitPlan>(
                    "SELECT * FROM visit_plans WHERE created_by = $1 ORDER BY planned_date ASC",
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await?
            }
            PlanFilter::OnDate(date) => {
                sqlx::query_as::<_, VisitPlan>(
                    r#"
                    SELECT * FROM visit_plans
                    WHERE created_by = $1 AND planned_date = $2
                    ORDER BY planned_date ASC
                    "#,
                )
                .bind(owner)
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            PlanFilter::InRange { from, to } => {
                sqlx::query_as::<_, VisitPlan>(
                    r#"
                    SELECT * FROM visit_plans
                    WHERE created_by = $1 AND planned_date >= $2 AND planned_date < $3
                    ORDER BY planned_date ASC
                    "#,
                )
                .bind(owner)
                .bind(from)
                .bind(to)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(plans)
    }

    // Busca em lote, sem escopo de dono: alimenta o embed do plano nas
    // respostas de relatório.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VisitPlan>, AppError> {
        let plans =
            sqlx::query_as::<_, VisitPlan>("SELECT * FROM visit_plans WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(plans)
    }

    pub async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<VisitPlan>, AppError> {
        let plan = sqlx::query_as::<_, VisitPlan>(
            "SELECT * FROM visit_plans WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    pub async fn create(
        &self,
        owner: Uuid,
        customer_id: Uuid,
        planned_date: NaiveDate,
    ) -> Result<VisitPlan, AppError> {
        let plan = sqlx::query_as::<_, VisitPlan>(
            r#"
            INSERT INTO visit_plans (customer_id, planned_date, created_by)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(planned_date)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(plan)
    }

    // Update de campos permitidos. Quando `expected_status` vem preenchido
    // (modo estrito), o WHERE também confere o status atual, fechando a
    // corrida entre a leitura do guard e a escrita.
    pub async fn apply_update(
        &self,
        owner: Uuid,
        id: Uuid,
        planned_date: Option<NaiveDate>,
        status: Option<VisitStatus>,
        check_in_notes: Option<&str>,
        check_out_time: Option<chrono::DateTime<chrono::Utc>>,
        expected_status: Option<VisitStatus>,
    ) -> Result<Option<VisitPlan>, AppError> {
        let plan = sqlx::query_as::<_, VisitPlan>(
            r#"
            UPDATE visit_plans SET
                planned_date   = COALESCE($3, planned_date),
                status         = COALESCE($4::visit_status, status),
                check_in_notes = COALESCE($5, check_in_notes),
                check_out_time = COALESCE($6, check_out_time),
                updated_at     = now()
            WHERE id = $1 AND created_by = $2
              AND ($7::visit_status IS NULL OR status = $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(planned_date)
        .bind(status)
        .bind(check_in_notes)
        .bind(check_out_time)
        .bind(expected_status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    // A transição de check-in: carimba hora, coordenadas, foto e observação.
    pub async fn check_in(
        &self,
        owner: Uuid,
        id: Uuid,
        latitude: &str,
        longitude: &str,
        photo_url: &str,
        notes: Option<&str>,
        expected_status: Option<VisitStatus>,
    ) -> Result<Option<VisitPlan>, AppError> {
        let plan = sqlx::query_as::<_, VisitPlan>(
            r#"
            UPDATE visit_plans SET
                status             = 'CHECKED_IN',
                check_in_time      = now(),
                check_in_latitude  = $3,
                check_in_longitude = $4,
                check_in_photo_url = $5,
                check_in_notes     = $6,
                updated_at         = now()
            WHERE id = $1 AND created_by = $2
              AND ($7::visit_status IS NULL OR status = $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(latitude)
        .bind(longitude)
        .bind(photo_url)
        .bind(notes)
        .bind(expected_status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM visit_plans WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
