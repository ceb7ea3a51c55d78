// src/db/visit_report_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::visit_report::{CreateVisitReportPayload, UpdateVisitReportPayload, VisitReport},
};

// Relatórios de visita. O escopo por dono nas leituras é opcional
// (`owner = None` lista a organização inteira, como o app original).
#[derive(Clone)]
pub struct VisitReportRepository {
    pool: PgPool,
}

impl VisitReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: Option<Uuid>) -> Result<Vec<VisitReport>, AppError> {
        let reports = sqlx::query_as::<_, VisitReport>(
            r#"
            SELECT * FROM visit_reports
            WHERE ($1::uuid IS NULL OR created_by = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    // Relatórios de um plano específico, para o detalhe do plano.
    pub async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<VisitReport>, AppError> {
        let reports = sqlx::query_as::<_, VisitReport>(
            "SELECT * FROM visit_reports WHERE visit_plan_id = $1 ORDER BY created_at DESC",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<VisitReport>, AppError> {
        let report = sqlx::query_as::<_, VisitReport>(
            "SELECT * FROM visit_reports WHERE id = $1 AND ($2::uuid IS NULL OR created_by = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn create(
        &self,
        owner: Uuid,
        payload: &CreateVisitReportPayload,
    ) -> Result<VisitReport, AppError> {
        let report = sqlx::query_as::<_, VisitReport>(
            r#"
            INSERT INTO visit_reports (
                visit_plan_id, customer_id, start_time, end_time,
                communication_points, customer_feedback, follow_up_tasks,
                attachments, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(payload.visit_plan_id)
        .bind(payload.customer_id)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(payload.communication_points.as_deref().unwrap_or(""))
        .bind(payload.customer_feedback.as_deref().unwrap_or(""))
        .bind(payload.follow_up_tasks.as_deref().unwrap_or(""))
        .bind(payload.attachments.as_deref().unwrap_or(&[]))
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        fields: &UpdateVisitReportPayload,
    ) -> Result<Option<VisitReport>, AppError> {
        let report = sqlx::query_as::<_, VisitReport>(
            r#"
            UPDATE visit_reports SET
                start_time           = COALESCE($3, start_time),
                end_time             = COALESCE($4, end_time),
                communication_points = COALESCE($5, communication_points),
                customer_feedback    = COALESCE($6, customer_feedback),
                follow_up_tasks      = COALESCE($7, follow_up_tasks),
                attachments          = COALESCE($8, attachments),
                updated_at           = now()
            WHERE id = $1 AND ($2::uuid IS NULL OR created_by = $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(fields.communication_points.as_deref())
        .bind(fields.customer_feedback.as_deref())
        .bind(fields.follow_up_tasks.as_deref())
        .bind(fields.attachments.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM visit_reports WHERE id = $1 AND ($2::uuid IS NULL OR created_by = $2)",
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
