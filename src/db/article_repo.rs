// src/db/article_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::article::{Article, UpdateArticlePayload},
};

// Artigos internos. Leitura é da organização inteira por padrão;
// `owner = Some(..)` ativa o escopo por dono.
#[derive(Clone)]
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: Option<Uuid>) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE ($1::uuid IS NULL OR created_by = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    pub async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>(
            "SELECT * FROM articles WHERE id = $1 AND ($2::uuid IS NULL OR created_by = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    pub async fn create(&self, owner: Uuid, title: &str, content: &str) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, content, created_by)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(article)
    }

    pub async fn update(
        &self,
        id: Uuid,
        fields: &UpdateArticlePayload,
    ) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles SET
                title      = COALESCE($2, title),
                content    = COALESCE($3, content),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.title.as_deref())
        .bind(fields.content.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
