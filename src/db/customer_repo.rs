// src/db/customer_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customer::{Customer, UpdateCustomerPayload},
};

// Clientes são sempre escopados pelo dono: toda query carrega o
// created_by do chamador no WHERE. Linha de outro usuário = inexistente.
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    // Busca em lote, para embutir o cliente nas listagens de planos.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Customer>, AppError> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(customers)
    }

    pub async fn create(
        &self,
        owner: Uuid,
        name: &str,
        phone: &str,
        address: &str,
        latitude: Option<&str>,
        longitude: Option<&str>,
        notes: &str,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, address, latitude, longitude, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(notes)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    // Update de campos permitidos em uma ida só ao banco; o escopo por dono
    // no WHERE fecha a janela do find-então-update original.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &UpdateCustomerPayload,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name      = COALESCE($3, name),
                phone     = COALESCE($4, phone),
                address   = COALESCE($5, address),
                latitude  = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                notes     = COALESCE($8, notes),
                updated_at = now()
            WHERE id = $1 AND created_by = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(fields.name.as_deref())
        .bind(fields.phone.as_deref())
        .bind(fields.address.as_deref())
        .bind(fields.latitude.as_deref())
        .bind(fields.longitude.as_deref())
        .bind(fields.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
