// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Cliente visitável. As coordenadas são guardadas como texto (o app manda
// strings) e só são interpretadas na validação de geofence do check-in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Mercado Central")]
    pub name: String,

    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    #[schema(example = "13800138000")]
    pub phone: String,

    pub address: Option<String>,

    #[schema(example = "31.230400")]
    pub latitude: Option<String>,
    #[schema(example = "121.473700")]
    pub longitude: Option<String>,

    pub notes: Option<String>,
}

// Campos permitidos no update. Lista explícita em vez de repassar o corpo
// bruto para o banco.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: Option<String>,
}
