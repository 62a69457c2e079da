// src/models/billing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

// Os valores espelham o que o caixa imprime, por isso ficam em espanhol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status")]
pub enum InvoiceStatus {
    Pagada,
    Pendiente,
    Cancelada,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pagada => "Pagada",
            InvoiceStatus::Pendiente => "Pendiente",
            InvoiceStatus::Cancelada => "Cancelada",
        }
    }
}

// --- Structs ---

// O tipo da fatura ("Venta Directa", "Suscripción", "Consignación", ...)
// é um conjunto aberto de strings, então fica como TEXT e não como enum.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "INV-2604-0001")]
    pub invoice_number: String,

    pub customer_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Venta Directa")]
    pub invoice_type: String,

    #[schema(example = "1500.50")]
    pub total: Decimal,

    pub status: InvoiceStatus,

    #[schema(example = "Transferencia")]
    pub payment_method: Option<String>,
    pub payment_details: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha de fatura já com o nome do cliente (JOIN), usada nos relatórios.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithCustomer {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "INV-2604-0001")]
    pub invoice_number: String,

    pub customer_id: Uuid,

    #[schema(example = "Floristería El Tulipán")]
    pub customer_name: String,

    pub user_id: Uuid,

    #[schema(example = "Suscripción")]
    pub invoice_type: String,

    #[schema(example = "890.00")]
    pub total: Decimal,

    pub status: InvoiceStatus,
    pub payment_method: Option<String>,

    pub created_at: DateTime<Utc>,
}

// Resumo de um pedido coberto pela fatura (tabela do PDF).
#[derive(Debug, Clone, FromRow)]
pub struct LinkedOrder {
    pub id: Uuid,
    pub display_id: i32,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}
