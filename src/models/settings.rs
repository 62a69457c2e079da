// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[schema(ignore)] // Ocultamos o ID interno, pois o contexto (Header) já define a loja
    pub tenant_id: Uuid,

    #[schema(example = "Flores del Valle S.A. de C.V.")]
    pub company_name: Option<String>,

    #[schema(example = "FDV840615XX1")]
    pub tax_id: Option<String>,

    #[schema(example = "Av. de las Rosas 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "(55) 9999-8888")]
    pub phone: Option<String>,

    #[schema(example = "contacto@floresdelvalle.mx")]
    pub email: Option<String>,

    // Chave/alias de pagamento impressa como QR na fatura.
    #[schema(example = "pagos@floresdelvalle.mx")]
    pub payment_key: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[schema(example = "Flores del Valle S.A. de C.V.")]
    pub company_name: Option<String>,

    #[schema(example = "FDV840615XX1")]
    pub tax_id: Option<String>,

    #[schema(example = "Av. de las Rosas 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "pagos@floresdelvalle.mx")]
    pub payment_key: Option<String>,
}
