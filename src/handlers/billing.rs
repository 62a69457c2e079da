// src/handlers/billing.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::billing::{Invoice, InvoiceStatus},
};

// =============================================================================
//  CRIAÇÃO
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Venta Directa")]
    pub invoice_type: String,

    #[schema(example = "1500.50")]
    pub total: Decimal,

    // Sem status explícito a fatura nasce "Pendiente".
    pub status: Option<InvoiceStatus>,

    #[schema(example = "Transferencia")]
    pub payment_method: Option<String>,
    pub payment_details: Option<String>,

    // Pedidos cobertos por esta fatura (pode ser vazio).
    #[serde(default)]
    pub order_ids: Vec<Uuid>,
}

// POST /api/billing/invoices
#[utoipa::path(
    post,
    path = "/api/billing/invoices",
    tag = "Billing",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Fatura criada com número sequencial do mês", body = Invoice),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .billing_service
        .create_invoice(
            &app_state.db_pool,
            tenant.0,
            user.0.sub,
            payload.customer_id,
            &payload.invoice_type,
            payload.total,
            payload.status,
            payload.payment_method.as_deref(),
            payload.payment_details.as_deref(),
            &payload.order_ids,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// =============================================================================
//  CONSULTA
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInvoicesParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/billing/invoices
#[utoipa::path(
    get,
    path = "/api/billing/invoices",
    tag = "Billing",
    responses(
        (status = 200, description = "Faturas da loja, mais recentes primeiro", body = Vec<Invoice>)
    ),
    params(
        ListInvoicesParams,
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Query(params): Query<ListInvoicesParams>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state
        .billing_service
        .list_invoices(&app_state.db_pool, tenant.0, params.limit, params.offset)
        .await?;

    Ok((StatusCode::OK, Json(invoices)))
}

// GET /api/billing/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/billing/invoices/{id}",
    tag = "Billing",
    responses(
        (status = 200, description = "Fatura encontrada", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da fatura"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .billing_service
        .get_invoice(&app_state.db_pool, tenant.0, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// =============================================================================
//  STATUS / PAGAMENTO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceStatusPayload {
    pub status: InvoiceStatus,

    #[schema(example = "Transferencia")]
    pub payment_method: Option<String>,
    pub payment_details: Option<String>,
}

// PATCH /api/billing/invoices/{id}/status
#[utoipa::path(
    patch,
    path = "/api/billing/invoices/{id}/status",
    tag = "Billing",
    request_body = UpdateInvoiceStatusPayload,
    responses(
        (status = 200, description = "Fatura atualizada", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da fatura"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice_status(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .billing_service
        .update_status(
            &app_state.db_pool,
            tenant.0,
            invoice_id,
            payload.status,
            payload.payment_method.as_deref(),
            payload.payment_details.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}
