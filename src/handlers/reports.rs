// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::reports::{GroupBy, SalesReport, TaxReport},
    services::report_service::{SalesReportOptions, TaxReportOptions},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesReportParams {
    /// Início do intervalo (inclusivo), RFC 3339.
    pub start_date: DateTime<Utc>,
    /// Fim do intervalo (inclusivo), RFC 3339.
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub group_by: GroupBy,
    pub customer_id: Option<Uuid>,
}

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    responses(
        (status = 200, description = "Vendas pagas agrupadas por período, tipo e cliente", body = SalesReport),
        (status = 401, description = "Não autorizado")
    ),
    params(
        SalesReportParams,
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_report(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Query(params): Query<SalesReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .report_service
        .generate_sales_report(
            &app_state.db_pool,
            tenant.0,
            SalesReportOptions {
                start_date: params.start_date,
                end_date: params.end_date,
                group_by: params.group_by,
                customer_id: params.customer_id,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaxReportParams {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub state: Option<String>,
}

// GET /api/reports/taxes
#[utoipa::path(
    get,
    path = "/api/reports/taxes",
    tag = "Reports",
    responses(
        (status = 200, description = "Relatório de impostos (dados de demonstração)", body = TaxReport)
    ),
    params(
        TaxReportParams,
        ("x-tenant-id" = Uuid, Header, description = "ID da Loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn tax_report(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _tenant: TenantContext,
    Query(params): Query<TaxReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.generate_tax_report(TaxReportOptions {
        start_date: params.start_date,
        end_date: params.end_date,
        state: params.state,
    });

    Ok((StatusCode::OK, Json(report)))
}
