// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
};

pub async fn invoice_pdf(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(invoice_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state
        .document_service
        .generate_invoice_pdf(&app_state.db_pool, tenant.0, invoice_id)
        .await?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"factura_{}.pdf\"", invoice_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
