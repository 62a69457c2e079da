// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Billing ---
        handlers::billing::create_invoice,
        handlers::billing::list_invoices,
        handlers::billing::get_invoice,
        handlers::billing::update_invoice_status,

        // --- Reports ---
        handlers::reports::sales_report,
        handlers::reports::tax_report,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(
        schemas(
            // --- Billing ---
            models::billing::InvoiceStatus,
            models::billing::Invoice,
            models::billing::InvoiceWithCustomer,

            // --- Reports ---
            models::reports::GroupBy,
            models::reports::ReportPeriod,
            models::reports::ReportSummary,
            models::reports::SalesByTypeEntry,
            models::reports::TopCustomerEntry,
            models::reports::SalesReport,
            models::reports::TaxReportSummary,
            models::reports::TaxByStateEntry,
            models::reports::TaxByCategoryEntry,
            models::reports::TaxReport,

            // --- Settings ---
            models::settings::TenantSettings,
            models::settings::UpdateSettingsRequest,

            // --- Payloads ---
            handlers::billing::CreateInvoicePayload,
            handlers::billing::UpdateInvoiceStatusPayload,
        )
    ),
    tags(
        (name = "Billing", description = "Emissão e acompanhamento de faturas"),
        (name = "Reports", description = "Relatórios de vendas e impostos"),
        (name = "Settings", description = "Perfil da loja")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
