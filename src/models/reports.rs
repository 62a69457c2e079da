// src/models/reports.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::billing::InvoiceWithCustomer;

// Granularidade do agrupamento do relatório de vendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Week,
    Month,
}

// 1. Um bucket de tempo (dia/semana/mês) com as faturas que caíram nele.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    #[schema(example = "2026-04-15")]
    pub period: String,
    pub count: i64,
    #[schema(example = "4200.00")]
    pub total: Decimal,
    pub invoices: Vec<InvoiceWithCustomer>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[schema(example = "12500.00")]
    pub total_sales: Decimal,
    pub total_invoices: i64,
    #[schema(example = "520.83")]
    pub average_invoice_value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesByTypeEntry {
    #[schema(example = "Venta Directa")]
    pub invoice_type: String,
    pub count: i64,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomerEntry {
    pub customer_id: Uuid,
    #[schema(example = "Eventos Casa Blanca")]
    pub customer_name: String,
    pub count: i64,
    pub total: Decimal,
}

// 2. O relatório completo devolvido ao dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub periods: Vec<ReportPeriod>,
    pub summary: ReportSummary,
    pub sales_by_type: Vec<SalesByTypeEntry>,
    pub top_customers: Vec<TopCustomerEntry>,
}

// --- Relatório de impostos ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxReportSummary {
    pub total_sales: Decimal,
    pub total_taxable_amount: Decimal,
    pub total_tax_collected: Decimal,
    #[schema(example = 0.16)]
    pub effective_tax_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxByStateEntry {
    #[schema(example = "CDMX")]
    pub state: String,
    pub taxable_amount: Decimal,
    pub tax_collected: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxByCategoryEntry {
    #[schema(example = "Flores Frescas")]
    pub category: String,
    pub taxable_amount: Decimal,
    pub tax_collected: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    pub summary: TaxReportSummary,
    pub taxes_by_state: Vec<TaxByStateEntry>,
    pub taxes_by_category: Vec<TaxByCategoryEntry>,
}
