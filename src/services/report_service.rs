// src/services/report_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::{
        billing::{InvoiceStatus, InvoiceWithCustomer},
        reports::{
            GroupBy, ReportPeriod, ReportSummary, SalesByTypeEntry, SalesReport,
            TaxByCategoryEntry, TaxByStateEntry, TaxReport, TaxReportSummary, TopCustomerEntry,
        },
    },
};

const TOP_CUSTOMERS: usize = 5;

pub struct SalesReportOptions {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub group_by: GroupBy,
    pub customer_id: Option<Uuid>,
}

pub struct TaxReportOptions {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub state: Option<String>,
}

#[derive(Clone)]
pub struct ReportService {
    repo: InvoiceRepository,
}

impl ReportService {
    pub fn new(repo: InvoiceRepository) -> Self {
        Self { repo }
    }

    /// Relatório de vendas do intervalo [start_date, end_date] (inclusivo).
    /// `start_date <= end_date` é responsabilidade de quem chama.
    pub async fn generate_sales_report<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        opts: SalesReportOptions,
    ) -> Result<SalesReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self
            .repo
            .list_with_customer_between(
                executor,
                tenant_id,
                opts.start_date,
                opts.end_date,
                opts.customer_id,
            )
            .await?;

        Ok(build_sales_report(rows, &opts))
    }

    /// Relatório de impostos: o contrato (shape) é estável, mas os valores
    /// ainda são fixos de demonstração e ignoram os parâmetros.
    pub fn generate_tax_report(&self, _opts: TaxReportOptions) -> TaxReport {
        build_tax_report()
    }
}

// TODO: substituir pelos cálculos reais quando as regras fiscais por estado forem definidas.
fn build_tax_report() -> TaxReport {
    TaxReport {
        summary: TaxReportSummary {
            total_sales: Decimal::new(12543050, 2),
            total_taxable_amount: Decimal::new(9875025, 2),
            total_tax_collected: Decimal::new(1580004, 2),
            effective_tax_rate: Decimal::new(16, 2),
        },
        taxes_by_state: vec![
            TaxByStateEntry {
                state: "CDMX".to_string(),
                taxable_amount: Decimal::new(4520000, 2),
                tax_collected: Decimal::new(723200, 2),
                rate: Decimal::new(16, 2),
            },
            TaxByStateEntry {
                state: "JAL".to_string(),
                taxable_amount: Decimal::new(3210025, 2),
                tax_collected: Decimal::new(513604, 2),
                rate: Decimal::new(16, 2),
            },
            TaxByStateEntry {
                state: "NLE".to_string(),
                taxable_amount: Decimal::new(2145000, 2),
                tax_collected: Decimal::new(343200, 2),
                rate: Decimal::new(16, 2),
            },
        ],
        taxes_by_category: vec![
            TaxByCategoryEntry {
                category: "Flores Frescas".to_string(),
                taxable_amount: Decimal::new(5230000, 2),
                tax_collected: Decimal::new(836800, 2),
            },
            TaxByCategoryEntry {
                category: "Arreglos".to_string(),
                taxable_amount: Decimal::new(3045025, 2),
                tax_collected: Decimal::new(487204, 2),
            },
            TaxByCategoryEntry {
                category: "Suscripciones".to_string(),
                taxable_amount: Decimal::new(1600000, 2),
                tax_collected: Decimal::new(256000, 2),
            },
        ],
    }
}

/// Reduz as faturas pagas em buckets de período, totais por tipo e ranking
/// de clientes. Os buckets saem na ordem de primeira aparição e nunca são
/// reordenados; como a busca vem ordenada por created_at, isso é cronológico.
fn build_sales_report(rows: Vec<InvoiceWithCustomer>, opts: &SalesReportOptions) -> SalesReport {
    let mut periods: Vec<ReportPeriod> = Vec::new();
    let mut period_index: HashMap<String, usize> = HashMap::new();

    let mut sales_by_type: Vec<SalesByTypeEntry> = Vec::new();
    let mut type_index: HashMap<String, usize> = HashMap::new();

    let mut customers: Vec<TopCustomerEntry> = Vec::new();
    let mut customer_index: HashMap<Uuid, usize> = HashMap::new();

    let mut total_sales = Decimal::ZERO;
    let mut total_invoices: i64 = 0;

    for invoice in rows {
        // Só faturas pagas contam para qualquer agregado.
        if invoice.status != InvoiceStatus::Pagada {
            continue;
        }

        total_sales += invoice.total;
        total_invoices += 1;

        let key = period_key(opts.group_by, invoice.created_at);
        let p_idx = *period_index.entry(key.clone()).or_insert_with(|| {
            periods.push(ReportPeriod {
                period: key,
                count: 0,
                total: Decimal::ZERO,
                invoices: Vec::new(),
            });
            periods.len() - 1
        });
        periods[p_idx].count += 1;
        periods[p_idx].total += invoice.total;

        let t_idx = *type_index.entry(invoice.invoice_type.clone()).or_insert_with(|| {
            sales_by_type.push(SalesByTypeEntry {
                invoice_type: invoice.invoice_type.clone(),
                count: 0,
                total: Decimal::ZERO,
            });
            sales_by_type.len() - 1
        });
        sales_by_type[t_idx].count += 1;
        sales_by_type[t_idx].total += invoice.total;

        let c_idx = *customer_index.entry(invoice.customer_id).or_insert_with(|| {
            customers.push(TopCustomerEntry {
                customer_id: invoice.customer_id,
                customer_name: invoice.customer_name.clone(),
                count: 0,
                total: Decimal::ZERO,
            });
            customers.len() - 1
        });
        customers[c_idx].count += 1;
        customers[c_idx].total += invoice.total;

        periods[p_idx].invoices.push(invoice);
    }

    let average_invoice_value = if total_invoices > 0 {
        total_sales / Decimal::from(total_invoices)
    } else {
        Decimal::ZERO
    };

    // sort_by é estável: empates em total preservam a ordem de chegada.
    customers.sort_by(|a, b| b.total.cmp(&a.total));
    customers.truncate(TOP_CUSTOMERS);

    SalesReport {
        periods,
        summary: ReportSummary {
            total_sales,
            total_invoices,
            average_invoice_value,
            start_date: opts.start_date,
            end_date: opts.end_date,
        },
        sales_by_type,
        top_customers: customers,
    }
}

/// Chave do bucket conforme a granularidade. Datas sempre em UTC.
fn period_key(group_by: GroupBy, created_at: DateTime<Utc>) -> String {
    match group_by {
        GroupBy::Day => created_at.date_naive().format("%Y-%m-%d").to_string(),
        GroupBy::Week => week_start(created_at.date_naive()).format("%Y-%m-%d").to_string(),
        GroupBy::Month => created_at.format("%Y-%m").to_string(),
    }
}

/// Segunda-feira da semana de `date`; domingo pertence à semana iniciada
/// seis dias antes.
fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(days_from_monday)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn invoice(
        customer_id: Uuid,
        customer_name: &str,
        invoice_type: &str,
        total: i64,
        status: InvoiceStatus,
        created_at: &str,
    ) -> InvoiceWithCustomer {
        InvoiceWithCustomer {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            invoice_number: "INV-2304-0001".to_string(),
            customer_id,
            customer_name: customer_name.to_string(),
            user_id: Uuid::nil(),
            invoice_type: invoice_type.to_string(),
            total: Decimal::from(total),
            status,
            payment_method: None,
            created_at: ts(created_at),
        }
    }

    fn opts(group_by: GroupBy) -> SalesReportOptions {
        SalesReportOptions {
            start_date: ts("2023-04-01T00:00:00Z"),
            end_date: ts("2023-04-30T23:59:59Z"),
            group_by,
            customer_id: None,
        }
    }

    #[test]
    fn chave_diaria_usa_a_data_utc() {
        assert_eq!(period_key(GroupBy::Day, ts("2023-04-15T10:30:00Z")), "2023-04-15");
    }

    #[test]
    fn chave_mensal_usa_ano_e_mes() {
        assert_eq!(period_key(GroupBy::Month, ts("2023-04-15T10:30:00Z")), "2023-04");
        assert_eq!(period_key(GroupBy::Month, ts("2023-11-02T00:00:00Z")), "2023-11");
    }

    #[test]
    fn chave_semanal_de_sabado_cai_na_segunda() {
        // 2023-04-15 é um sábado; a segunda daquela semana é 2023-04-10.
        assert_eq!(period_key(GroupBy::Week, ts("2023-04-15T10:30:00Z")), "2023-04-10");
    }

    #[test]
    fn domingo_pertence_a_semana_iniciada_seis_dias_antes() {
        // 2023-04-16 é um domingo.
        assert_eq!(period_key(GroupBy::Week, ts("2023-04-16T08:00:00Z")), "2023-04-10");
    }

    #[test]
    fn segunda_feira_abre_a_propria_semana() {
        let monday = NaiveDate::from_ymd_opt(2023, 4, 10).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn semana_atravessa_a_virada_de_ano() {
        // 2026-01-01 é uma quinta; a semana começou na segunda 2025-12-29.
        assert_eq!(period_key(GroupBy::Week, ts("2026-01-01T12:00:00Z")), "2025-12-29");
    }

    #[test]
    fn soma_dos_buckets_fecha_com_o_resumo() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let rows = vec![
            invoice(c1, "Vivero San José", "Venta Directa", 100, InvoiceStatus::Pagada, "2023-04-10T09:00:00Z"),
            invoice(c2, "Eventos Casa Blanca", "Suscripción", 250, InvoiceStatus::Pagada, "2023-04-10T15:00:00Z"),
            invoice(c1, "Vivero San José", "Venta Directa", 80, InvoiceStatus::Pagada, "2023-04-11T10:00:00Z"),
            invoice(c2, "Eventos Casa Blanca", "Consignación", 40, InvoiceStatus::Pagada, "2023-04-15T10:00:00Z"),
        ];

        let report = build_sales_report(rows, &opts(GroupBy::Day));

        let bucket_count: i64 = report.periods.iter().map(|p| p.count).sum();
        let bucket_total: Decimal = report.periods.iter().map(|p| p.total).sum();

        assert_eq!(bucket_count, report.summary.total_invoices);
        assert_eq!(bucket_total, report.summary.total_sales);
        assert_eq!(report.summary.total_invoices, 4);
        assert_eq!(report.summary.total_sales, Decimal::from(470));

        let type_total: Decimal = report.sales_by_type.iter().map(|t| t.total).sum();
        assert_eq!(type_total, report.summary.total_sales);
    }

    #[test]
    fn buckets_saem_em_ordem_cronologica_de_primeira_aparicao() {
        let c = Uuid::new_v4();
        let rows = vec![
            invoice(c, "Vivero San José", "Venta Directa", 10, InvoiceStatus::Pagada, "2023-04-10T09:00:00Z"),
            invoice(c, "Vivero San José", "Suscripción", 20, InvoiceStatus::Pagada, "2023-04-10T18:00:00Z"),
            invoice(c, "Vivero San José", "Venta Directa", 30, InvoiceStatus::Pagada, "2023-04-11T09:00:00Z"),
            invoice(c, "Vivero San José", "Consignación", 40, InvoiceStatus::Pagada, "2023-04-15T09:00:00Z"),
        ];

        let report = build_sales_report(rows, &opts(GroupBy::Day));

        let keys: Vec<&str> = report.periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(keys, vec!["2023-04-10", "2023-04-11", "2023-04-15"]);

        // Tipos também saem na ordem em que apareceram.
        let types: Vec<&str> = report.sales_by_type.iter().map(|t| t.invoice_type.as_str()).collect();
        assert_eq!(types, vec!["Venta Directa", "Suscripción", "Consignación"]);
    }

    #[test]
    fn faturas_nao_pagas_ficam_fora_de_todos_os_agregados() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let rows = vec![
            invoice(c1, "Vivero San José", "Venta Directa", 100, InvoiceStatus::Pagada, "2023-04-10T09:00:00Z"),
            invoice(c2, "Eventos Casa Blanca", "Suscripción", 999, InvoiceStatus::Pendiente, "2023-04-10T10:00:00Z"),
            invoice(c2, "Eventos Casa Blanca", "Consignación", 500, InvoiceStatus::Cancelada, "2023-04-11T10:00:00Z"),
        ];

        let report = build_sales_report(rows, &opts(GroupBy::Day));

        assert_eq!(report.summary.total_invoices, 1);
        assert_eq!(report.summary.total_sales, Decimal::from(100));
        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.sales_by_type.len(), 1);
        assert_eq!(report.top_customers.len(), 1);
        assert_eq!(report.top_customers[0].customer_id, c1);
    }

    #[test]
    fn relatorio_vazio_nao_divide_por_zero() {
        let report = build_sales_report(Vec::new(), &opts(GroupBy::Day));

        assert_eq!(report.summary.total_invoices, 0);
        assert_eq!(report.summary.total_sales, Decimal::ZERO);
        assert_eq!(report.summary.average_invoice_value, Decimal::ZERO);
        assert!(report.periods.is_empty());
        assert!(report.top_customers.is_empty());
    }

    #[test]
    fn media_e_o_total_dividido_pela_quantidade() {
        let c = Uuid::new_v4();
        let rows = vec![
            invoice(c, "Vivero San José", "Venta Directa", 100, InvoiceStatus::Pagada, "2023-04-10T09:00:00Z"),
            invoice(c, "Vivero San José", "Venta Directa", 200, InvoiceStatus::Pagada, "2023-04-11T09:00:00Z"),
        ];

        let report = build_sales_report(rows, &opts(GroupBy::Day));

        assert_eq!(report.summary.average_invoice_value, Decimal::from(150));
    }

    #[test]
    fn top_clientes_limita_a_cinco_e_preserva_empates_na_ordem_de_chegada() {
        let ids: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
        let totals: [i64; 7] = [300, 300, 500, 100, 700, 200, 50];

        let rows: Vec<InvoiceWithCustomer> = totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                invoice(
                    ids[i],
                    &format!("Cliente {}", i + 1),
                    "Venta Directa",
                    *total,
                    InvoiceStatus::Pagada,
                    &format!("2023-04-{:02}T09:00:00Z", i + 1),
                )
            })
            .collect();

        let report = build_sales_report(rows, &opts(GroupBy::Day));

        let top_totals: Vec<Decimal> = report.top_customers.iter().map(|c| c.total).collect();
        assert_eq!(
            top_totals,
            vec![
                Decimal::from(700),
                Decimal::from(500),
                Decimal::from(300),
                Decimal::from(300),
                Decimal::from(200),
            ]
        );

        // Os dois clientes empatados em 300 mantêm a ordem de primeira aparição.
        assert_eq!(report.top_customers[2].customer_id, ids[0]);
        assert_eq!(report.top_customers[3].customer_id, ids[1]);
    }

    #[test]
    fn relatorio_de_impostos_devolve_dados_fixos_coerentes() {
        let report = build_tax_report();

        assert_eq!(report.summary.total_sales, Decimal::new(12543050, 2));
        assert_eq!(report.taxes_by_state.len(), 3);
        assert_eq!(report.taxes_by_category.len(), 3);

        let by_state: Decimal = report.taxes_by_state.iter().map(|s| s.taxable_amount).sum();
        assert_eq!(by_state, report.summary.total_taxable_amount);

        let collected: Decimal = report.taxes_by_state.iter().map(|s| s.tax_collected).sum();
        assert_eq!(collected, report.summary.total_tax_collected);
    }
}
