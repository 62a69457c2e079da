// src/services/billing_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::billing::{Invoice, InvoiceStatus},
};

/// `INV-{AA}{MM}-{sequência com no mínimo 4 dígitos}`.
fn format_invoice_number(year: i32, month: u32, seq: i32) -> String {
    format!("INV-{:02}{:02}-{:04}", year % 100, month, seq)
}

#[derive(Clone)]
pub struct BillingService {
    repo: InvoiceRepository,
}

impl BillingService {
    pub fn new(repo: InvoiceRepository) -> Self {
        Self { repo }
    }

    /// Reserva e devolve o próximo número de fatura do mês corrente (UTC).
    ///
    /// Recebe o executor de fora para rodar dentro da mesma transação do
    /// INSERT da fatura: o contador e a fatura são gravados juntos, então
    /// não existe janela entre ler a sequência e usá-la.
    pub async fn generate_invoice_number<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let now = Utc::now();
        let seq = self
            .repo
            .next_sequence(executor, tenant_id, now.year(), now.month() as i32)
            .await?;

        Ok(format_invoice_number(now.year(), now.month(), seq))
    }

    pub async fn create_invoice<'e, A>(
        &self,
        conn: A,
        tenant_id: Uuid,
        user_id: Uuid,
        customer_id: Uuid,
        invoice_type: &str,
        total: Decimal,
        status: Option<InvoiceStatus>,
        payment_method: Option<&str>,
        payment_details: Option<&str>,
        order_ids: &[Uuid],
    ) -> Result<Invoice, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        if total < Decimal::ZERO {
            return Err(AppError::NegativeTotal);
        }

        let mut tx = conn.begin().await?;

        let invoice_number = self.generate_invoice_number(&mut *tx, tenant_id).await?;

        let invoice = self
            .repo
            .insert_invoice(
                &mut *tx,
                tenant_id,
                &invoice_number,
                customer_id,
                user_id,
                invoice_type,
                total,
                status.unwrap_or(InvoiceStatus::Pendiente),
                payment_method,
                payment_details,
            )
            .await?;

        for order_id in order_ids {
            self.repo.link_order(&mut *tx, invoice.id, *order_id).await?;
        }

        tx.commit().await?;

        tracing::info!("Fatura {} criada para o tenant {}", invoice.invoice_number, tenant_id);

        Ok(invoice)
    }

    pub async fn get_invoice<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .get_by_id(executor, tenant_id, invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let limit = limit.unwrap_or(50).clamp(1, 100);
        let offset = offset.unwrap_or(0).max(0);

        self.repo.list(executor, tenant_id, limit, offset).await
    }

    /// Atualização é só de status/pagamento; apagar fatura não existe como
    /// operação (cancelar = status "Cancelada").
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
        status: InvoiceStatus,
        payment_method: Option<&str>,
        payment_details: Option<&str>,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_status(executor, tenant_id, invoice_id, status, payment_method, payment_details)
            .await?
            .ok_or(AppError::InvoiceNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numero_segue_o_formato_inv_aamm_seq() {
        assert_eq!(format_invoice_number(2026, 4, 1), "INV-2604-0001");
        assert_eq!(format_invoice_number(2023, 4, 42), "INV-2304-0042");
    }

    #[test]
    fn mes_e_sequencia_ganham_zeros_a_esquerda() {
        assert_eq!(format_invoice_number(2025, 1, 7), "INV-2501-0007");
        assert_eq!(format_invoice_number(2025, 11, 7), "INV-2511-0007");
    }

    #[test]
    fn sequencia_acima_de_quatro_digitos_nao_trunca() {
        assert_eq!(format_invoice_number(2025, 12, 10234), "INV-2512-10234");
    }

    #[test]
    fn ano_usa_apenas_dois_digitos() {
        assert_eq!(format_invoice_number(2099, 6, 3), "INV-9906-0003");
    }
}
