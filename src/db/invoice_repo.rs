// src/db/invoice_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{Invoice, InvoiceStatus, InvoiceWithCustomer, LinkedOrder},
};

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  NUMERAÇÃO
    // =========================================================================

    /// Reserva o próximo número de sequência do mês.
    /// O UPSERT é atômico: duas criações simultâneas nunca recebem o mesmo valor.
    pub async fn next_sequence<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seq = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO invoice_counters (tenant_id, year, month, seq)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (tenant_id, year, month)
            DO UPDATE SET seq = invoice_counters.seq + 1
            RETURNING seq
            "#,
        )
        .bind(tenant_id)
        .bind(year)
        .bind(month)
        .fetch_one(executor)
        .await?;

        Ok(seq)
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn insert_invoice<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_number: &str,
        customer_id: Uuid,
        user_id: Uuid,
        invoice_type: &str,
        total: Decimal,
        status: InvoiceStatus,
        payment_method: Option<&str>,
        payment_details: Option<&str>,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                tenant_id, invoice_number, customer_id, user_id,
                invoice_type, total, status, payment_method, payment_details
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, tenant_id, invoice_number, customer_id, user_id,
                invoice_type, total, status, payment_method, payment_details,
                created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_number)
        .bind(customer_id)
        .bind(user_id)
        .bind(invoice_type)
        .bind(total)
        .bind(status)
        .bind(payment_method)
        .bind(payment_details)
        .fetch_one(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn link_order<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO invoice_orders (invoice_id, order_id) VALUES ($1, $2)")
            .bind(invoice_id)
            .bind(order_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn get_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, tenant_id, invoice_number, customer_id, user_id,
                invoice_type, total, status, payment_method, payment_details,
                created_at, updated_at
            FROM invoices
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, tenant_id, invoice_number, customer_id, user_id,
                invoice_type, total, status, payment_method, payment_details,
                created_at, updated_at
            FROM invoices
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tenant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(invoices)
    }

    /// Faturas nunca são apagadas: o cancelamento é só uma troca de status.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
        status: InvoiceStatus,
        payment_method: Option<&str>,
        payment_details: Option<&str>,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = $3,
                payment_method = COALESCE($4, payment_method),
                payment_details = COALESCE($5, payment_details),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING
                id, tenant_id, invoice_number, customer_id, user_id,
                invoice_type, total, status, payment_method, payment_details,
                created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .bind(status)
        .bind(payment_method)
        .bind(payment_details)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    // =========================================================================
    //  CONSULTAS DOS RELATÓRIOS / PDF
    // =========================================================================

    /// Faturas do intervalo [start, end] (inclusivo), com o nome do cliente,
    /// em ordem cronológica ascendente.
    pub async fn list_with_customer_between<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<InvoiceWithCustomer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, InvoiceWithCustomer>(
            r#"
            SELECT
                i.id, i.tenant_id, i.invoice_number, i.customer_id,
                c.full_name AS customer_name,
                i.user_id, i.invoice_type, i.total, i.status,
                i.payment_method, i.created_at
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            WHERE i.tenant_id = $1
              AND i.created_at BETWEEN $2 AND $3
              AND ($4::uuid IS NULL OR i.customer_id = $4)
            ORDER BY i.created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(start)
        .bind(end)
        .bind(customer_id)
        .fetch_all(executor)
        .await?;

        Ok(invoices)
    }

    pub async fn get_with_customer<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<InvoiceWithCustomer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, InvoiceWithCustomer>(
            r#"
            SELECT
                i.id, i.tenant_id, i.invoice_number, i.customer_id,
                c.full_name AS customer_name,
                i.user_id, i.invoice_type, i.total, i.status,
                i.payment_method, i.created_at
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            WHERE i.tenant_id = $1 AND i.id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    /// Pedidos cobertos pela fatura (tabela impressa no PDF).
    pub async fn list_orders_for_invoice<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Vec<LinkedOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, LinkedOrder>(
            r#"
            SELECT o.id, o.display_id, o.total_amount, o.created_at
            FROM invoice_orders io
            JOIN orders o ON o.id = io.order_id
            WHERE io.invoice_id = $1
            ORDER BY o.display_id ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;

        Ok(orders)
    }
}
