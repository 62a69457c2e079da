// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settings::{TenantSettings, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Tenant sem perfil cadastrado lê como um perfil vazio.
        let settings = sqlx::query_as::<_, TenantSettings>(
            r#"
            SELECT tenant_id, company_name, tax_id, address, phone, email, payment_key, updated_at
            FROM tenant_settings
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        match settings {
            Some(s) => Ok(s),
            None => Ok(TenantSettings {
                tenant_id,
                company_name: None,
                tax_id: None,
                address: None,
                phone: None,
                email: None,
                payment_key: None,
                updated_at: None,
            }),
        }
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: UpdateSettingsRequest,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT (Insert or Update)
        let settings = sqlx::query_as::<_, TenantSettings>(
            r#"
            INSERT INTO tenant_settings (tenant_id, company_name, tax_id, address, payment_key, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (tenant_id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                tax_id = EXCLUDED.tax_id,
                address = EXCLUDED.address,
                payment_key = EXCLUDED.payment_key,
                updated_at = NOW()
            RETURNING tenant_id, company_name, tax_id, address, phone, email, payment_key, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(input.company_name)
        .bind(input.tax_id)
        .bind(input.address)
        .bind(input.payment_key)
        .fetch_one(executor)
        .await?;

        Ok(settings)
    }
}
