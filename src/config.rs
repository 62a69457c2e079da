// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{InvoiceRepository, SettingsRepository},
    services::{
        billing_service::BillingService, document_service::DocumentService,
        report_service::ReportService, settings_service::SettingsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub billing_service: BillingService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let billing_service = BillingService::new(invoice_repo.clone());
        let report_service = ReportService::new(invoice_repo.clone());
        let document_service = DocumentService::new(invoice_repo, settings_repo.clone());
        let settings_service = SettingsService::new(settings_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            billing_service,
            report_service,
            document_service,
            settings_service,
        })
    }
}
