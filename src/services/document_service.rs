// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, SettingsRepository},
};

#[derive(Clone)]
pub struct DocumentService {
    repo: InvoiceRepository,
    settings_repo: SettingsRepository,
}

impl DocumentService {
    pub fn new(repo: InvoiceRepository, settings_repo: SettingsRepository) -> Self {
        Self { repo, settings_repo }
    }

    /// Gera a fatura imprimível. Os textos do documento ficam em espanhol
    /// porque é o que o cliente final recebe.
    pub async fn generate_invoice_pdf<'e, A>(
        &self,
        conn: A,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Vec<u8>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        // 1. Busca os dados num snapshot só
        let mut tx = conn.begin().await?;

        let invoice = self
            .repo
            .get_with_customer(&mut *tx, tenant_id, invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;
        let orders = self.repo.list_orders_for_invoice(&mut *tx, invoice.id).await?;
        let settings = self.settings_repo.get_settings(&mut *tx, tenant_id).await?;

        tx.commit().await?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Factura {}", invoice.invoice_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let title_text = settings.company_name.unwrap_or("FLORICULTURA".to_string());
        doc.push(elements::Paragraph::new(title_text)
            .styled(style::Style::new().bold().with_font_size(18)));

        if let Some(tax_id) = settings.tax_id {
            doc.push(elements::Paragraph::new(format!("RFC: {}", tax_id))
                .styled(style::Style::new().with_font_size(10)));
        }

        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(format!("FACTURA {}", invoice.invoice_number))
            .styled(style::Style::new().bold().with_font_size(14)));

        doc.push(elements::Paragraph::new(format!("Fecha: {}", invoice.created_at.format("%d/%m/%Y"))));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", invoice.customer_name)));
        doc.push(elements::Paragraph::new(format!("Tipo: {}", invoice.invoice_type)));
        doc.push(elements::Paragraph::new(format!("Estado: {}", invoice.status.as_str())));

        if let Some(method) = &invoice.payment_method {
            doc.push(elements::Paragraph::new(format!("Pago: {}", method)));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE PEDIDOS COBERTOS ---
        if !orders.is_empty() {
            // Pesos das colunas: Pedido (2), Data (3), Total (2)
            let mut table = elements::TableLayout::new(vec![2, 3, 2]);
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

            let style_bold = style::Style::new().bold();
            table.row()
                .element(elements::Paragraph::new("Pedido").styled(style_bold))
                .element(elements::Paragraph::new("Fecha").styled(style_bold))
                .element(elements::Paragraph::new("Total").styled(style_bold))
                .push()
                .expect("Table error");

            for order in orders {
                table.row()
                    .element(elements::Paragraph::new(format!("#{}", order.display_id)))
                    .element(elements::Paragraph::new(order.created_at.format("%d/%m/%Y").to_string()))
                    .element(elements::Paragraph::new(format!("$ {:.2}", order.total_amount)))
                    .push()
                    .expect("Table row error");
            }

            doc.push(table);
            doc.push(elements::Break::new(2));
        }

        // --- TOTAL ---
        let mut total_paragraph = elements::Paragraph::new(
            format!("TOTAL: $ {:.2}", invoice.total)
        );

        total_paragraph.set_alignment(genpdf::Alignment::Right);

        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        if let Some(key) = settings.payment_key {
            doc.push(elements::Paragraph::new("PAGO POR TRANSFERENCIA")
                .styled(style::Style::new().bold().with_font_size(12)));

            doc.push(elements::Paragraph::new(format!("Clave: {}", key)));
            doc.push(elements::Break::new(1));

            // O QR Code é só o texto da chave; quem lê decide como pagar.
            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        if let Some(addr) = settings.address {
            doc.push(elements::Break::new(2));
            doc.push(elements::Paragraph::new(addr).styled(style::Style::new().italic().with_font_size(8)));
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
