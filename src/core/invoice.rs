//! Electronic invoice (factura / boleta) submission payload.
//!
//! Field names follow the invoicing API: a draft comes in as the form posts
//! it, and the payload adds the issuer RUC and the computed totals.

use super::config::TaxConfig;
use super::line_item::{LineItemError, LineItemRecord};
use super::totals::{calculate_totals, TaxTotals};
use super::warnings::{validate_items, RowIssue};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvoiceError {
    #[error("issuer RUC must be 11 digits: '{0}'")]
    InvalidIssuerRuc(String),
    #[error("customer RUC must be 11 digits: '{0}'")]
    InvalidRuc(String),
    #[error("customer DNI must be 8 digits: '{0}'")]
    InvalidDni(String),
    #[error("serie must look like F### or B###: '{0}'")]
    InvalidSerie(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invoice has no line items")]
    NoItems,
    // `index` is zero-based here and in `RowIssue`; messages show it 1-based
    #[error("line item {}: {source}", .index + 1)]
    InvalidItem { index: usize, source: LineItemError },
    #[error("line item {}: description is required", .index + 1)]
    MissingDescription { index: usize },
    #[error("{} line item(s) would be left out of the totals", .0.len())]
    InvalidItems(Vec<RowIssue>),
}

/// SUNAT document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "01")]
    Factura,
    #[serde(rename = "03")]
    Boleta,
}

impl DocumentType {
    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Factura => "01",
            DocumentType::Boleta => "03",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Factura => write!(f, "Factura ({})", self.code()),
            DocumentType::Boleta => write!(f, "Boleta ({})", self.code()),
        }
    }
}

/// Identity document type of the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum CustomerDocType {
    #[default]
    #[serde(rename = "6")]
    Ruc,
    #[serde(rename = "1")]
    Dni,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Currency {
    #[default]
    #[serde(rename = "PEN")]
    Pen,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Pen => "S/",
            Currency::Usd => "US$",
        }
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check a customer document number against its type; returns it trimmed.
pub fn validate_customer_document(
    doc_type: CustomerDocType,
    number: &str,
) -> Result<String, InvoiceError> {
    let number = number.trim();
    match doc_type {
        CustomerDocType::Ruc if is_digits(number, 11) => Ok(number.to_string()),
        CustomerDocType::Ruc => Err(InvoiceError::InvalidRuc(number.to_string())),
        CustomerDocType::Dni if is_digits(number, 8) => Ok(number.to_string()),
        CustomerDocType::Dni => Err(InvoiceError::InvalidDni(number.to_string())),
    }
}

fn normalize_serie(serie: &str) -> Result<String, InvoiceError> {
    let serie = serie.trim().to_uppercase();
    let mut chars = serie.chars();
    let prefix_ok = matches!(chars.next(), Some('F' | 'B'));
    let digits = chars.as_str();
    if prefix_ok && is_digits(digits, 3) {
        Ok(serie)
    } else {
        Err(InvoiceError::InvalidSerie(serie))
    }
}

fn required(value: &str, field: &'static str) -> Result<String, InvoiceError> {
    let value = value.trim();
    if value.is_empty() {
        Err(InvoiceError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

fn default_serie() -> String {
    "F001".to_string()
}

fn default_numero() -> String {
    "1".to_string()
}

fn default_operation_type() -> String {
    "0101".to_string()
}

/// Invoice as filled in by the user
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub tipo_documento: DocumentType,
    #[serde(default = "default_serie")]
    pub serie: String,
    /// Correlative number, kept as text
    #[serde(default = "default_numero")]
    pub numero: String,
    /// Issue date (YYYY-MM-DD), today when absent
    #[serde(default)]
    pub fecha_emision: Option<NaiveDate>,
    #[serde(default)]
    pub tipo_moneda: Currency,
    #[serde(default = "default_operation_type")]
    pub tipo_operacion: String,
    #[serde(default)]
    pub cliente_tipo_doc: CustomerDocType,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Customer RUC or DNI number, depending on clienteTipoDoc
    #[serde(default)]
    pub customer_ruc: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    pub items: Vec<LineItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadItem {
    pub descripcion: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cantidad: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio_unitario: Decimal,
    pub codigo: String,
    pub tip_afe_igv: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub gravadas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub exoneradas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub igv: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_venta: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<TaxTotals> for PayloadTotals {
    fn from(totals: TaxTotals) -> Self {
        PayloadTotals {
            gravadas: totals.taxable_base,
            exoneradas: totals.exempt_base,
            igv: totals.tax,
            valor_venta: totals.net_value,
            sub_total: totals.sub_total(),
            total: totals.grand_total,
        }
    }
}

/// Body posted to the invoicing API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub ruc: String,
    pub tipo_documento: DocumentType,
    pub serie: String,
    pub numero: String,
    pub fecha_emision: NaiveDate,
    pub tipo_moneda: Currency,
    pub tipo_operacion: String,
    pub cliente_tipo_doc: CustomerDocType,
    pub customer_email: String,
    pub customer_ruc: String,
    pub customer_name: String,
    pub customer_address: String,
    pub items: Vec<PayloadItem>,
    #[serde(flatten)]
    pub totals: PayloadTotals,
}

impl InvoicePayload {
    /// Validate a draft and attach issuer and totals.
    ///
    /// Unlike the totals shown while editing, an invoice is only built when
    /// every line item counts towards the totals.
    pub fn build(
        draft: &InvoiceDraft,
        issuer_ruc: &str,
        config: &TaxConfig,
        today: NaiveDate,
    ) -> Result<Self, InvoiceError> {
        let issuer_ruc = issuer_ruc.trim();
        if !is_digits(issuer_ruc, 11) {
            return Err(InvoiceError::InvalidIssuerRuc(issuer_ruc.to_string()));
        }

        let serie = normalize_serie(&draft.serie)?;
        let numero = required(&draft.numero, "numero")?;
        let tipo_operacion = required(&draft.tipo_operacion, "tipoOperacion")?;
        let customer_ruc = validate_customer_document(draft.cliente_tipo_doc, &draft.customer_ruc)?;
        let customer_name = required(&draft.customer_name, "customerName")?;
        let customer_address = required(&draft.customer_address, "customerAddress")?;

        if draft.items.is_empty() {
            return Err(InvoiceError::NoItems);
        }
        let mut items = Vec::with_capacity(draft.items.len());
        for (index, record) in draft.items.iter().enumerate() {
            let item = record
                .parse()
                .map_err(|source| InvoiceError::InvalidItem { index, source })?;
            if item.description.is_none() {
                return Err(InvoiceError::MissingDescription { index });
            }
            items.push(item);
        }

        let issues = validate_items(&items, config);
        if !issues.is_empty() {
            return Err(InvoiceError::InvalidItems(issues));
        }
        let totals = calculate_totals(&items, config);

        let items = items
            .into_iter()
            .map(|item| PayloadItem {
                descripcion: item.description.unwrap_or_default(),
                cantidad: item.quantity,
                precio_unitario: item.unit_price,
                codigo: item.code.unwrap_or_default(),
                tip_afe_igv: item.affectation_code,
            })
            .collect();

        Ok(InvoicePayload {
            ruc: issuer_ruc.to_string(),
            tipo_documento: draft.tipo_documento,
            serie,
            numero,
            fecha_emision: draft.fecha_emision.unwrap_or(today),
            tipo_moneda: draft.tipo_moneda,
            tipo_operacion,
            cliente_tipo_doc: draft.cliente_tipo_doc,
            customer_email: draft
                .customer_email
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            customer_ruc,
            customer_name,
            customer_address,
            items,
            totals: totals.into(),
        })
    }

    pub fn document_ref(&self) -> DocumentRef {
        DocumentRef {
            empresa_ruc: self.ruc.clone(),
            tipo_doc: self.tipo_documento,
            serie: self.serie.clone(),
            correlativo: self.numero.clone(),
        }
    }
}

/// Artefacts the invoicing API returns for an issued document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Xml,
    /// SUNAT receipt (constancia de recepción), zipped
    Cdr,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Pdf, DocumentKind::Xml, DocumentKind::Cdr];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Xml => "xml",
            DocumentKind::Cdr => "zip",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Xml => "application/xml",
            DocumentKind::Cdr => "application/zip",
        }
    }

    /// Path segment of the download endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Xml => "xml",
            DocumentKind::Cdr => "cdr",
        }
    }
}

/// Key identifying an issued document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    #[serde(rename = "empresa_Ruc")]
    pub empresa_ruc: String,
    #[serde(rename = "tipo_Doc")]
    pub tipo_doc: DocumentType,
    pub serie: String,
    pub correlativo: String,
}

impl DocumentRef {
    pub fn file_name(&self, kind: DocumentKind) -> String {
        format!(
            "{}-{}-{}.{}",
            self.tipo_doc.code(),
            self.serie,
            self.correlativo,
            kind.extension()
        )
    }
}
