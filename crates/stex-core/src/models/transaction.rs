//! Canonical transaction models and parsed-document inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of source document a transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// Vendor invoice.
    Invoice,
    /// Point-of-sale receipt.
    Receipt,
    /// Bank or credit-card statement.
    Bank,
}

/// One canonical transaction record.
///
/// Created per extracted line/record, handed straight to the categorizer,
/// then persisted by the storage collaborator. Never mutated after
/// normalization - corrections are a separate workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// Owning user.
    pub user_id: String,

    /// Source document kind.
    pub kind: DocKind,

    /// Transaction date (ISO 8601 when serialized).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Merchant or vendor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    /// Transaction amount, always positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// ISO 4217 currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Item lines, when the source document had them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TransactionItem>>,

    /// Source document identifier, set by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

/// One item line on a receipt or invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    /// Item name/description.
    pub name: String,

    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,

    /// Unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Unit or line price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// A parsed document as produced by the upstream OCR collaborator.
///
/// Field shapes are source-specific; [`crate::normalize::to_transactions`]
/// maps all three into [`NormalizedTransaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedDocument {
    /// Point-of-sale receipt.
    Receipt(ReceiptData),
    /// Vendor invoice.
    Invoice(InvoiceData),
    /// Bank statement with pre-split transaction rows.
    Bank(BankData),
}

/// Receipt payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    /// Raw date string as read off the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

/// One receipt item line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// Invoice payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Raw date string as read off the invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Grand total. When absent, subtotal + tax is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default)]
    pub line_items: Vec<InvoiceItem>,
}

/// One invoice line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// Bank-statement payload with rows already split by the upstream parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankData {
    #[serde(default)]
    pub transactions: Vec<BankRow>,
}

/// One pre-split bank statement row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
