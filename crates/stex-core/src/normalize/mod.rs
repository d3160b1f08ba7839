//! Normalization of parsed documents into canonical transactions.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::transaction::{
    DocKind, InvoiceData, NormalizedTransaction, ParsedDocument, ReceiptData, TransactionItem,
};
use crate::statement::{ParsedLine, normalize_date};

/// Map a parsed document into zero or more canonical transactions.
///
/// Receipts and invoices produce at most one transaction; bank
/// statements produce one per usable row. Anything without a positive
/// resolved amount is dropped, dates that do not resolve stay `None`,
/// and a missing currency defaults to USD.
pub fn to_transactions(
    user_id: &str,
    doc: &ParsedDocument,
    doc_id: Option<&str>,
) -> Vec<NormalizedTransaction> {
    let transactions: Vec<NormalizedTransaction> = match doc {
        ParsedDocument::Receipt(receipt) => {
            from_receipt(user_id, receipt, doc_id).into_iter().collect()
        }
        ParsedDocument::Invoice(invoice) => {
            from_invoice(user_id, invoice, doc_id).into_iter().collect()
        }
        ParsedDocument::Bank(bank) => bank
            .transactions
            .iter()
            .filter(|row| row.amount.is_some_and(|a| a > Decimal::ZERO))
            .map(|row| NormalizedTransaction {
                user_id: user_id.to_string(),
                kind: DocKind::Bank,
                date: row.date.as_deref().and_then(normalize_date),
                merchant: row.merchant.clone().or_else(|| row.description.clone()),
                amount: row.amount,
                currency: Some(normalize_currency(row.currency.as_deref())),
                items: None,
                doc_id: doc_id.map(str::to_string),
            })
            .collect(),
    };

    debug!(count = transactions.len(), "normalized document");
    transactions
}

fn from_receipt(
    user_id: &str,
    receipt: &ReceiptData,
    doc_id: Option<&str>,
) -> Option<NormalizedTransaction> {
    let amount = receipt.total.filter(|t| *t > Decimal::ZERO)?;
    let items: Vec<TransactionItem> = receipt
        .items
        .iter()
        .map(|item| TransactionItem {
            name: item.name.clone(),
            qty: item.qty,
            unit: None,
            price: item.price,
        })
        .collect();

    Some(NormalizedTransaction {
        user_id: user_id.to_string(),
        kind: DocKind::Receipt,
        date: receipt.date.as_deref().and_then(normalize_date),
        merchant: receipt.merchant.clone(),
        amount: Some(amount),
        currency: Some(normalize_currency(receipt.currency.as_deref())),
        items: (!items.is_empty()).then_some(items),
        doc_id: doc_id.map(str::to_string),
    })
}

fn from_invoice(
    user_id: &str,
    invoice: &InvoiceData,
    doc_id: Option<&str>,
) -> Option<NormalizedTransaction> {
    // Grand total when present, otherwise reconstruct from subtotal.
    let amount = invoice
        .total
        .or_else(|| match (invoice.subtotal, invoice.tax) {
            (Some(subtotal), Some(tax)) => Some(subtotal + tax),
            (Some(subtotal), None) => Some(subtotal),
            _ => None,
        })
        .filter(|a| *a > Decimal::ZERO)?;

    let items: Vec<TransactionItem> = invoice
        .line_items
        .iter()
        .map(|item| TransactionItem {
            name: item.desc.clone(),
            qty: item.qty,
            unit: item.unit.clone(),
            price: item.price,
        })
        .collect();

    Some(NormalizedTransaction {
        user_id: user_id.to_string(),
        kind: DocKind::Invoice,
        date: invoice.date.as_deref().and_then(normalize_date),
        merchant: invoice.vendor.clone(),
        amount: Some(amount),
        currency: Some(normalize_currency(invoice.currency.as_deref())),
        items: (!items.is_empty()).then_some(items),
        doc_id: doc_id.map(str::to_string),
    })
}

/// Bridge from the statement line parser.
pub fn from_statement(user_id: &str, lines: &[ParsedLine]) -> Vec<NormalizedTransaction> {
    lines
        .iter()
        .map(|line| NormalizedTransaction {
            user_id: user_id.to_string(),
            kind: DocKind::Bank,
            date: line.date,
            merchant: Some(line.merchant.clone()),
            amount: Some(line.amount),
            currency: Some("USD".to_string()),
            items: None,
            doc_id: None,
        })
        .collect()
}

fn normalize_currency(currency: Option<&str>) -> String {
    currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| c.len() == 3)
        .unwrap_or_else(|| "USD".to_string())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::models::transaction::{BankData, BankRow, InvoiceData, ReceiptData, ReceiptItem};

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_receipt_normalization() {
        let doc = ParsedDocument::Receipt(ReceiptData {
            merchant: Some("SAFEWAY".to_string()),
            date: Some("01/15/2024".to_string()),
            total: Some(dec("32.50")),
            currency: Some("usd".to_string()),
            items: vec![ReceiptItem {
                name: "MILK 2L".to_string(),
                qty: Some(dec("1")),
                price: Some(dec("4.50")),
            }],
        });
        let txs = to_transactions("u1", &doc, Some("doc-9"));
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].kind, DocKind::Receipt);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(txs[0].currency.as_deref(), Some("USD"));
        assert_eq!(txs[0].items.as_ref().unwrap().len(), 1);
        assert_eq!(txs[0].doc_id.as_deref(), Some("doc-9"));
    }

    #[test]
    fn test_invoice_total_from_subtotal_and_tax() {
        let doc = ParsedDocument::Invoice(InvoiceData {
            vendor: Some("ACME CORP".to_string()),
            subtotal: Some(dec("100.00")),
            tax: Some(dec("12.00")),
            ..Default::default()
        });
        let txs = to_transactions("u1", &doc, None);
        assert_eq!(txs[0].amount, Some(dec("112.00")));
        assert_eq!(txs[0].kind, DocKind::Invoice);
    }

    #[test]
    fn test_invoice_total_wins_over_subtotal() {
        let doc = ParsedDocument::Invoice(InvoiceData {
            total: Some(dec("50.00")),
            subtotal: Some(dec("100.00")),
            ..Default::default()
        });
        let txs = to_transactions("u1", &doc, None);
        assert_eq!(txs[0].amount, Some(dec("50.00")));
    }

    #[test]
    fn test_bank_rows_without_positive_amount_dropped() {
        let doc = ParsedDocument::Bank(BankData {
            transactions: vec![
                BankRow {
                    merchant: Some("WALMART".to_string()),
                    amount: Some(dec("45.67")),
                    ..Default::default()
                },
                BankRow {
                    merchant: Some("VOID".to_string()),
                    amount: Some(Decimal::ZERO),
                    ..Default::default()
                },
                BankRow {
                    merchant: Some("PENDING".to_string()),
                    amount: None,
                    ..Default::default()
                },
            ],
        });
        let txs = to_transactions("u1", &doc, None);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].merchant.as_deref(), Some("WALMART"));
    }

    #[test]
    fn test_receipt_without_positive_total_dropped() {
        let zero = ParsedDocument::Receipt(ReceiptData {
            merchant: Some("VOID MART".to_string()),
            total: Some(Decimal::ZERO),
            ..Default::default()
        });
        assert!(to_transactions("u1", &zero, None).is_empty());

        let missing = ParsedDocument::Receipt(ReceiptData::default());
        assert!(to_transactions("u1", &missing, None).is_empty());
    }

    #[test]
    fn test_invoice_without_positive_amount_dropped() {
        let doc = ParsedDocument::Invoice(InvoiceData {
            vendor: Some("ACME CORP".to_string()),
            total: Some(dec("-12.00")),
            ..Default::default()
        });
        assert!(to_transactions("u1", &doc, None).is_empty());
    }

    #[test]
    fn test_missing_currency_defaults_to_usd() {
        let doc = ParsedDocument::Receipt(ReceiptData {
            total: Some(dec("9.99")),
            ..Default::default()
        });
        let txs = to_transactions("u1", &doc, None);
        assert_eq!(txs[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_from_statement_bridge() {
        let lines = crate::statement::parse_bank_statement("01/15/2024 WALMART $45.67");
        let txs = from_statement("u1", &lines);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].kind, DocKind::Bank);
        assert_eq!(txs[0].merchant.as_deref(), Some("WALMART"));
        assert_eq!(txs[0].amount, Some(dec("45.67")));
    }
}
