//! Line-shape patterns for bank statement text.
//!
//! OCR output mixes several transaction layouts in one document, so each
//! line is tried against the shapes in a fixed cascade. The dual-date
//! shape runs first: a date-first shape would otherwise swallow the
//! posting date into the description.

use lazy_static::lazy_static;
use regex::Regex;

// Token fragments shared by the shapes.
const DATE: &str = r"\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}";
const AMOUNT: &str = r"[$+\-]{0,2}(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?";

/// One recognized line layout: a compiled pattern plus the capture-group
/// indices of its fields. `date: None` marks shapes whose date token has
/// no year and cannot be resolved to a calendar date.
pub struct LineShape {
    pub pattern: Regex,
    pub date: Option<usize>,
    pub description: usize,
    pub amount: usize,
}

lazy_static! {
    /// Shapes in match order. First match wins per line.
    pub static ref LINE_SHAPES: Vec<LineShape> = vec![
        // Transaction date, posting date, description, amount
        LineShape {
            pattern: Regex::new(&format!(r"^({DATE})\s+(?:{DATE})\s+(.+?)\s+({AMOUNT})$"))
                .unwrap(),
            date: Some(1),
            description: 2,
            amount: 3,
        },
        // Date, description, amount
        LineShape {
            pattern: Regex::new(&format!(r"^({DATE})\s+(.+?)\s+({AMOUNT})$")).unwrap(),
            date: Some(1),
            description: 2,
            amount: 3,
        },
        // Date, amount, description
        LineShape {
            pattern: Regex::new(&format!(r"^({DATE})\s+({AMOUNT})\s+(.+)$")).unwrap(),
            date: Some(1),
            description: 3,
            amount: 2,
        },
        // Card-statement short date (no year), description, amount
        LineShape {
            pattern: Regex::new(&format!(
                r"^(?:\d{{1,2}}[/.\-]\d{{1,2}})\s+(.+?)\s+({AMOUNT})$"
            ))
            .unwrap(),
            date: None,
            description: 1,
            amount: 2,
        },
        // Description, date, amount
        LineShape {
            pattern: Regex::new(&format!(r"^(.+?)\s+({DATE})\s+({AMOUNT})$")).unwrap(),
            date: Some(2),
            description: 1,
            amount: 3,
        },
    ];

    /// Characters allowed in a cleaned description.
    pub static ref NON_DESCRIPTION: Regex = Regex::new(r"[^\w\s\-.,&()]").unwrap();

    pub static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Corporate suffix at the end of a merchant string.
    pub static ref MERCHANT_SUFFIX: Regex =
        Regex::new(r"(?i)\s+(?:INC|LLC|CORP|LTD|CO)\.?$").unwrap();

    /// Trailing store number.
    pub static ref MERCHANT_STORE_NUMBER: Regex = Regex::new(r"\s+\d{4}$").unwrap();
}

/// Keywords marking totals, balances, and other non-transaction lines.
pub const SUMMARY_KEYWORDS: &[&str] = &[
    "total",
    "balance",
    "subtotal",
    "grand total",
    "statement",
    "page",
    "credit limit",
    "available credit",
    "minimum payment",
    "due date",
    "previous balance",
    "new balance",
    "payment received",
    "interest",
    "fees",
    "charges",
    "deposits",
    "withdrawals",
    "transfers",
];
