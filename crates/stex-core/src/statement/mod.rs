//! Bank statement text parsing.
//!
//! Turns raw OCR text into transaction rows: line-shape cascade in
//! [`patterns`], token normalization in [`amounts`] and [`dates`], and
//! the filtering/dedup pipeline in [`parser`].

pub mod amounts;
pub mod dates;
pub mod parser;
pub mod patterns;

pub use amounts::parse_amount;
pub use dates::normalize_date;
pub use parser::{ParsedLine, StatementParser, parse_bank_statement};
