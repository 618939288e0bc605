use std::borrow::Cow;

use super::types::{CellKind, DATE_FORMAT, HEADER_PLACEHOLDER_PREFIX};
use crate::models::CellValue;

// 2^63, the first magnitude an i64 can't hold.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Normalizes a cell into its JSON-compatible value.
pub fn normalize_cell(kind: &CellKind<'_>) -> CellValue {
    match kind {
        CellKind::Blank => CellValue::Null,
        CellKind::Text(s) => CellValue::String((*s).to_string()),
        CellKind::Integer(i) => CellValue::Integer(*i),
        CellKind::Number(f) => number_value(*f),
        CellKind::Date(date) => CellValue::String(date.format(DATE_FORMAT).to_string()),
        CellKind::Boolean(b) => CellValue::Boolean(*b),
        CellKind::Formula { result, .. } => match &**result {
            CellKind::Text(_)
            | CellKind::Integer(_)
            | CellKind::Number(_)
            | CellKind::Date(_)
            | CellKind::Boolean(_) => normalize_cell(result),
            _ => CellValue::Null,
        },
        CellKind::Error(s) | CellKind::Other(s) => CellValue::String(s.clone()),
    }
}

/// Integral numbers become integers, everything else stays a float.
pub fn number_value(f: f64) -> CellValue {
    if f.is_finite() && f == f.floor() && f.abs() < I64_LIMIT {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// String form of a cell, used for header text and blank-row detection.
pub fn cell_as_string<'a>(kind: &CellKind<'a>) -> Cow<'a, str> {
    match kind {
        CellKind::Blank => Cow::Borrowed(""),
        CellKind::Text(s) => Cow::Borrowed(*s),
        CellKind::Integer(i) => Cow::Owned(i.to_string()),
        CellKind::Number(f) => Cow::Owned(f.to_string()),
        CellKind::Date(date) => Cow::Owned(date.format(DATE_FORMAT).to_string()),
        CellKind::Boolean(b) => Cow::Owned(b.to_string()),
        CellKind::Formula { expression, .. } => Cow::Borrowed(*expression),
        CellKind::Error(s) | CellKind::Other(s) => Cow::Owned(s.clone()),
    }
}

pub fn is_blank_cell(kind: &CellKind<'_>) -> bool {
    match kind {
        CellKind::Blank => true,
        other => cell_as_string(other).trim().is_empty(),
    }
}

pub fn is_blank_row(cells: &[CellKind<'_>]) -> bool {
    cells.iter().all(is_blank_cell)
}

/// Header text for a cell, or a positional placeholder when the text is empty.
pub fn header_name(kind: &CellKind<'_>, column_index: usize) -> String {
    let text = cell_as_string(kind);
    if text.is_empty() {
        format!("{}{}", HEADER_PLACEHOLDER_PREFIX, column_index)
    } else {
        text.into_owned()
    }
}

/// A1-style reference for a zero-based position, used in diagnostics.
pub fn cell_reference(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col as u64 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    let column: String = letters.iter().rev().collect();
    format!("{}{}", column, row as u64 + 1)
}
