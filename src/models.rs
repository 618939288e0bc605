use indexmap::IndexMap;
use serde::Serialize;

/// A normalized cell value as it appears in the JSON output.
///
/// Dates never appear here as a distinct type: they are rendered to
/// `YYYY-MM-DD` strings during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

/// One non-blank data row, keyed by header in header order.
pub type Record = IndexMap<String, CellValue>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    /// Records actually produced for this sheet.
    pub row_count: usize,
    pub column_count: usize,
    /// Rows of the used range below the header row, blank or not.
    #[serde(skip)]
    pub candidate_rows: usize,
}

impl ExcelSheet {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            sheet_name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            column_count: 0,
            candidate_rows: 0,
        }
    }

    pub fn skipped_rows(&self) -> usize {
        self.candidate_rows.saturating_sub(self.rows.len())
    }
}

#[derive(Debug, Clone)]
pub struct ExcelData {
    pub file_name: String,
    pub total_sheets: usize,
    pub sheets: Vec<ExcelSheet>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionResult {
    pub success: bool,
    pub output_path: String,
    pub output_file_size: u64,
    pub sheets_processed: usize,
    pub total_rows: usize,
    pub rows_converted: usize,
    pub empty_rows_skipped: usize,
    pub columns_detected: usize,
    pub warnings: Vec<String>,
}
