use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ConversionResult, ExcelData, ExcelSheet};
use crate::services::excel::SheetReader;

/// Row and column statistics aggregated across all sheets of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total_rows: usize,
    pub rows_converted: usize,
    pub empty_rows_skipped: usize,
    pub columns_detected: usize,
    pub empty_sheets: usize,
}

impl ConversionSummary {
    pub fn from_sheets(sheets: &[ExcelSheet]) -> Self {
        sheets.iter().fold(Self::default(), |mut summary, sheet| {
            summary.total_rows += sheet.candidate_rows;
            summary.rows_converted += sheet.rows.len();
            summary.empty_rows_skipped += sheet.skipped_rows();
            summary.columns_detected = summary.columns_detected.max(sheet.column_count);
            if sheet.candidate_rows == 0 {
                summary.empty_sheets += 1;
            }
            summary
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.empty_rows_skipped > 0 {
            warnings.push(format!("{} empty row(s) were skipped", self.empty_rows_skipped));
        }
        if self.empty_sheets > 0 {
            warnings.push(format!("{} empty sheet(s) detected", self.empty_sheets));
        }
        warnings
    }
}

/// The JSON document written to the output file.
///
/// `total_rows` carries the number of converted rows, not the number of
/// candidate rows read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDocument<'a> {
    pub file_name: &'a str,
    pub total_sheets: usize,
    pub total_rows: usize,
    pub sheets: &'a [ExcelSheet],
}

pub fn build_document<'a>(data: &'a ExcelData, summary: &ConversionSummary) -> JsonDocument<'a> {
    JsonDocument {
        file_name: &data.file_name,
        total_sheets: data.total_sheets,
        total_rows: summary.rows_converted,
        sheets: &data.sheets,
    }
}

pub struct ExcelConverter {
    reader: SheetReader,
    config: Config,
}

impl ExcelConverter {
    pub fn new(config: Config) -> Self {
        Self {
            reader: SheetReader,
            config,
        }
    }

    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionResult, AppError> {
        info!("Starting conversion: {} -> {}", input.display(), output.display());

        let data = self.reader.read_workbook(input, &self.config).map_err(|e| {
            error!("Conversion failed while reading {}: {}", input.display(), e);
            e
        })?;

        let summary = ConversionSummary::from_sheets(&data.sheets);
        debug!("Conversion summary: {:?}", summary);

        let document = build_document(&data, &summary);
        let output_file_size = self.write_document(&document, output).map_err(|e| {
            error!("Conversion failed while writing {}: {}", output.display(), e);
            e
        })?;
        info!("JSON file written: {} ({} bytes)", output.display(), output_file_size);

        Ok(ConversionResult {
            success: true,
            output_path: output.display().to_string(),
            output_file_size,
            sheets_processed: data.total_sheets,
            total_rows: summary.total_rows,
            rows_converted: summary.rows_converted,
            empty_rows_skipped: summary.empty_rows_skipped,
            columns_detected: summary.columns_detected,
            warnings: summary.warnings(),
        })
    }

    /// Serializes the document to `output` and returns the written size in bytes.
    fn write_document(&self, document: &JsonDocument<'_>, output: &Path) -> Result<u64, AppError> {
        if self.config.atomic_write {
            // Temp file in the destination directory so the rename stays on one device.
            let dir = output
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut tmp = NamedTempFile::new_in(dir)?;
            {
                let mut writer = BufWriter::new(tmp.as_file_mut());
                self.serialize(&mut writer, document)?;
                writer.flush()?;
            }
            tmp.as_file().sync_all()?;
            tmp.persist(output).map_err(|e| AppError::IoError(e.error))?;
        } else {
            let mut writer = BufWriter::new(File::create(output)?);
            self.serialize(&mut writer, document)?;
            writer.flush()?;
        }

        Ok(fs::metadata(output)?.len())
    }

    fn serialize<W: Write>(&self, writer: W, document: &JsonDocument<'_>) -> Result<(), AppError> {
        if self.config.pretty {
            serde_json::to_writer_pretty(writer, document)?;
        } else {
            serde_json::to_writer(writer, document)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Record};

    fn sheet(name: &str, columns: usize, candidate_rows: usize, records: usize) -> ExcelSheet {
        let headers: Vec<String> = (0..columns).map(|i| format!("h{i}")).collect();
        let rows: Vec<Record> = (0..records)
            .map(|r| {
                headers
                    .iter()
                    .map(|h| (h.clone(), CellValue::Integer(r as i64)))
                    .collect()
            })
            .collect();
        ExcelSheet {
            sheet_name: name.to_string(),
            headers,
            row_count: rows.len(),
            rows,
            column_count: columns,
            candidate_rows,
        }
    }

    #[test]
    fn summary_accounts_for_every_candidate_row() {
        let sheets = vec![sheet("a", 2, 5, 3), sheet("b", 4, 2, 2), ExcelSheet::empty("c")];

        let summary = ConversionSummary::from_sheets(&sheets);

        assert_eq!(summary.total_rows, 7);
        assert_eq!(summary.rows_converted, 5);
        assert_eq!(summary.empty_rows_skipped, 2);
        assert_eq!(summary.rows_converted + summary.empty_rows_skipped, summary.total_rows);
        assert_eq!(summary.columns_detected, 4);
        assert_eq!(summary.empty_sheets, 1);
        assert_eq!(
            summary.warnings(),
            vec!["2 empty row(s) were skipped", "1 empty sheet(s) detected"]
        );
    }

    #[test]
    fn no_sheets_means_no_columns_and_no_warnings() {
        let summary = ConversionSummary::from_sheets(&[]);
        assert_eq!(summary, ConversionSummary::default());
        assert!(summary.warnings().is_empty());
    }

    #[test]
    fn header_only_sheet_is_counted_as_empty() {
        let summary = ConversionSummary::from_sheets(&[sheet("only-headers", 3, 0, 0)]);
        assert_eq!(summary.columns_detected, 3);
        assert_eq!(summary.empty_sheets, 1);
        assert_eq!(summary.warnings(), vec!["1 empty sheet(s) detected"]);
    }

    #[test]
    fn document_reports_converted_rows_as_total() {
        let data = ExcelData {
            file_name: "book.xlsx".to_string(),
            total_sheets: 1,
            sheets: vec![sheet("a", 1, 4, 1)],
        };
        let summary = ConversionSummary::from_sheets(&data.sheets);

        let value = serde_json::to_value(build_document(&data, &summary)).unwrap();

        assert_eq!(value["fileName"], "book.xlsx");
        assert_eq!(value["totalSheets"], 1);
        assert_eq!(value["totalRows"], 1);
        assert_eq!(value["sheets"][0]["sheetName"], "a");
        assert_eq!(value["sheets"][0]["rowCount"], 1);
        assert_eq!(value["sheets"][0]["columnCount"], 1);
        assert_eq!(value["sheets"][0]["rows"][0]["h0"], 0);
    }

    #[test]
    fn failed_read_propagates_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.xlsx");
        std::fs::write(&input, b"definitely not a zip").unwrap();
        let output = dir.path().join("out.json");

        let err = ExcelConverter::new(Config::default())
            .convert(&input, &output)
            .unwrap_err();

        assert!(matches!(err, AppError::FileProcessingError(_)));
        assert!(!output.exists());
    }
}
