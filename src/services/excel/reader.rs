use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::{debug, error, info, warn};

use super::types::CellKind;
use super::utils::*;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{CellValue, ExcelData, ExcelSheet, Record};

/// Reads every sheet of a workbook into header-keyed records.
pub struct SheetReader;

impl SheetReader {
    pub fn read_workbook(&self, path: &Path, config: &Config) -> Result<ExcelData, AppError> {
        let start = std::time::Instant::now();
        info!("Reading workbook {}", path.display());

        let size = fs::metadata(path)
            .map_err(|e| {
                error!("Failed to stat {}: {}", path.display(), e);
                e
            })?
            .len();
        if size > config.max_file_size as u64 {
            return Err(AppError::InvalidInput(format!(
                "{} is {} bytes, above the {} byte limit",
                path.display(),
                size,
                config.max_file_size
            )));
        }

        let data = fs::read(path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            e
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let workbook = self.read_workbook_from_bytes(&file_name, data)?;
        info!("Workbook read in {:?}", start.elapsed());
        Ok(workbook)
    }

    pub fn read_workbook_from_bytes(&self, file_name: &str, data: Vec<u8>) -> Result<ExcelData, AppError> {
        let cursor = Cursor::new(data);

        let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| {
            error!("Failed to open workbook {}: {}", file_name, e);
            AppError::FileProcessingError(format!("Failed to open workbook {}: {}", file_name, e))
        })?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for sheet_name in &sheet_names {
            let range = workbook.worksheet_range(sheet_name).map_err(|e| {
                error!("Failed to read worksheet {}: {}", sheet_name, e);
                AppError::FileProcessingError(format!("Failed to read worksheet {}: {}", sheet_name, e))
            })?;

            let formulas = match workbook.worksheet_formula(sheet_name) {
                Ok(formulas) => Some(formulas),
                Err(e) => {
                    warn!("No formula information for sheet {}: {}", sheet_name, e);
                    None
                }
            };

            let sheet = self.read_sheet(sheet_name, &range, formulas.as_ref());
            info!(
                "Sheet '{}' processed: {} rows, {} columns",
                sheet.sheet_name, sheet.row_count, sheet.column_count
            );
            sheets.push(sheet);
        }

        Ok(ExcelData {
            file_name: file_name.to_string(),
            total_sheets: sheets.len(),
            sheets,
        })
    }

    /// Normalizes one sheet. The first row of the used range holds the headers.
    pub fn read_sheet(
        &self,
        name: &str,
        values: &Range<Data>,
        formulas: Option<&Range<String>>,
    ) -> ExcelSheet {
        let mut rows = values.rows();
        let header_row = match rows.next() {
            Some(row) if !values.is_empty() => row,
            _ => {
                warn!("Sheet '{}' is empty", name);
                return ExcelSheet::empty(name);
            }
        };

        let (start_row, start_col) = values.start().unwrap_or((0, 0));
        let formula_at = |row: u32, col: u32| {
            formulas
                .and_then(|f| f.get_value((row, col)))
                .map(String::as_str)
        };

        let headers: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(offset, value)| {
                let col = start_col + offset as u32;
                let kind = CellKind::from(value).with_formula(formula_at(start_row, col));
                header_name(&kind, col as usize)
            })
            .collect();
        let column_count = headers.len();
        debug!("Sheet '{}' headers: {:?}", name, headers);

        let mut records = Vec::new();
        let mut candidate_rows = 0;
        for (offset, row) in rows.enumerate() {
            candidate_rows += 1;
            let row_index = start_row + 1 + offset as u32;

            let cells: Vec<CellKind<'_>> = row
                .iter()
                .enumerate()
                .map(|(col_offset, value)| {
                    let col = start_col + col_offset as u32;
                    CellKind::from(value).with_formula(formula_at(row_index, col))
                })
                .collect();

            if is_blank_row(&cells) {
                debug!("Sheet '{}': skipping blank row {}", name, row_index + 1);
                continue;
            }

            let mut record = Record::with_capacity(column_count);
            for (col_offset, header) in headers.iter().enumerate() {
                let value = match cells.get(col_offset) {
                    Some(kind) => {
                        if let Some(expression) = kind.formula_failure() {
                            warn!(
                                "Sheet '{}': unable to evaluate formula ={} at {}",
                                name,
                                expression,
                                cell_reference(row_index, start_col + col_offset as u32)
                            );
                        }
                        normalize_cell(kind)
                    }
                    None => CellValue::Null,
                };
                record.insert(header.clone(), value);
            }
            records.push(record);
        }

        ExcelSheet {
            sheet_name: name.to_string(),
            headers,
            row_count: records.len(),
            rows: records,
            column_count,
            candidate_rows,
        }
    }
}
