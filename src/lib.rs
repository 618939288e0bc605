pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use models::{CellValue, ConversionResult, ExcelData, ExcelSheet, Record};
pub use services::{ConversionSummary, ExcelConverter};
