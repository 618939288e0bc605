pub mod converter;
pub mod excel;

pub use converter::{ConversionSummary, ExcelConverter};
