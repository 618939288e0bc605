pub mod reader;
pub mod types;
pub mod utils;

pub use reader::SheetReader;
