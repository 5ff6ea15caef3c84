//! # Cut Plan IO
//!
//! 模具目錄讀取（CSV / Excel）與計劃報表匯出（文字 / CSV / JSON）

pub mod error;
pub mod export;
pub mod loader;

pub use error::{IoError, IoResult};
pub use export::{ExportedFiles, ReportExporter};
pub use loader::{CatalogLoader, ColumnMapping, CsvParser, ExcelParser, FileParser, ParsedSheet};
