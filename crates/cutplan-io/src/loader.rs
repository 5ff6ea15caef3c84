//! 模具目錄讀取
//!
//! 依副檔名選擇 CSV 或 Excel 解析器，第一列為表頭，
//! 完全空白的列直接略過，其餘交由 `Catalog::from_raw_rows` 清洗。

use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use cutplan_core::{Catalog, RawDieRow};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::{IoError, IoResult};

/// 解析後的工作表（表頭 + 以表頭為鍵的資料列）
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub records: Vec<HashMap<String, String>>,
}

impl ParsedSheet {
    fn from_rows<I, R>(headers: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let mut records = Vec::new();

        for row in rows {
            let mut row_map = HashMap::new();
            for (col_idx, value) in row.into_iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳過完全空白的列
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Self { headers, records }
    }
}

/// 檔案解析器
pub trait FileParser {
    fn parse(&self, path: &Path) -> IoResult<ParsedSheet>;
}

/// CSV 解析器
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> IoResult<ParsedSheet> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允許列長度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Ok(ParsedSheet::from_rows(headers, rows))
    }
}

/// Excel 解析器（.xlsx / .xls，讀取第一個工作表）
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, path: &Path) -> IoResult<ParsedSheet> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IoError::ExcelParseError("Excel 檔案無工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| IoError::ExcelParseError("Excel 檔案無資料列".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let data_rows = rows.map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

        Ok(ParsedSheet::from_rows(headers, data_rows))
    }
}

/// 目錄欄位對應
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub die_id: String,
    pub material_type: String,
    pub thickness: String,
    pub development_length: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            die_id: "Matriz".to_string(),
            material_type: "Tipo de material".to_string(),
            thickness: "Espessura".to_string(),
            development_length: "Desenvolvimento".to_string(),
        }
    }
}

impl ColumnMapping {
    fn required(&self) -> [&str; 4] {
        [
            self.die_id.as_str(),
            self.material_type.as_str(),
            self.thickness.as_str(),
            self.development_length.as_str(),
        ]
    }

    fn to_raw_row(&self, record: &HashMap<String, String>) -> RawDieRow {
        RawDieRow {
            die_id: record.get(&self.die_id).cloned(),
            material_type: record.get(&self.material_type).cloned(),
            thickness: record.get(&self.thickness).cloned(),
            development_length: record.get(&self.development_length).cloned(),
        }
    }
}

/// 模具目錄讀取器
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    mapping: ColumnMapping,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自訂欄位對應
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// 讀取目錄檔案
    pub fn load<P: AsRef<Path>>(&self, path: P) -> IoResult<Catalog> {
        let path = path.as_ref();
        tracing::info!("讀取模具目錄: {}", path.display());

        let sheet = Self::parse_file(path)?;

        for column in self.mapping.required() {
            if !sheet.headers.iter().any(|h| h == column) {
                return Err(IoError::MissingColumn(column.to_string()));
            }
        }

        let catalog = Catalog::from_raw_rows(
            sheet
                .records
                .iter()
                .map(|record| self.mapping.to_raw_row(record)),
        );

        tracing::info!(
            "模具目錄載入完成：有效 {} 筆，丟棄 {} 筆",
            catalog.len(),
            catalog.rejected_rows()
        );
        if catalog.rejected_rows() > 0 {
            tracing::debug!("丟棄的列含無效編號、非數值或非正數的厚度/展開長度");
        }

        Ok(catalog)
    }

    /// 依副檔名選擇解析器
    pub fn parse_file(path: &Path) -> IoResult<ParsedSheet> {
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(path),
            "xlsx" | "xls" => ExcelParser.parse(path),
            _ => Err(IoError::UnsupportedFormat(ext)),
        }
    }
}
