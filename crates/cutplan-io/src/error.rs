//! 讀取與匯出錯誤類型

use thiserror::Error;

/// 檔案讀寫錯誤
#[derive(Error, Debug)]
pub enum IoError {
    #[error("檔案不存在: {0}")]
    FileNotFound(String),

    #[error("檔案格式不支援: {0}（僅支援 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("檔案讀取失敗: {0}")]
    FileReadError(String),

    #[error("Excel 解析失敗: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失敗: {0}")]
    CsvParseError(String),

    #[error("缺少必要欄位: {0}")]
    MissingColumn(String),

    #[error("JSON 處理失敗: {0}")]
    JsonError(String),

    #[error("檔案寫入失敗: {0}")]
    WriteError(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for IoError {
    fn from(err: csv::Error) -> Self {
        IoError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for IoError {
    fn from(err: calamine::Error) -> Self {
        IoError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(err: serde_json::Error) -> Self {
        IoError::JsonError(err.to_string())
    }
}

/// Result 類型別名
pub type IoResult<T> = Result<T, IoError>;
