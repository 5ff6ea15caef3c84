//! # Cut Plan Core
//!
//! 核心資料模型與類型定義（模具目錄、搜尋約束、組合結果）

pub mod catalog;
pub mod config;
pub mod die;
pub mod plan;
pub mod weight;

// Re-export 主要類型
pub use catalog::{Catalog, DieSummary};
pub use config::{PlanningRules, ScrapWindow, SearchConstraints, TrimRule};
pub use die::{Die, RawDieRow};
pub use plan::{CombinationResult, CombinationStatus, LineItem, LineRole};
pub use weight::WeightParameters;

use rust_decimal::Decimal;

/// 裁切計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CutPlanError {
    #[error("找不到模具: {die_id}（厚度 {thickness} mm）")]
    DieNotFound { die_id: String, thickness: Decimal },

    #[error("無效的輸入: {0}")]
    InvalidInput(String),

    #[error("計算錯誤: {0}")]
    Calculation(String),
}

pub type Result<T> = std::result::Result<T, CutPlanError>;
