//! # Cut Plan Calculation Engine
//!
//! 核心裁切組合搜尋引擎

pub mod assignment;
pub mod planner;
pub mod ranking;
pub mod report;
pub mod search;
pub mod weight;

// Re-export 主要類型
pub use assignment::{Assignment, CountAssignments};
pub use planner::CutPlanner;
pub use ranking::CombinationRanker;
pub use report::{PlanReport, ReportLine, ReportRow};
pub use search::WidthSearch;
pub use weight::WeightCalculator;

use cutplan_core::CombinationResult;
use serde::{Deserialize, Serialize};

/// 裁切搜尋結果
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// 已排序的組合（僅來自採用的卷寬）
    pub combinations: Vec<CombinationResult>,

    /// 採用的卷寬，None 表示所有卷寬皆無解
    pub width_used: Option<u32>,

    /// 各卷寬的嘗試紀錄（按優先順序，至採用的卷寬為止）
    pub attempts: Vec<WidthAttempt>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PlanOutcome {
    /// 創建空的搜尋結果
    pub fn empty() -> Self {
        Self {
            combinations: Vec::new(),
            width_used: None,
            attempts: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }

    /// 所有卷寬皆無可用組合
    pub fn is_no_solution(&self) -> bool {
        self.width_used.is_none()
    }

    /// 有效組合數量
    pub fn valid_count(&self) -> usize {
        self.combinations.iter().filter(|c| c.is_valid()).count()
    }
}

/// 單一卷寬的嘗試紀錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthAttempt {
    pub stock_width: u32,
    pub outcome: AttemptOutcome,
}

/// 卷寬嘗試結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    /// 錨定模具展開長度大於卷寬，跳過
    AnchorDoesNotFit,
    /// 無任何組合落在損耗區間內
    NoCombination,
    /// 找到的組合數量
    Found(usize),
}

/// 搜尋警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    pub die_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(die_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            die_id,
            message,
            severity,
        }
    }

    pub fn info(die_id: String, message: String) -> Self {
        Self::new(die_id, message, WarningSeverity::Info)
    }

    pub fn warning(die_id: String, message: String) -> Self {
        Self::new(die_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
