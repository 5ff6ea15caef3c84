//! 組合結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 組合狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationStatus {
    /// 損耗區間與修邊皆符合
    Valid,
    /// 損耗區間符合，但低於最小修邊
    OutOfRule,
}

impl CombinationStatus {
    /// 依損耗與最小修邊判定狀態
    pub fn classify(scrap_mm: Decimal, min_trim_mm: Decimal) -> Self {
        if scrap_mm >= min_trim_mm {
            CombinationStatus::Valid
        } else {
            CombinationStatus::OutOfRule
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CombinationStatus::Valid => "有效",
            CombinationStatus::OutOfRule => "不符規則",
        }
    }
}

impl fmt::Display for CombinationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 明細角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    /// 錨定模具
    Anchor,
    /// 補充模具
    Complementary,
}

/// 組合明細（單一模具）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 角色
    pub role: LineRole,

    /// 模具編號
    pub die_id: String,

    /// 展開長度（mm）
    pub development_length: Decimal,

    /// 刀數
    pub cut_count: u32,

    /// 小計長度（mm，3 位小數）
    pub subtotal_mm: Decimal,
}

impl LineItem {
    /// 創建新的明細，小計 = 展開長度 × 刀數
    pub fn new(role: LineRole, die_id: String, development_length: Decimal, cut_count: u32) -> Self {
        let subtotal_mm = (development_length * Decimal::from(cut_count)).round_dp(3);
        Self {
            role,
            die_id,
            development_length,
            cut_count,
            subtotal_mm,
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.role == LineRole::Anchor
    }
}

/// 組合結果（單一卷寬下的一種排刀方式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationResult {
    /// 使用的卷寬（mm）
    pub stock_width: u32,

    /// 錨定模具刀數
    pub anchor_count: u32,

    /// 明細（錨定模具永遠在第一筆）
    pub line_items: Vec<LineItem>,

    /// 總刀數
    pub total_cuts: u32,

    /// 總消耗長度（mm，3 位小數）
    pub total_length_mm: Decimal,

    /// 損耗長度（mm，3 位小數）
    pub scrap_mm: Decimal,

    /// 損耗百分比（4 位小數）
    pub scrap_pct: Decimal,

    /// 狀態
    pub status: CombinationStatus,
}

impl CombinationResult {
    /// 錨定模具明細
    pub fn anchor(&self) -> Option<&LineItem> {
        self.line_items.first()
    }

    /// 補充模具明細
    pub fn complementary_items(&self) -> &[LineItem] {
        self.line_items.get(1..).unwrap_or(&[])
    }

    /// 補充模具種類數
    pub fn complementary_count(&self) -> usize {
        self.complementary_items().len()
    }

    pub fn is_valid(&self) -> bool {
        self.status == CombinationStatus::Valid
    }

    /// 組合描述，例如 `MT-118(x10) + MT-250(x1)`
    pub fn description(&self) -> String {
        self.line_items
            .iter()
            .map(|item| format!("{}(x{})", item.die_id, item.cut_count))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
