//! 組合排序

use cutplan_core::CombinationResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 組合排序器
pub struct CombinationRanker;

impl CombinationRanker {
    /// 排序：損耗 % → 錨定刀數 → 補充模具種類數（皆遞增）
    ///
    /// 穩定排序，鍵值相同時保持列舉順序。
    pub fn rank(results: &mut [CombinationResult]) {
        results.sort_by(Self::compare);
    }

    pub fn compare(a: &CombinationResult, b: &CombinationResult) -> Ordering {
        a.scrap_pct
            .cmp(&b.scrap_pct)
            .then_with(|| a.anchor_count.cmp(&b.anchor_count))
            .then_with(|| a.complementary_count().cmp(&b.complementary_count()))
    }

    /// 結果統計
    pub fn summarize(results: &[CombinationResult]) -> RankingSummary {
        let valid = results.iter().filter(|r| r.is_valid()).count();
        RankingSummary {
            total: results.len(),
            valid,
            out_of_rule: results.len() - valid,
            best_scrap_pct: results.iter().map(|r| r.scrap_pct).min(),
        }
    }
}

/// 排序後結果的統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSummary {
    pub total: usize,
    pub valid: usize,
    pub out_of_rule: usize,
    pub best_scrap_pct: Option<Decimal>,
}
