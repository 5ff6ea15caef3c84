//! 報表模型（供顯示與匯出使用）

use chrono::NaiveDateTime;
use cutplan_core::{
    CombinationResult, CombinationStatus, LineRole, PlanningRules, SearchConstraints,
    WeightParameters,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ranking::{CombinationRanker, RankingSummary};
use crate::weight::WeightCalculator;
use crate::{PlanOutcome, PlanWarning, WidthAttempt};

/// 裁切計劃報表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// 報表ID
    pub id: Uuid,

    /// 產生時間
    pub generated_at: NaiveDateTime,

    /// 錨定模具編號
    pub anchor_die_id: String,

    /// 厚度（mm）
    pub thickness: Decimal,

    /// 材質類型
    pub material_type: String,

    /// 總刀數上限
    pub max_total_cuts: Option<u32>,

    /// 補充模具種類上限
    pub max_complementary: usize,

    /// 重量參數
    pub weight: WeightParameters,

    /// 計劃規則
    pub rules: PlanningRules,

    /// 本次請求的最小修邊（mm）
    pub min_trim_mm: Decimal,

    /// 各卷寬嘗試紀錄
    pub attempts: Vec<WidthAttempt>,

    /// 採用的卷寬
    pub width_used: Option<u32>,

    /// 採用卷寬下的損耗毫米區間
    pub scrap_bounds_mm: Option<(Decimal, Decimal)>,

    /// 結果統計
    pub summary: RankingSummary,

    /// 組合列（已排序）
    pub rows: Vec<ReportRow>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,
}

/// 報表中的一個組合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// 序號（從 1 開始）
    pub sequence: usize,

    /// 組合描述
    pub description: String,

    pub anchor_count: u32,
    pub total_cuts: u32,
    pub total_length_mm: Decimal,
    pub scrap_mm: Decimal,
    pub scrap_pct: Decimal,

    /// 組合總重量（kg，2 位小數）
    pub kg: Decimal,

    pub status: CombinationStatus,

    /// 明細
    pub lines: Vec<ReportLine>,
}

/// 報表明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub role: LineRole,
    pub die_id: String,
    pub development_length: Decimal,
    pub cut_count: u32,
    pub subtotal_mm: Decimal,

    /// 明細重量（kg，2 位小數）
    pub kg: Decimal,
}

impl PlanReport {
    /// 由搜尋結果建立報表
    pub fn build(
        constraints: &SearchConstraints,
        weight: &WeightParameters,
        outcome: &PlanOutcome,
    ) -> Self {
        let rows = outcome
            .combinations
            .iter()
            .enumerate()
            .map(|(idx, combination)| ReportRow::from_combination(idx + 1, combination, weight))
            .collect();

        let scrap_bounds_mm = outcome
            .width_used
            .map(|width| constraints.rules.scrap_window.bounds_mm(width));

        Self {
            id: Uuid::new_v4(),
            generated_at: chrono::Local::now().naive_local(),
            anchor_die_id: constraints.anchor_die_id.clone(),
            thickness: constraints.thickness,
            material_type: constraints.material_type.clone(),
            max_total_cuts: constraints.max_total_cuts,
            max_complementary: constraints.max_complementary,
            weight: *weight,
            rules: constraints.rules.clone(),
            min_trim_mm: constraints.min_trim(),
            attempts: outcome.attempts.clone(),
            width_used: outcome.width_used,
            scrap_bounds_mm,
            summary: CombinationRanker::summarize(&outcome.combinations),
            rows,
            warnings: outcome.warnings.clone(),
        }
    }

    /// 所有卷寬皆無解
    pub fn is_no_solution(&self) -> bool {
        self.width_used.is_none()
    }

    /// 建議的匯出檔名（不含副檔名）
    ///
    /// 例如 `plano_MT-118_esp2-5_Galvanizado_L1200`
    pub fn file_stem(&self) -> String {
        let anchor = self
            .anchor_die_id
            .replace('/', "_")
            .replace('"', "in")
            .replace(',', "-")
            .replace(' ', "_");
        let thickness = self.thickness.to_string().replace('.', "-");
        let material = self.material_type.replace(' ', "_");
        let width = self.width_used.unwrap_or(0);

        format!("plano_{}_esp{}_{}_L{}", anchor, thickness, material, width)
    }
}

impl ReportRow {
    fn from_combination(
        sequence: usize,
        combination: &CombinationResult,
        weight: &WeightParameters,
    ) -> Self {
        let lines = combination
            .line_items
            .iter()
            .map(|item| ReportLine {
                role: item.role,
                die_id: item.die_id.clone(),
                development_length: item.development_length,
                cut_count: item.cut_count,
                subtotal_mm: item.subtotal_mm,
                kg: WeightCalculator::line_item_kg(weight, combination.stock_width, item)
                    .round_dp(2),
            })
            .collect();

        Self {
            sequence,
            description: combination.description(),
            anchor_count: combination.anchor_count,
            total_cuts: combination.total_cuts,
            total_length_mm: combination.total_length_mm,
            scrap_mm: combination.scrap_mm,
            scrap_pct: combination.scrap_pct,
            kg: WeightCalculator::combination_kg(weight, combination).round_dp(2),
            status: combination.status,
            lines,
        }
    }
}
