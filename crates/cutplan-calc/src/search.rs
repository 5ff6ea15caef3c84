//! 單一卷寬的組合搜尋

use cutplan_core::{
    CombinationResult, CombinationStatus, CutPlanError, DieSummary, LineItem, LineRole,
    ScrapWindow,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::assignment::{Assignment, CountAssignments};

/// 單一卷寬搜尋輸入
#[derive(Debug, Clone)]
pub struct WidthSearch<'a> {
    /// 錨定模具（編號 + 平均展開長度）
    pub anchor: &'a DieSummary,

    /// 補充模具候選（按展開長度遞減）
    pub candidates: &'a [DieSummary],

    /// 卷寬（mm）
    pub stock_width: u32,

    /// 每個組合最多幾種補充模具
    pub max_complementary: usize,

    /// 總刀數上限（含）
    pub max_total_cuts: Option<u32>,

    /// 損耗百分比區間
    pub scrap_window: ScrapWindow,

    /// 最小修邊（mm）
    pub min_trim_mm: Decimal,
}

/// 搜尋過程中單一錨定刀數的共用數值
struct AnchorLayout {
    count: u32,
    used: Decimal,
}

impl<'a> WidthSearch<'a> {
    /// 列舉此卷寬下所有落在損耗區間內的組合
    ///
    /// 錨定模具放不下（展開長度大於卷寬或不為正）時回傳空集合；
    /// 展開長度過小、刀數超出 `u32` 範圍時回傳 `Calculation` 錯誤。
    pub fn run(&self) -> cutplan_core::Result<Vec<CombinationResult>> {
        let width = Decimal::from(self.stock_width);
        let anchor_length = self.anchor.development_length;

        if anchor_length <= Decimal::ZERO || anchor_length > width {
            return Ok(Vec::new());
        }

        let (scrap_min, scrap_max) = self.scrap_window.bounds_mm(self.stock_width);
        let max_anchor = width
            .checked_div(anchor_length)
            .and_then(|quotient| quotient.floor().to_u32())
            .ok_or_else(|| {
                CutPlanError::Calculation(format!(
                    "錨定模具 {} 展開長度 {} mm 過小，刀數超出範圍",
                    self.anchor.die_id, anchor_length
                ))
            })?;

        let mut results = Vec::new();

        for count in 1..=max_anchor {
            let used = anchor_length * Decimal::from(count);
            let remaining = width - used;
            if remaining < Decimal::ZERO {
                break;
            }
            let layout = AnchorLayout { count, used };

            // 僅錨定模具
            let within_window = scrap_min <= remaining && remaining <= scrap_max;
            if within_window && self.cuts_allowed(count) {
                results.push(self.build_result(&layout, None, remaining));
            }

            // 錨定 + 補充模具
            let eligible: Vec<DieSummary> = self
                .candidates
                .iter()
                .filter(|c| c.development_length <= remaining)
                .cloned()
                .collect();
            if eligible.is_empty() {
                continue;
            }

            let assignments =
                CountAssignments::new(&eligible, remaining, self.max_complementary)?;
            for assignment in assignments {
                let total = layout.used + assignment.used_length(&eligible);
                if total > width {
                    continue;
                }
                if !self.cuts_allowed(count + assignment.total_cuts()) {
                    continue;
                }

                let scrap = width - total;
                if scrap_min <= scrap && scrap <= scrap_max {
                    let complementary = Some((&assignment, eligible.as_slice()));
                    results.push(self.build_result(&layout, complementary, scrap));
                }
            }
        }

        Ok(results)
    }

    fn cuts_allowed(&self, total_cuts: u32) -> bool {
        self.max_total_cuts.map_or(true, |limit| total_cuts <= limit)
    }

    fn build_result(
        &self,
        layout: &AnchorLayout,
        complementary: Option<(&Assignment, &[DieSummary])>,
        scrap: Decimal,
    ) -> CombinationResult {
        let width = Decimal::from(self.stock_width);

        let mut line_items = vec![LineItem::new(
            LineRole::Anchor,
            self.anchor.die_id.clone(),
            self.anchor.development_length,
            layout.count,
        )];
        let mut total_cuts = layout.count;

        if let Some((assignment, eligible)) = complementary {
            for &(idx, count) in &assignment.picks {
                let die = &eligible[idx];
                line_items.push(LineItem::new(
                    LineRole::Complementary,
                    die.die_id.clone(),
                    die.development_length,
                    count,
                ));
            }
            total_cuts += assignment.total_cuts();
        }

        CombinationResult {
            stock_width: self.stock_width,
            anchor_count: layout.count,
            line_items,
            total_cuts,
            total_length_mm: (width - scrap).round_dp(3),
            scrap_mm: scrap.round_dp(3),
            scrap_pct: (scrap / width * Decimal::ONE_HUNDRED).round_dp(4),
            status: CombinationStatus::classify(scrap, self.min_trim_mm),
        }
    }
}
