//! 重量（KG）推算

use cutplan_core::{CombinationResult, LineItem, WeightParameters};
use rust_decimal::Decimal;

/// 重量計算器
pub struct WeightCalculator;

impl WeightCalculator {
    /// 單一明細的重量
    ///
    /// KG = (平均每卷重量 / 卷寬) × (刀數 × 展開長度 × 卷數)
    pub fn line_item_kg(params: &WeightParameters, stock_width: u32, item: &LineItem) -> Decimal {
        if stock_width == 0 {
            return Decimal::ZERO;
        }

        let consumed = Decimal::from(item.cut_count)
            * item.development_length
            * Decimal::from(params.roll_count);

        params.average_weight_per_roll() * consumed / Decimal::from(stock_width)
    }

    /// 組合總重量（各明細加總，未取整）
    pub fn combination_kg(params: &WeightParameters, result: &CombinationResult) -> Decimal {
        result
            .line_items
            .iter()
            .map(|item| Self::line_item_kg(params, result.stock_width, item))
            .sum()
    }
}
