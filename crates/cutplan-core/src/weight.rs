//! 重量參數

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CutPlanError, Result};

/// 預設卷重（kg）
pub const DEFAULT_TOTAL_WEIGHT_KG: i64 = 12_000;

/// 預設卷數
pub const DEFAULT_ROLL_COUNT: u32 = 1;

/// 重量參數（用於計算每個模具的 KG）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightParameters {
    /// 使用者輸入的總重（kg）
    pub total_weight_kg: Decimal,

    /// 卷數
    pub roll_count: u32,
}

impl Default for WeightParameters {
    fn default() -> Self {
        Self {
            total_weight_kg: Decimal::from(DEFAULT_TOTAL_WEIGHT_KG),
            roll_count: DEFAULT_ROLL_COUNT,
        }
    }
}

impl WeightParameters {
    /// 創建並驗證重量參數
    pub fn new(total_weight_kg: Decimal, roll_count: u32) -> Result<Self> {
        if total_weight_kg <= Decimal::ZERO {
            return Err(CutPlanError::InvalidInput(format!(
                "重量必須為正數: {}",
                total_weight_kg
            )));
        }
        if roll_count == 0 {
            return Err(CutPlanError::InvalidInput("卷數必須為正整數".to_string()));
        }

        Ok(Self {
            total_weight_kg,
            roll_count,
        })
    }

    /// 平均每卷重量 = 總重 / 卷數
    pub fn average_weight_per_roll(&self) -> Decimal {
        self.total_weight_kg / Decimal::from(self.roll_count)
    }
}
