//! 裁切搜尋配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CutPlanError, Result};

/// 預設卷寬嘗試順序（mm）
pub const DEFAULT_STOCK_WIDTHS: [u32; 3] = [1200, 1000, 1500];

/// 每個組合預設允許的補充模具種類數
pub const DEFAULT_MAX_COMPLEMENTARY: usize = 2;

/// 損耗百分比區間（含兩端）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapWindow {
    /// 最小損耗 %
    pub min_pct: Decimal,
    /// 最大損耗 %
    pub max_pct: Decimal,
}

impl Default for ScrapWindow {
    fn default() -> Self {
        Self::new(Decimal::new(67, 2), Decimal::new(170, 2))
    }
}

impl ScrapWindow {
    pub fn new(min_pct: Decimal, max_pct: Decimal) -> Self {
        Self { min_pct, max_pct }
    }

    /// 換算為指定卷寬下的損耗毫米區間
    pub fn bounds_mm(&self, stock_width: u32) -> (Decimal, Decimal) {
        let width = Decimal::from(stock_width);
        let hundred = Decimal::ONE_HUNDRED;
        (width * self.min_pct / hundred, width * self.max_pct / hundred)
    }
}

/// 修邊規則：依厚度決定最小損耗毫米數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimRule {
    /// 厚度分界（mm），小於等於此值視為薄料
    pub thickness_threshold: Decimal,
    /// 薄料最小修邊（mm）
    pub thin_min_mm: Decimal,
    /// 厚料最小修邊（mm）
    pub thick_min_mm: Decimal,
}

impl Default for TrimRule {
    fn default() -> Self {
        Self {
            thickness_threshold: Decimal::from(3),
            thin_min_mm: Decimal::from(10),
            thick_min_mm: Decimal::from(14),
        }
    }
}

impl TrimRule {
    /// 指定厚度的最小修邊
    pub fn min_trim_for(&self, thickness: Decimal) -> Decimal {
        if thickness <= self.thickness_threshold {
            self.thin_min_mm
        } else {
            self.thick_min_mm
        }
    }
}

/// 計劃規則（卷寬順序、損耗區間、修邊規則）
///
/// 所有欄位皆可省略，JSON 中未提供的欄位使用預設值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningRules {
    /// 卷寬嘗試順序（mm）
    pub stock_widths: Vec<u32>,

    /// 損耗百分比區間
    pub scrap_window: ScrapWindow,

    /// 修邊規則
    pub trim_rule: TrimRule,

    /// 是否並行評估所有卷寬（結果仍以優先順序為準）
    pub parallel_widths: bool,
}

impl Default for PlanningRules {
    fn default() -> Self {
        Self {
            stock_widths: DEFAULT_STOCK_WIDTHS.to_vec(),
            scrap_window: ScrapWindow::default(),
            trim_rule: TrimRule::default(),
            parallel_widths: false,
        }
    }
}

impl PlanningRules {
    /// 從 JSON 字串讀取規則
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json)
            .map_err(|e| CutPlanError::InvalidInput(format!("規則格式錯誤: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// 建構器模式：設置卷寬順序
    pub fn with_stock_widths(mut self, widths: Vec<u32>) -> Self {
        self.stock_widths = widths;
        self
    }

    /// 建構器模式：設置損耗區間
    pub fn with_scrap_window(mut self, window: ScrapWindow) -> Self {
        self.scrap_window = window;
        self
    }

    /// 建構器模式：設置修邊規則
    pub fn with_trim_rule(mut self, rule: TrimRule) -> Self {
        self.trim_rule = rule;
        self
    }

    /// 建構器模式：設置是否並行評估卷寬
    pub fn with_parallel_widths(mut self, parallel: bool) -> Self {
        self.parallel_widths = parallel;
        self
    }

    /// 驗證規則
    pub fn validate(&self) -> Result<()> {
        if self.stock_widths.is_empty() {
            return Err(CutPlanError::InvalidInput("卷寬列表不可為空".to_string()));
        }
        if self.stock_widths.contains(&0) {
            return Err(CutPlanError::InvalidInput("卷寬必須為正數".to_string()));
        }

        let window = &self.scrap_window;
        if window.min_pct < Decimal::ZERO || window.min_pct > window.max_pct {
            return Err(CutPlanError::InvalidInput(format!(
                "損耗區間無效: {}% – {}%",
                window.min_pct, window.max_pct
            )));
        }

        let trim = &self.trim_rule;
        if trim.thin_min_mm < Decimal::ZERO || trim.thick_min_mm < Decimal::ZERO {
            return Err(CutPlanError::InvalidInput("修邊最小值不可為負".to_string()));
        }

        Ok(())
    }
}

/// 搜尋約束（每次請求組裝一次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConstraints {
    /// 錨定模具編號（每個組合至少一刀）
    pub anchor_die_id: String,

    /// 厚度（mm）
    pub thickness: Decimal,

    /// 材質類型
    pub material_type: String,

    /// 每個組合最多幾種補充模具
    pub max_complementary: usize,

    /// 總刀數上限（含），None 表示不限
    pub max_total_cuts: Option<u32>,

    /// 計劃規則
    pub rules: PlanningRules,
}

impl SearchConstraints {
    /// 創建新的搜尋約束
    pub fn new(anchor_die_id: String, thickness: Decimal, material_type: String) -> Self {
        Self {
            anchor_die_id,
            thickness,
            material_type,
            max_complementary: DEFAULT_MAX_COMPLEMENTARY,
            max_total_cuts: None,
            rules: PlanningRules::default(),
        }
    }

    /// 建構器模式：設置補充模具種類上限
    pub fn with_max_complementary(mut self, max: usize) -> Self {
        self.max_complementary = max;
        self
    }

    /// 建構器模式：設置總刀數上限
    pub fn with_max_total_cuts(mut self, limit: u32) -> Self {
        self.max_total_cuts = Some(limit);
        self
    }

    /// 建構器模式：設置計劃規則
    pub fn with_rules(mut self, rules: PlanningRules) -> Self {
        self.rules = rules;
        self
    }

    /// 建構器模式：設置卷寬順序
    pub fn with_stock_widths(mut self, widths: Vec<u32>) -> Self {
        self.rules.stock_widths = widths;
        self
    }

    /// 本次請求的最小修邊
    pub fn min_trim(&self) -> Decimal {
        self.rules.trim_rule.min_trim_for(self.thickness)
    }

    /// 驗證約束
    pub fn validate(&self) -> Result<()> {
        if self.anchor_die_id.trim().is_empty() {
            return Err(CutPlanError::InvalidInput("錨定模具不可為空".to_string()));
        }
        if self.thickness <= Decimal::ZERO {
            return Err(CutPlanError::InvalidInput(format!(
                "厚度必須為正數: {}",
                self.thickness
            )));
        }
        if self.max_complementary == 0 {
            return Err(CutPlanError::InvalidInput(
                "補充模具種類上限必須為正整數".to_string(),
            ));
        }
        if self.max_total_cuts == Some(0) {
            return Err(CutPlanError::InvalidInput(
                "總刀數上限必須為正整數".to_string(),
            ));
        }

        self.rules.validate()
    }
}
