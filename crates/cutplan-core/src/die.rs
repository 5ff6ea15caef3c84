//! 模具模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 模具（目錄中的一筆有效記錄）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Die {
    /// 模具編號
    pub die_id: String,

    /// 材質類型
    pub material_type: String,

    /// 厚度（mm）
    pub thickness: Decimal,

    /// 展開長度（mm），每刀消耗的卷材寬度
    pub development_length: Decimal,
}

impl Die {
    /// 創建新的模具記錄
    pub fn new(
        die_id: String,
        material_type: String,
        thickness: Decimal,
        development_length: Decimal,
    ) -> Self {
        Self {
            die_id,
            material_type,
            thickness,
            development_length,
        }
    }

    /// 檢查是否符合指定厚度與材質
    pub fn matches(&self, thickness: Decimal, material_type: &str) -> bool {
        self.thickness == thickness && self.material_type == material_type
    }
}

/// 原始目錄行（來自 CSV / Excel，尚未清洗）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDieRow {
    pub die_id: Option<String>,
    pub material_type: Option<String>,
    pub thickness: Option<String>,
    pub development_length: Option<String>,
}

impl RawDieRow {
    /// 創建新的原始行
    pub fn new(
        die_id: impl Into<String>,
        material_type: impl Into<String>,
        thickness: impl Into<String>,
        development_length: impl Into<String>,
    ) -> Self {
        Self {
            die_id: Some(die_id.into()),
            material_type: Some(material_type.into()),
            thickness: Some(thickness.into()),
            development_length: Some(development_length.into()),
        }
    }

    /// 清洗並轉換為模具記錄
    ///
    /// 以下情況回傳 `None`（整行丟棄）：
    /// - 模具編號為空或為 `nan`
    /// - 厚度或展開長度無法轉為數值
    /// - 厚度或展開長度不為正
    pub fn normalize(&self) -> Option<Die> {
        let die_id = self.die_id.as_deref().map(str::trim).unwrap_or("");
        if die_id.is_empty() || die_id.eq_ignore_ascii_case("nan") {
            return None;
        }

        let material_type = self
            .material_type
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();

        let thickness = parse_decimal(self.thickness.as_deref()?)?;
        let development_length = parse_decimal(self.development_length.as_deref()?)?;

        if thickness <= Decimal::ZERO || development_length <= Decimal::ZERO {
            return None;
        }

        Some(Die::new(
            die_id.to_string(),
            material_type,
            thickness.normalize(),
            development_length,
        ))
    }
}

/// 數值轉換（支援一般與科學記號寫法）
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
