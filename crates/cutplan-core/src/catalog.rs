//! 模具目錄與查詢

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::die::{Die, RawDieRow};
use crate::{CutPlanError, Result};

/// 模具摘要（同一編號多筆記錄取展開長度平均值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieSummary {
    /// 模具編號
    pub die_id: String,

    /// 平均展開長度（mm）
    pub development_length: Decimal,
}

impl DieSummary {
    pub fn new(die_id: impl Into<String>, development_length: Decimal) -> Self {
        Self {
            die_id: die_id.into(),
            development_length,
        }
    }
}

/// 模具目錄（載入後唯讀）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    dies: Vec<Die>,

    /// 清洗時被丟棄的原始行數
    rejected_rows: usize,
}

impl Catalog {
    /// 由原始行建立目錄，無效行直接丟棄並計數
    pub fn from_raw_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawDieRow>,
    {
        let mut dies = Vec::new();
        let mut rejected_rows = 0;

        for row in rows {
            match row.normalize() {
                Some(die) => dies.push(die),
                None => rejected_rows += 1,
            }
        }

        Self {
            dies,
            rejected_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.dies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dies.is_empty()
    }

    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    /// 列出所有厚度（遞增、去重）
    pub fn list_thicknesses(&self) -> Vec<Decimal> {
        self.dies
            .iter()
            .map(|d| d.thickness)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 列出指定厚度下的材質類型（排序、去重）
    pub fn list_material_types(&self, thickness: Decimal) -> Vec<String> {
        self.dies
            .iter()
            .filter(|d| d.thickness == thickness)
            .map(|d| d.material_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 列出指定厚度與材質的模具，按平均展開長度遞減排序
    ///
    /// 長度相同時保持模具編號遞增順序。
    pub fn list_dies(&self, thickness: Decimal, material_type: &str) -> Vec<DieSummary> {
        let grouped = Self::mean_by_die(
            self.dies
                .iter()
                .filter(|d| d.matches(thickness, material_type)),
        );

        let mut summaries: Vec<DieSummary> = grouped
            .into_iter()
            .map(|(die_id, development_length)| DieSummary::new(die_id, development_length))
            .collect();

        summaries.sort_by(|a, b| b.development_length.cmp(&a.development_length));
        summaries
    }

    /// 錨定模具以外的補充模具候選（同厚度、同材質）
    pub fn complementary_candidates(
        &self,
        thickness: Decimal,
        material_type: &str,
        anchor_die_id: &str,
    ) -> Vec<DieSummary> {
        self.list_dies(thickness, material_type)
            .into_iter()
            .filter(|d| d.die_id != anchor_die_id)
            .collect()
    }

    /// 查詢模具在指定厚度下的平均展開長度
    ///
    /// 不限材質：同編號同厚度的所有記錄一併平均。
    pub fn development_length_of(&self, die_id: &str, thickness: Decimal) -> Result<Decimal> {
        let lengths: Vec<Decimal> = self
            .dies
            .iter()
            .filter(|d| d.die_id == die_id && d.thickness == thickness)
            .map(|d| d.development_length)
            .collect();

        if lengths.is_empty() {
            return Err(CutPlanError::DieNotFound {
                die_id: die_id.to_string(),
                thickness,
            });
        }

        Ok(mean(&lengths))
    }

    /// 按模具編號分組並取平均展開長度
    fn mean_by_die<'a>(dies: impl Iterator<Item = &'a Die>) -> BTreeMap<String, Decimal> {
        let mut groups: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
        for die in dies {
            groups
                .entry(die.die_id.clone())
                .or_default()
                .push(die.development_length);
        }

        groups
            .into_iter()
            .map(|(die_id, lengths)| (die_id, mean(&lengths)))
            .collect()
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    let sum: Decimal = values.iter().sum();
    sum / Decimal::from(values.len())
}
