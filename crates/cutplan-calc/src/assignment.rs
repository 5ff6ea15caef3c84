//! 補充模具刀數分配產生器
//!
//! 依序列舉「補充模具子集 × 每個模具的刀數」，一次產生一組，不預先展開笛卡兒積。
//!
//! 列舉順序：
//! 1. 子集大小由 1 遞增至上限
//! 2. 同大小的子集按候選索引的字典序
//! 3. 同一子集內的刀數按里程表順序（最後一個模具變化最快）

use cutplan_core::{CutPlanError, DieSummary};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 一組刀數分配：(候選索引, 刀數)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub picks: Vec<(usize, u32)>,
}

impl Assignment {
    /// 補充模具總刀數
    pub fn total_cuts(&self) -> u32 {
        self.picks.iter().map(|&(_, count)| count).sum()
    }

    /// 補充模具消耗長度
    pub fn used_length(&self, candidates: &[DieSummary]) -> Decimal {
        self.picks
            .iter()
            .map(|&(idx, count)| candidates[idx].development_length * Decimal::from(count))
            .sum()
    }
}

/// 刀數分配產生器（可重新開始的惰性序列）
#[derive(Debug, Clone)]
pub struct CountAssignments<'a> {
    candidates: &'a [DieSummary],
    /// 每個候選的刀數上限（與 `candidates` 同索引）
    count_limits: Vec<u32>,
    max_size: usize,
    subset: Vec<usize>,
    limits: Vec<u32>,
    counts: Vec<u32>,
    done: bool,
}

impl<'a> CountAssignments<'a> {
    /// 創建產生器
    ///
    /// `candidates` 應已過濾為展開長度不超過 `remaining` 的模具。
    /// 任一模具的刀數上限超出 `u32` 範圍時回傳 `Calculation` 錯誤。
    pub fn new(
        candidates: &'a [DieSummary],
        remaining: Decimal,
        max_complementary: usize,
    ) -> cutplan_core::Result<Self> {
        let count_limits = candidates
            .iter()
            .map(|die| count_limit(die, remaining))
            .collect::<cutplan_core::Result<Vec<_>>>()?;

        let mut generator = Self {
            candidates,
            count_limits,
            max_size: max_complementary.min(candidates.len()),
            subset: Vec::new(),
            limits: Vec::new(),
            counts: Vec::new(),
            done: false,
        };
        generator.restart();
        Ok(generator)
    }

    /// 回到序列開頭
    pub fn restart(&mut self) {
        if self.max_size == 0 {
            self.subset.clear();
            self.limits.clear();
            self.counts.clear();
            self.done = true;
            return;
        }

        self.done = false;
        self.subset = vec![0];
        self.reset_counts();
    }

    fn reset_counts(&mut self) {
        self.limits = self.subset.iter().map(|&idx| self.count_limits[idx]).collect();
        self.counts = vec![1; self.subset.len()];
    }

    fn advance_counts(&mut self) -> bool {
        for pos in (0..self.counts.len()).rev() {
            if self.counts[pos] < self.limits[pos] {
                self.counts[pos] += 1;
                for count in self.counts.iter_mut().skip(pos + 1) {
                    *count = 1;
                }
                return true;
            }
        }
        false
    }

    fn advance_subset(&mut self) -> bool {
        let n = self.candidates.len();
        let k = self.subset.len();

        for pos in (0..k).rev() {
            if self.subset[pos] < n - k + pos {
                self.subset[pos] += 1;
                for next in pos + 1..k {
                    self.subset[next] = self.subset[next - 1] + 1;
                }
                return true;
            }
        }
        false
    }

    fn advance(&mut self) {
        if self.advance_counts() {
            return;
        }

        if self.advance_subset() {
            self.reset_counts();
            return;
        }

        let size = self.subset.len() + 1;
        if size <= self.max_size {
            self.subset = (0..size).collect();
            self.reset_counts();
            return;
        }

        self.done = true;
    }
}

/// 單一模具的刀數上限：max(1, floor(剩餘 / 展開長度))
fn count_limit(die: &DieSummary, remaining: Decimal) -> cutplan_core::Result<u32> {
    let length = die.development_length;
    if length <= Decimal::ZERO {
        return Ok(1);
    }

    remaining
        .checked_div(length)
        .and_then(|quotient| quotient.floor().to_u32())
        .map(|limit| limit.max(1))
        .ok_or_else(|| {
            CutPlanError::Calculation(format!(
                "模具 {} 展開長度 {} mm 過小，刀數上限超出範圍",
                die.die_id, length
            ))
        })
}

impl Iterator for CountAssignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let assignment = Assignment {
            picks: self
                .subset
                .iter()
                .copied()
                .zip(self.counts.iter().copied())
                .collect(),
        };
        self.advance();
        Some(assignment)
    }
}
