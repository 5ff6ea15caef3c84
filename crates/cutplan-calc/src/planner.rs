//! 裁切計劃主計算器（卷寬依序回退）

use cutplan_core::{Catalog, CombinationResult, DieSummary, SearchConstraints};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::ranking::CombinationRanker;
use crate::search::WidthSearch;
use crate::{AttemptOutcome, PlanOutcome, PlanWarning, WidthAttempt};

/// 裁切計劃計算器
pub struct CutPlanner<'a> {
    /// 模具目錄（唯讀）
    catalog: &'a Catalog,
}

/// 單一卷寬的評估結果
type WidthEvaluation = (WidthAttempt, Vec<CombinationResult>);

impl<'a> CutPlanner<'a> {
    /// 創建新的計算器
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// 主計算入口
    ///
    /// 依卷寬優先順序嘗試，第一個有結果的卷寬即為採用的卷寬；
    /// 回傳的組合按損耗 %、錨定刀數、補充模具種類數遞增排序。
    pub fn plan(&self, constraints: &SearchConstraints) -> cutplan_core::Result<PlanOutcome> {
        constraints.validate()?;

        tracing::info!(
            "開始裁切搜尋：錨定 {}，厚度 {} mm，材質 {}",
            constraints.anchor_die_id,
            constraints.thickness,
            constraints.material_type
        );

        let start_time = std::time::Instant::now();

        // Step 1: 錨定模具展開長度
        let anchor_length = self
            .catalog
            .development_length_of(&constraints.anchor_die_id, constraints.thickness)?;
        let anchor = DieSummary::new(constraints.anchor_die_id.clone(), anchor_length);
        tracing::debug!("錨定模具展開長度: {} mm", anchor_length);

        // Step 2: 補充模具候選
        let candidates = self.catalog.complementary_candidates(
            constraints.thickness,
            &constraints.material_type,
            &constraints.anchor_die_id,
        );
        tracing::debug!("補充模具候選: {} 種", candidates.len());

        let mut outcome = PlanOutcome::empty();
        if candidates.is_empty() {
            outcome.add_warning(PlanWarning::info(
                constraints.anchor_die_id.clone(),
                "無補充模具候選，僅搜尋錨定模具單獨排刀".to_string(),
            ));
        }

        // Step 3: 依卷寬順序搜尋
        let evaluations = if constraints.rules.parallel_widths {
            self.evaluate_parallel(&anchor, &candidates, constraints)?
        } else {
            self.evaluate_sequential(&anchor, &candidates, constraints)?
        };

        // Step 4: 取第一個有結果的卷寬
        for (attempt, mut results) in evaluations {
            outcome.attempts.push(attempt);

            if attempt.outcome == AttemptOutcome::AnchorDoesNotFit {
                outcome.add_warning(PlanWarning::info(
                    constraints.anchor_die_id.clone(),
                    format!(
                        "錨定模具 ({} mm) 大於卷寬 {} mm，已跳過",
                        anchor_length.round_dp(1),
                        attempt.stock_width
                    ),
                ));
            }

            if !results.is_empty() {
                CombinationRanker::rank(&mut results);
                outcome.width_used = Some(attempt.stock_width);
                outcome.combinations = results;
                break;
            }
        }

        if outcome.is_no_solution() {
            outcome.add_warning(PlanWarning::warning(
                constraints.anchor_die_id.clone(),
                "所有卷寬皆無符合損耗區間的組合".to_string(),
            ));
        }

        outcome.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("裁切搜尋完成，耗時 {:?}", start_time.elapsed());
        match outcome.width_used {
            Some(width) => tracing::info!(
                "採用卷寬 {} mm，組合數量: {}（有效 {}）",
                width,
                outcome.combinations.len(),
                outcome.valid_count()
            ),
            None => tracing::info!("無可用組合"),
        }

        Ok(outcome)
    }

    /// 依序評估，找到結果即停止
    fn evaluate_sequential(
        &self,
        anchor: &DieSummary,
        candidates: &[DieSummary],
        constraints: &SearchConstraints,
    ) -> cutplan_core::Result<Vec<WidthEvaluation>> {
        let mut evaluations = Vec::new();

        for &width in &constraints.rules.stock_widths {
            let evaluation = Self::evaluate_width(anchor, candidates, width, constraints)?;
            let found = !evaluation.1.is_empty();
            evaluations.push(evaluation);
            if found {
                break;
            }
        }

        Ok(evaluations)
    }

    /// 並行評估所有卷寬
    ///
    /// collect 保留卷寬的優先順序，之後與依序評估相同：
    /// 截至第一個有結果的卷寬，其後卷寬的錯誤不回報。
    fn evaluate_parallel(
        &self,
        anchor: &DieSummary,
        candidates: &[DieSummary],
        constraints: &SearchConstraints,
    ) -> cutplan_core::Result<Vec<WidthEvaluation>> {
        let evaluated: Vec<cutplan_core::Result<WidthEvaluation>> = constraints
            .rules
            .stock_widths
            .par_iter()
            .map(|&width| Self::evaluate_width(anchor, candidates, width, constraints))
            .collect();

        let mut evaluations = Vec::new();
        for evaluation in evaluated {
            let evaluation = evaluation?;
            let found = !evaluation.1.is_empty();
            evaluations.push(evaluation);
            if found {
                break;
            }
        }

        Ok(evaluations)
    }

    fn evaluate_width(
        anchor: &DieSummary,
        candidates: &[DieSummary],
        width: u32,
        constraints: &SearchConstraints,
    ) -> cutplan_core::Result<WidthEvaluation> {
        tracing::debug!("嘗試卷寬 {} mm", width);

        if anchor.development_length > Decimal::from(width) {
            tracing::debug!(
                "錨定模具 ({} mm) 大於卷寬 {} mm，跳過",
                anchor.development_length,
                width
            );
            let attempt = WidthAttempt {
                stock_width: width,
                outcome: AttemptOutcome::AnchorDoesNotFit,
            };
            return Ok((attempt, Vec::new()));
        }

        let results = WidthSearch {
            anchor,
            candidates,
            stock_width: width,
            max_complementary: constraints.max_complementary,
            max_total_cuts: constraints.max_total_cuts,
            scrap_window: constraints.rules.scrap_window,
            min_trim_mm: constraints.min_trim(),
        }
        .run()?;

        let outcome = if results.is_empty() {
            AttemptOutcome::NoCombination
        } else {
            AttemptOutcome::Found(results.len())
        };
        tracing::debug!("卷寬 {} mm: {:?}", width, outcome);

        Ok((
            WidthAttempt {
                stock_width: width,
                outcome,
            },
            results,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::{
        CombinationStatus, CutPlanError, PlanningRules, RawDieRow, ScrapWindow, TrimRule,
    };

    fn catalog(rows: &[(&str, &str)]) -> Catalog {
        Catalog::from_raw_rows(
            rows.iter()
                .map(|&(id, length)| RawDieRow::new(id, "Galvanizado", "2.0", length)),
        )
    }

    fn constraints(anchor: &str) -> SearchConstraints {
        SearchConstraints::new(anchor.to_string(), Decimal::from(2), "Galvanizado".to_string())
    }

    #[test]
    fn test_unknown_anchor_is_not_found() {
        let catalog = catalog(&[("MT-300", "300")]);
        let planner = CutPlanner::new(&catalog);

        let err = planner.plan(&constraints("MT-999")).unwrap_err();
        assert!(matches!(err, CutPlanError::DieNotFound { .. }));
    }

    #[test]
    fn test_invalid_constraints_rejected() {
        let catalog = catalog(&[("MT-300", "300")]);
        let planner = CutPlanner::new(&catalog);

        let err = planner
            .plan(&constraints("MT-300").with_max_complementary(0))
            .unwrap_err();
        assert!(matches!(err, CutPlanError::InvalidInput(_)));
    }

    #[test]
    fn test_tiny_anchor_length_is_calculation_error() {
        let catalog = catalog(&[("MT-TINY", "0.000000001")]);
        let planner = CutPlanner::new(&catalog);

        let err = planner.plan(&constraints("MT-TINY")).unwrap_err();
        assert!(matches!(err, CutPlanError::Calculation(_)));

        let err = planner
            .plan(
                &constraints("MT-TINY")
                    .with_rules(PlanningRules::default().with_parallel_widths(true)),
            )
            .unwrap_err();
        assert!(matches!(err, CutPlanError::Calculation(_)));
    }

    #[test]
    fn test_custom_window_and_trim_rule() {
        // 300 × 4 = 1200，損耗 0 mm 僅在放寬的區間與修邊下成立
        let catalog = catalog(&[("MT-300", "300")]);
        let planner = CutPlanner::new(&catalog);
        let rules = PlanningRules::default()
            .with_scrap_window(ScrapWindow::new(Decimal::ZERO, Decimal::ONE))
            .with_trim_rule(TrimRule {
                thickness_threshold: Decimal::from(3),
                thin_min_mm: Decimal::ZERO,
                thick_min_mm: Decimal::ZERO,
            });

        let outcome = planner
            .plan(&constraints("MT-300").with_rules(rules))
            .unwrap();

        assert_eq!(outcome.width_used, Some(1200));
        assert_eq!(outcome.combinations.len(), 1);
        assert_eq!(outcome.combinations[0].scrap_mm, Decimal::ZERO);
        assert_eq!(outcome.combinations[0].status, CombinationStatus::Valid);
    }

    #[test]
    fn test_first_width_wins() {
        // 118.5 × 10 = 1185 在 1200 mm 有解
        let catalog = catalog(&[("MT-118", "118.5")]);
        let planner = CutPlanner::new(&catalog);

        let outcome = planner.plan(&constraints("MT-118")).unwrap();

        assert_eq!(outcome.width_used, Some(1200));
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Found(1));
        assert_eq!(outcome.combinations[0].status, CombinationStatus::Valid);
    }

    #[test]
    fn test_falls_back_to_next_width() {
        // 1200 mm 無解；1000 mm：110 × 9 = 990，損耗 10 mm = 1.0%
        let catalog = catalog(&[("MT-110", "110")]);
        let planner = CutPlanner::new(&catalog);

        let outcome = planner.plan(&constraints("MT-110")).unwrap();

        assert_eq!(outcome.width_used, Some(1000));
        assert_eq!(
            outcome.attempts.iter().map(|a| a.outcome).collect::<Vec<_>>(),
            vec![AttemptOutcome::NoCombination, AttemptOutcome::Found(1)]
        );
        assert!(outcome.combinations.iter().all(|c| c.stock_width == 1000));
    }

    #[test]
    fn test_anchor_too_wide_for_first_widths() {
        // 1480 mm 只放得進 1500 mm，損耗 20 mm = 1.33%
        let catalog = catalog(&[("MT-1480", "1480")]);
        let planner = CutPlanner::new(&catalog);

        let outcome = planner.plan(&constraints("MT-1480")).unwrap();

        assert_eq!(outcome.width_used, Some(1500));
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::AnchorDoesNotFit);
        assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::AnchorDoesNotFit);
        assert_eq!(outcome.combinations.len(), 1);
    }

    #[test]
    fn test_no_solution_is_not_error() {
        let catalog = catalog(&[("MT-300", "300")]);
        let planner = CutPlanner::new(&catalog);

        let outcome = planner.plan(&constraints("MT-300")).unwrap();

        assert!(outcome.is_no_solution());
        assert!(outcome.combinations.is_empty());
        assert_eq!(outcome.attempts.len(), 3);
        assert!(!outcome.warnings.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = catalog(&[
            ("MT-99", "99"),
            ("MT-250", "250"),
            ("MT-190", "190"),
            ("MT-95", "95.5"),
            ("MT-41", "41.3"),
        ]);
        let planner = CutPlanner::new(&catalog);

        let sequential = planner.plan(&constraints("MT-99")).unwrap();
        let parallel = planner
            .plan(
                &constraints("MT-99")
                    .with_rules(PlanningRules::default().with_parallel_widths(true)),
            )
            .unwrap();

        assert_eq!(sequential.width_used, parallel.width_used);
        assert_eq!(sequential.combinations, parallel.combinations);
        assert_eq!(sequential.attempts, parallel.attempts);
    }

    #[test]
    fn test_results_sorted() {
        let catalog = catalog(&[
            ("MT-200", "200"),
            ("MT-190", "190"),
            ("MT-95", "95.5"),
            ("MT-41", "41.3"),
        ]);
        let planner = CutPlanner::new(&catalog);

        let outcome = planner.plan(&constraints("MT-200")).unwrap();
        assert!(!outcome.combinations.is_empty());

        for pair in outcome.combinations.windows(2) {
            let key = |c: &CombinationResult| {
                (c.scrap_pct, c.anchor_count, c.complementary_count())
            };
            assert!(key(&pair[0]) <= key(&pair[1]));
        }
    }
}
