//! 計劃報表匯出（文字 / CSV / JSON）

use cutplan_calc::PlanReport;
use cutplan_core::LineRole;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoError, IoResult};

/// 組合描述在文字報表中的最大顯示長度
const DESCRIPTION_WIDTH: usize = 47;

const COMBINATION_HEADERS: [&str; 9] = [
    "sequence",
    "combination",
    "anchor_count",
    "total_cuts",
    "total_length_mm",
    "scrap_mm",
    "scrap_pct",
    "kg",
    "status",
];

const DETAIL_HEADERS: [&str; 7] = [
    "combination",
    "role",
    "die_id",
    "development_length_mm",
    "cuts",
    "subtotal_mm",
    "kg",
];

/// CSV 匯出的檔案路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub combinations: PathBuf,
    pub details: PathBuf,
}

#[derive(Serialize)]
struct CombinationRecord<'a> {
    sequence: usize,
    combination: &'a str,
    anchor_count: u32,
    total_cuts: u32,
    total_length_mm: Decimal,
    scrap_mm: Decimal,
    scrap_pct: Decimal,
    kg: Decimal,
    status: &'static str,
}

#[derive(Serialize)]
struct DetailRecord<'a> {
    combination: usize,
    role: &'static str,
    die_id: &'a str,
    development_length_mm: Decimal,
    cuts: u32,
    subtotal_mm: Decimal,
    kg: Decimal,
}

fn role_label(role: LineRole) -> &'static str {
    match role {
        LineRole::Anchor => "anchor",
        LineRole::Complementary => "complementary",
    }
}

fn write_error(err: impl std::fmt::Display) -> IoError {
    IoError::WriteError(err.to_string())
}

/// 報表匯出器
pub struct ReportExporter;

impl ReportExporter {
    /// 文字報表（終端機顯示用）
    pub fn render_text(report: &PlanReport) -> String {
        let sep = "=".repeat(90);
        let mut lines = vec![
            sep.clone(),
            "裁切計劃：組合結果".to_string(),
            sep.clone(),
            format!("錨定模具     : {}", report.anchor_die_id),
            format!("厚度         : {} mm", report.thickness),
            format!("材質類型     : {}", report.material_type),
        ];

        let widths: Vec<String> = report
            .rules
            .stock_widths
            .iter()
            .map(|w| w.to_string())
            .collect();
        lines.push(format!("卷寬順序     : {} mm", widths.join(" → ")));

        if let Some(width) = report.width_used {
            lines.push(format!("採用卷寬     : {} mm", width));
        }
        if let Some((min_mm, max_mm)) = report.scrap_bounds_mm {
            lines.push(format!(
                "損耗區間     : {}% ~ {}%（{:.2} ~ {:.2} mm）",
                report.rules.scrap_window.min_pct,
                report.rules.scrap_window.max_pct,
                min_mm,
                max_mm
            ));
        }
        lines.push(format!("最小修邊     : {} mm", report.min_trim_mm));
        match report.max_total_cuts {
            Some(limit) => lines.push(format!("總刀數上限   : {}", limit)),
            None => lines.push("總刀數上限   : 無".to_string()),
        }
        lines.push(format!(
            "卷數 / 重量  : {} 卷 / {} kg",
            report.weight.roll_count, report.weight.total_weight_kg
        ));

        if report.is_no_solution() {
            lines.push(String::new());
            lines.push("所有卷寬皆無符合損耗區間的組合。".to_string());
            lines.push("建議：調整參數或提高補充模具種類上限。".to_string());
            lines.push(sep);
            return lines.join("\n");
        }

        lines.push(format!(
            "組合數量     : {}（有效 {}，不符規則 {}）",
            report.summary.total, report.summary.valid, report.summary.out_of_rule
        ));
        lines.push(String::new());
        lines.push(format!(
            "{:<5} {:<48} {:<12} {:<12} {:<12} {}",
            "#", "組合", "總長 (mm)", "損耗 (mm)", "損耗 (%)", "狀態"
        ));
        lines.push(format!(
            "{:<5} {:<48} {:<12} {:<12} {:<12} {}",
            "-".repeat(5),
            "-".repeat(48),
            "-".repeat(12),
            "-".repeat(12),
            "-".repeat(12),
            "-".repeat(8)
        ));

        for row in &report.rows {
            let description: String = row.description.chars().take(DESCRIPTION_WIDTH).collect();
            lines.push(format!(
                "{:<5} {:<48} {:<12} {:<12} {:<12} {}",
                row.sequence,
                description,
                format!("{:.2}", row.total_length_mm),
                format!("{:.3}", row.scrap_mm),
                format!("{:.4}%", row.scrap_pct),
                row.status
            ));
        }
        lines.push(sep);

        lines.join("\n")
    }

    /// 匯出組合表與明細表 CSV
    ///
    /// 檔名為 `<stem>_combinations.csv` 與 `<stem>_details.csv`。
    pub fn write_csv<P: AsRef<Path>>(report: &PlanReport, dir: P) -> IoResult<ExportedFiles> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(write_error)?;

        let stem = report.file_stem();
        let files = ExportedFiles {
            combinations: dir.join(format!("{}_combinations.csv", stem)),
            details: dir.join(format!("{}_details.csv", stem)),
        };

        let mut writer = Self::csv_writer(&files.combinations, &COMBINATION_HEADERS)?;
        for row in &report.rows {
            writer
                .serialize(CombinationRecord {
                    sequence: row.sequence,
                    combination: &row.description,
                    anchor_count: row.anchor_count,
                    total_cuts: row.total_cuts,
                    total_length_mm: row.total_length_mm,
                    scrap_mm: row.scrap_mm,
                    scrap_pct: row.scrap_pct,
                    kg: row.kg,
                    status: row.status.label(),
                })
                .map_err(write_error)?;
        }
        writer.flush().map_err(write_error)?;

        let mut writer = Self::csv_writer(&files.details, &DETAIL_HEADERS)?;
        for row in &report.rows {
            for line in &row.lines {
                writer
                    .serialize(DetailRecord {
                        combination: row.sequence,
                        role: role_label(line.role),
                        die_id: &line.die_id,
                        development_length_mm: line.development_length,
                        cuts: line.cut_count,
                        subtotal_mm: line.subtotal_mm,
                        kg: line.kg,
                    })
                    .map_err(write_error)?;
            }
        }
        writer.flush().map_err(write_error)?;

        tracing::info!(
            "已匯出 CSV: {} / {}",
            files.combinations.display(),
            files.details.display()
        );

        Ok(files)
    }

    /// 建立 CSV 寫入器並寫入表頭（無組合時仍保留表頭）
    fn csv_writer(path: &Path, headers: &[&str]) -> IoResult<csv::Writer<fs::File>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(write_error)?;
        writer.write_record(headers).map_err(write_error)?;
        Ok(writer)
    }

    /// 匯出完整報表 JSON
    pub fn write_json<P: AsRef<Path>>(report: &PlanReport, path: P) -> IoResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).map_err(write_error)?;

        tracing::info!("已匯出 JSON: {}", path.display());
        Ok(())
    }

    /// 讀回 JSON 報表
    pub fn read_json<P: AsRef<Path>>(path: P) -> IoResult<PlanReport> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
