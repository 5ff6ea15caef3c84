//! 命令列介面

use anyhow::Context;
use clap::{Parser, Subcommand};
use cutplan_calc::{CutPlanner, PlanReport};
use cutplan_core::{Catalog, PlanningRules, SearchConstraints, WeightParameters};
use cutplan_io::{CatalogLoader, ReportExporter};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cutplan")]
#[command(about = "卷材裁切計劃：依錨定模具搜尋低損耗的模具組合")]
#[command(version)]
pub struct Cli {
    /// 模具目錄檔案（.csv / .xlsx / .xls）
    pub catalog: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 列出可用厚度
    Thicknesses,

    /// 列出指定厚度的材質類型
    Materials {
        #[arg(short, long)]
        thickness: Decimal,
    },

    /// 列出指定厚度與材質的模具（依展開長度遞減）
    Dies {
        #[arg(short, long)]
        thickness: Decimal,

        #[arg(short, long)]
        material: String,
    },

    /// 搜尋裁切組合
    Plan {
        #[arg(short, long)]
        thickness: Decimal,

        #[arg(short, long)]
        material: String,

        /// 錨定模具編號
        #[arg(short, long)]
        anchor: String,

        /// 每個組合的總刀數上限
        #[arg(long)]
        max_cuts: Option<u32>,

        /// 每個組合最多幾種補充模具
        #[arg(long, default_value = "2")]
        max_complementary: usize,

        /// 卷數（KG 計算用）
        #[arg(long, default_value = "1")]
        rolls: u32,

        /// 總重（kg，KG 計算用）
        #[arg(long, default_value = "12000")]
        weight: Decimal,

        /// 計劃規則 JSON 檔案（卷寬順序、損耗區間、修邊規則）
        #[arg(long)]
        rules: Option<PathBuf>,

        /// CSV 匯出目錄
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// JSON 匯出檔案
        #[arg(long)]
        json: Option<PathBuf>,

        /// 並行評估所有卷寬
        #[arg(long)]
        parallel: bool,
    },
}

/// 執行命令，結果寫入 `out`
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    let catalog = CatalogLoader::new()
        .load(&cli.catalog)
        .with_context(|| format!("無法讀取模具目錄 {}", cli.catalog.display()))?;

    match &cli.command {
        Commands::Thicknesses => {
            for (i, thickness) in catalog.list_thicknesses().iter().enumerate() {
                writeln!(out, "{:3}. {} mm", i + 1, thickness)?;
            }
        }
        Commands::Materials { thickness } => {
            for (i, material) in catalog.list_material_types(*thickness).iter().enumerate() {
                writeln!(out, "{:3}. {}", i + 1, material)?;
            }
        }
        Commands::Dies {
            thickness,
            material,
        } => {
            for (i, die) in catalog.list_dies(*thickness, material).iter().enumerate() {
                writeln!(
                    out,
                    "{:3}. {:<30}  展開長度 = {:.1} mm",
                    i + 1,
                    die.die_id,
                    die.development_length
                )?;
            }
        }
        Commands::Plan {
            thickness,
            material,
            anchor,
            max_cuts,
            max_complementary,
            rolls,
            weight,
            rules,
            output_dir,
            json,
            parallel,
        } => {
            let mut planning_rules = match rules {
                Some(path) => {
                    let content = std::fs::read_to_string(path)
                        .with_context(|| format!("無法讀取規則檔 {}", path.display()))?;
                    PlanningRules::from_json_str(&content)?
                }
                None => PlanningRules::default(),
            };
            if *parallel {
                planning_rules = planning_rules.with_parallel_widths(true);
            }

            let mut constraints =
                SearchConstraints::new(anchor.clone(), *thickness, material.clone())
                    .with_max_complementary(*max_complementary)
                    .with_rules(planning_rules);
            if let Some(limit) = max_cuts {
                constraints = constraints.with_max_total_cuts(*limit);
            }
            let weight = WeightParameters::new(*weight, *rolls)?;

            let report = run_plan(&catalog, &constraints, &weight)?;
            writeln!(out, "{}", ReportExporter::render_text(&report))?;

            if report.is_no_solution() {
                if output_dir.is_some() || json.is_some() {
                    writeln!(out, "無可用組合，略過匯出")?;
                }
                return Ok(());
            }

            if let Some(dir) = output_dir {
                let files = ReportExporter::write_csv(&report, dir)?;
                writeln!(out, "已匯出: {}", files.combinations.display())?;
                writeln!(out, "已匯出: {}", files.details.display())?;
            }
            if let Some(path) = json {
                ReportExporter::write_json(&report, path)?;
                writeln!(out, "已匯出: {}", path.display())?;
            }
        }
    }

    Ok(())
}

/// 執行搜尋並建立報表
pub fn run_plan(
    catalog: &Catalog,
    constraints: &SearchConstraints,
    weight: &WeightParameters,
) -> anyhow::Result<PlanReport> {
    let outcome = CutPlanner::new(catalog).plan(constraints)?;
    Ok(PlanReport::build(constraints, weight, &outcome))
}
