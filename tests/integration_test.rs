//! 集成測試

use clap::Parser;
use cutplan::cli::run_plan;
use cutplan::{execute, logging, Cli};
use cutplan_core::{CombinationStatus, PlanningRules, SearchConstraints, WeightParameters};
use cutplan_io::{CatalogLoader, ReportExporter};
use rstest::rstest;
use rust_decimal::Decimal;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG: &str = "\
Matriz,Tipo de material,Espessura,Desenvolvimento
MT-118,Galvanizado,2.0,118.5
MT-118,Aço A,5.0,118.5
MT-1188,Aço B,5.0,118.8
MT-300,Galvanizado,2.5,300
MT-285,Galvanizado,2.5,285
MT-300,Inox,2.5,300
nan,Galvanizado,2.5,100
MT-BAD,Galvanizado,2.5,-5
";

fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("matrizes.csv");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    path
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_catalog_queries() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let catalog = catalog.to_str().unwrap();

    let thicknesses = run(&["cutplan", catalog, "thicknesses"]).unwrap();
    assert_eq!(
        thicknesses.lines().collect::<Vec<_>>(),
        vec!["  1. 2 mm", "  2. 2.5 mm", "  3. 5 mm"]
    );

    let materials = run(&["cutplan", catalog, "materials", "--thickness", "2.5"]).unwrap();
    assert_eq!(
        materials.lines().collect::<Vec<_>>(),
        vec!["  1. Galvanizado", "  2. Inox"]
    );

    let dies = run(&[
        "cutplan",
        catalog,
        "dies",
        "--thickness",
        "2.5",
        "--material",
        "Galvanizado",
    ])
    .unwrap();
    let lines: Vec<&str> = dies.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("MT-300") && lines[0].ends_with("300.0 mm"));
    assert!(lines[1].contains("MT-285") && lines[1].ends_with("285.0 mm"));
}

#[test]
fn test_plan_end_to_end() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let output_dir = dir.path().join("out");
    let json_path = dir.path().join("plan.json");

    let output = run(&[
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Galvanizado",
        "--anchor",
        "MT-300",
        "--rolls",
        "4",
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--json",
        json_path.to_str().unwrap(),
    ])
    .unwrap();

    assert!(output.contains("採用卷寬     : 1200 mm"));
    assert!(output.contains("MT-300(x3) + MT-285(x1)"));

    let stem = "plano_MT-300_esp2-5_Galvanizado_L1200";
    let combinations =
        fs::read_to_string(output_dir.join(format!("{}_combinations.csv", stem))).unwrap();
    let rows: Vec<&str> = combinations.lines().collect();
    assert_eq!(rows.len(), 2);
    let fields: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(fields[1], "MT-300(x3) + MT-285(x1)");
    assert_eq!(fields[7].parse::<Decimal>().unwrap(), Decimal::from(11850));

    let details = fs::read_to_string(output_dir.join(format!("{}_details.csv", stem))).unwrap();
    assert_eq!(details.lines().count(), 3);

    let report = ReportExporter::read_json(&json_path).unwrap();
    assert_eq!(report.width_used, Some(1200));
    assert_eq!(report.weight.roll_count, 4);
    assert_eq!(report.rows[0].kg, Decimal::from(11850));
}

#[test]
fn test_plan_no_solution_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    let output = run(&[
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Inox",
        "--anchor",
        "MT-300",
    ])
    .unwrap();

    assert!(output.contains("所有卷寬皆無符合損耗區間的組合"));
}

#[test]
fn test_plan_no_solution_skips_export() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let output_dir = dir.path().join("out");
    let json_path = dir.path().join("plan.json");

    let output = run(&[
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Inox",
        "--anchor",
        "MT-300",
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--json",
        json_path.to_str().unwrap(),
    ])
    .unwrap();

    assert!(output.contains("無可用組合，略過匯出"));
    assert!(!output_dir.exists());
    assert!(!json_path.exists());
}

#[rstest]
#[case::zero_rolls(&["--rolls", "0"])]
#[case::zero_weight(&["--weight", "0"])]
#[case::zero_max_cuts(&["--max-cuts", "0"])]
#[case::zero_complementary(&["--max-complementary", "0"])]
fn test_plan_rejects_invalid_numbers(#[case] extra: &[&str]) {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    let mut args = vec![
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Galvanizado",
        "--anchor",
        "MT-300",
    ];
    args.extend_from_slice(extra);

    assert!(run(&args).is_err());
}

#[test]
fn test_plan_unknown_anchor_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    let err = run(&[
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Galvanizado",
        "--anchor",
        "MT-999",
    ])
    .unwrap_err();

    assert!(err.to_string().contains("MT-999"));
}

#[test]
fn test_plan_with_rules_file() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let rules = dir.path().join("rules.json");
    fs::write(&rules, r#"{"stock_widths": [1000]}"#).unwrap();

    let output = run(&[
        "cutplan",
        catalog.to_str().unwrap(),
        "plan",
        "--thickness",
        "2.5",
        "--material",
        "Galvanizado",
        "--anchor",
        "MT-300",
        "--rules",
        rules.to_str().unwrap(),
    ])
    .unwrap();

    // 只嘗試 1000 mm：無任何組合落在 6.7 ~ 17 mm
    assert!(output.contains("卷寬順序     : 1000 mm"));
    assert!(output.contains("所有卷寬皆無符合損耗區間的組合"));
}

#[test]
fn test_missing_catalog_file() {
    let err = run(&["cutplan", "no_such_catalog.csv", "thicknesses"]).unwrap_err();
    assert!(err.to_string().contains("no_such_catalog.csv"));
}

#[rstest]
#[case::thin_valid("MT-118", "2.0", "Galvanizado", "15", CombinationStatus::Valid)]
#[case::thick_still_valid("MT-118", "5.0", "Aço A", "15", CombinationStatus::Valid)]
#[case::thick_below_trim("MT-1188", "5.0", "Aço B", "12", CombinationStatus::OutOfRule)]
fn test_anchor_only_scenarios(
    #[case] anchor: &str,
    #[case] thickness: &str,
    #[case] material: &str,
    #[case] scrap: &str,
    #[case] status: CombinationStatus,
) {
    let dir = TempDir::new().unwrap();
    let catalog = CatalogLoader::new().load(write_catalog(dir.path())).unwrap();

    let constraints = SearchConstraints::new(
        anchor.to_string(),
        thickness.parse().unwrap(),
        material.to_string(),
    );
    let report = run_plan(&catalog, &constraints, &WeightParameters::default()).unwrap();

    assert_eq!(report.width_used, Some(1200));
    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.anchor_count, 10);
    assert_eq!(row.scrap_mm, scrap.parse::<Decimal>().unwrap());
    assert_eq!(row.status, status);
}

#[test]
fn test_results_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let catalog = CatalogLoader::new().load(write_catalog(dir.path())).unwrap();
    let constraints = SearchConstraints::new(
        "MT-300".to_string(),
        Decimal::new(25, 1),
        "Galvanizado".to_string(),
    );

    let first = run_plan(&catalog, &constraints, &WeightParameters::default()).unwrap();
    let second = run_plan(&catalog, &constraints, &WeightParameters::default()).unwrap();
    let parallel = run_plan(
        &catalog,
        &constraints
            .clone()
            .with_rules(PlanningRules::default().with_parallel_widths(true)),
        &WeightParameters::default(),
    )
    .unwrap();

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.rows, parallel.rows);
    assert_eq!(first.attempts, parallel.attempts);
}

#[test]
fn test_roll_count_does_not_change_kg() {
    let dir = TempDir::new().unwrap();
    let catalog = CatalogLoader::new().load(write_catalog(dir.path())).unwrap();
    let constraints = SearchConstraints::new(
        "MT-300".to_string(),
        Decimal::new(25, 1),
        "Galvanizado".to_string(),
    );

    let two = WeightParameters::new(Decimal::from(12_000), 2).unwrap();
    let four = WeightParameters::new(Decimal::from(12_000), 4).unwrap();

    let a = run_plan(&catalog, &constraints, &two).unwrap();
    let b = run_plan(&catalog, &constraints, &four).unwrap();

    assert_eq!(a.rows[0].kg, b.rows[0].kg);
    assert_eq!(a.rows[0].lines, b.rows[0].lines);
}
