use clap::{CommandFactory, FromArgMatches, Parser};
use cutplan::config::{KerfConvention, OptimizeParams, Strategy};
use std::str::FromStr;
use strum::IntoEnumIterator;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    params: OptimizeParams,
}

fn parse(args: &[&str]) -> (OptimizeParams, clap::ArgMatches) {
    let mut argv = vec!["test"];
    argv.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(argv);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.params, matches)
}

#[test]
fn test_cli_defaults_match_default_impl() {
    let (params, _) = parse(&[]);
    assert_eq!(params, OptimizeParams::default());
}

#[test]
fn test_cli_flags_and_aliases() {
    let (params, _) = parse(&[
        "--kerf",
        "3.5",
        "--boya-payi",
        "12",
        "--kerf-convention",
        "between-cuts",
        "--strategy",
        "auto",
    ]);
    assert_eq!(params.bicak_payi, 3.5);
    assert_eq!(params.boya_payi, 12.0);
    assert_eq!(params.kerf_convention, KerfConvention::BetweenCuts);
    assert_eq!(params.strategy, Strategy::Auto);
}

#[test]
fn test_enum_names() {
    assert_eq!(Strategy::FirstFitDecreasing.to_string(), "ffd");
    assert_eq!(Strategy::from_str("bfd").unwrap(), Strategy::BestFitDecreasing);
    assert_eq!(KerfConvention::PerCut.to_string(), "per-cut");
    assert!(KerfConvention::from_str("sometimes").is_err());

    for strategy in Strategy::iter() {
        assert_eq!(Strategy::from_str(&strategy.to_string()).unwrap(), strategy);
        let json = serde_json::to_string(&strategy).unwrap();
        assert_eq!(json, format!("\"{}\"", strategy));
    }
    for convention in KerfConvention::iter() {
        assert_eq!(KerfConvention::from_str(&convention.to_string()).unwrap(), convention);
        let json = serde_json::to_string(&convention).unwrap();
        assert_eq!(json, format!("\"{}\"", convention));
    }
}

#[test]
fn test_file_values_survive_unless_flag_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(
        &path,
        r#"{ "bicak_payi": 4, "boya_payi": 15, "strategy": "bfd" }"#,
    )
    .unwrap();

    let (cli_params, matches) = parse(&["--boya-payi", "20"]);
    let mut params = OptimizeParams::load_from_file(&path).unwrap();
    params.merge_from_cli(&cli_params, &matches);

    assert_eq!(params.bicak_payi, 4.0);
    assert_eq!(params.boya_payi, 20.0);
    assert_eq!(params.strategy, Strategy::BestFitDecreasing);
    assert_eq!(params.kerf_convention, KerfConvention::PerCut);
}

#[test]
fn test_missing_params_file_is_config_error() {
    let err = OptimizeParams::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_sanitized() {
    let p = OptimizeParams::default()
        .with_kerf(f64::INFINITY)
        .with_paint_margin(-1.0)
        .sanitized();
    assert_eq!(p.bicak_payi, 0.0);
    assert_eq!(p.boya_payi, 0.0);
}
