use pretty_assertions::assert_eq;

use patchscore::cmd::evaluate::select_case_ids;
use patchscore::config::{EvalConfig, load_config, save_config};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patchscore.yaml");
    let cfg = load_config(&path).expect("defaults");
    assert_eq!(cfg.repo, "pallets/click");
    assert_eq!(cfg.cases.limit, 3);
    assert!(cfg.cases.ids.is_empty());

    let w = cfg.scoring.weights();
    assert!((w.file - 0.5).abs() < 1e-9);
    assert!((w.function - 0.35).abs() < 1e-9);
    assert!((w.variable - 0.15).abs() < 1e-9);
}

#[test]
fn config_round_trips_through_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patchscore.yaml");

    let mut cfg = EvalConfig::default();
    cfg.repo = "zed-industries/zed".to_string();
    cfg.cases.ids = vec![2972, 2933, 2855];
    cfg.scoring.variable_weight = 0.2;
    save_config(&cfg, &path).expect("save");

    let loaded = load_config(&path).expect("load");
    assert_eq!(loaded.repo, "zed-industries/zed");
    assert_eq!(loaded.cases.ids, vec![2972, 2933, 2855]);
    assert!((loaded.scoring.variable_weight - 0.2).abs() < 1e-9);
}

#[test]
fn case_limit_caps_explicit_id_lists() {
    assert_eq!(select_case_ids(&[2972, 2933, 2855, 2801], 2), vec![2972, 2933]);
    assert_eq!(select_case_ids(&[2972], 3), vec![2972]);
    assert!(select_case_ids(&[], 3).is_empty());
}

#[test]
fn partial_yaml_fills_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patchscore.yaml");
    // `force_fetch` and `cases.ids` are optional in the file.
    let yaml = "\
repo: pallets/flask
agent:
  model: llama3.1:8b
  max_tokens: 1024
github:
  api_base: https://api.github.com
  request_delay_ms: 250
  cache_dir: .patchscore/cache
cases:
  limit: 5
scoring:
  file_weight: 0.5
  function_weight: 0.35
  variable_weight: 0.15
docs:
  max_files: 4
";
    std::fs::write(&path, yaml).unwrap();

    let cfg = load_config(&path).expect("load partial");
    assert_eq!(cfg.repo, "pallets/flask");
    assert_eq!(cfg.cases.limit, 5);
    assert!(cfg.cases.ids.is_empty());
    assert!(!cfg.github.force_fetch);
    assert_eq!(cfg.docs.max_files, 4);
}
