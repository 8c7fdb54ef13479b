use pretty_assertions::assert_eq;

use patchscore::cmd::evaluate::report::{RunMetrics, write_case_artifacts, write_run_metrics};
use patchscore::scoring::{ScoreWeights, score_patches_detailed, symbols::PythonSymbols};

#[test]
fn case_artifacts_land_in_per_case_directory() {
    let dir = tempfile::tempdir().unwrap();
    let generated = "+++ b/foo.py\n@@ -1,1 +1,2 @@\n+def bar():\n";
    let breakdown =
        score_patches_detailed(generated, generated, &ScoreWeights::default(), &PythonSymbols);

    let summary = write_case_artifacts(dir.path(), 2972, "docs text", generated, generated, &breakdown)
        .expect("write artifacts");

    assert_eq!(summary.pr_number, 2972);
    assert!((summary.similarity - 1.0).abs() < 1e-9);

    let case_dir = dir.path().join("pr_2972");
    assert_eq!(std::fs::read_to_string(case_dir.join("doc.txt")).unwrap(), "docs text");
    assert_eq!(std::fs::read_to_string(case_dir.join("gen_patch.diff")).unwrap(), generated);
    assert_eq!(std::fs::read_to_string(case_dir.join("actual_patch.diff")).unwrap(), generated);

    let summary_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(case_dir.join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary_json["pr_number"], 2972);
    assert!(summary_json["generated_patch_path"].as_str().unwrap().ends_with("gen_patch.diff"));
}

#[test]
fn run_metrics_mean_ignores_failed_cases() {
    let metrics = RunMetrics::new(vec![0.5, 1.0], 12.5, vec!["pr_7: boom".to_string()]);
    assert!((metrics.mean_score - 0.75).abs() < 1e-9);

    let dir = tempfile::tempdir().unwrap();
    let path = write_run_metrics(dir.path(), &metrics).expect("write metrics");

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(parsed["per_case_similarity"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["errors"][0], "pr_7: boom");

    let correct: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("correct.json")).unwrap())
            .unwrap();
    assert_eq!(correct["correct"], true);
    assert_eq!(correct["error"], "pr_7: boom");
}

#[test]
fn empty_run_has_zero_mean() {
    let metrics = RunMetrics::new(Vec::new(), 0.1, Vec::new());
    assert!((metrics.mean_score - 0.0).abs() < 1e-9);
}
