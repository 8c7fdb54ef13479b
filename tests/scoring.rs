use pretty_assertions::assert_eq;

use patchscore::scoring::hunks::parse_file_hunks;
use patchscore::scoring::symbols::{PythonSymbols, SymbolExtractor};
use patchscore::scoring::{ScoreWeights, score_patches, score_patches_detailed};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

const REAL_DIFF: &str = "\
diff --git a/src/app.py b/src/app.py
index 83db48f..bf269f4 100644
--- a/src/app.py
+++ b/src/app.py
@@ -10,6 +10,9 @@
 def make_app(config):
-    timeout = 10
+    timeout = 30
+    retries = 3
     return App(config)
@@ -40,4 +43,6 @@
+def shutdown(app):
+    app.close()
";

#[test]
fn identical_diffs_score_one() {
    assert!(approx(score_patches(REAL_DIFF, REAL_DIFF), 1.0));
}

#[test]
fn empty_inputs_score_zero() {
    assert!(approx(score_patches("", ""), 0.0));
    assert!(approx(score_patches("   \n\t", ""), 0.0));
}

#[test]
fn one_sided_input_scores_zero() {
    assert!(approx(score_patches(REAL_DIFF, ""), 0.0));
    assert!(approx(score_patches("", REAL_DIFF), 0.0));
}

#[test]
fn score_is_symmetric() {
    let other = "\
+++ b/src/app.py
@@ -10,6 +10,7 @@
+    timeout = 60
+++ b/src/cli.py
@@ -1,2 +1,3 @@
+def main():
";
    let ab = score_patches(REAL_DIFF, other);
    let ba = score_patches(other, REAL_DIFF);
    assert!(approx(ab, ba));
}

#[test]
fn parser_splits_two_file_sections() {
    let diff = "\
+++ b/alpha.py
@@ -1,2 +1,3 @@
+def first():
+++ b/beta.py
@@ -4,1 +4,2 @@
+def second():
@@ -9,1 +10,2 @@
+third = 1
";
    let files = parse_file_hunks(diff);
    assert_eq!(files.len(), 2);

    let paths: Vec<&str> = files.paths().collect();
    assert_eq!(paths, vec!["alpha.py", "beta.py"]);

    let alpha = files.get("alpha.py").unwrap();
    assert_eq!(alpha, ["@@ -1,2 +1,3 @@\n+def first():"].as_slice());

    let beta = files.get("beta.py").unwrap();
    assert_eq!(beta.len(), 2);
    assert!(beta[0].starts_with("@@ -4,1"));
    assert!(beta[1].starts_with("@@ -9,1"));
}

#[test]
fn parser_ignores_preamble_and_orphan_hunks() {
    // Hunks before any `+++` header have no file to attach to.
    let diff = "\
@@ -1,1 +1,1 @@
+orphan = 1
diff --git a/a.py b/a.py
index 0000000..1111111 100644
+++ b/a.py
@@ -1,1 +1,2 @@
+kept = 2
";
    let files = parse_file_hunks(diff);
    assert_eq!(files.len(), 1);
    assert_eq!(files.get("a.py").unwrap(), ["@@ -1,1 +1,2 @@\n+kept = 2"].as_slice());
}

#[test]
fn orphan_hunks_do_not_leak_into_the_first_file() {
    // Two orphan hunks: the second finalizes the first before any file
    // section opens. Neither may end up attached to a.py.
    let diff = "\
@@ -1,1 +1,1 @@
@@ -2,2 +2,2 @@
+++ b/a.py
@@ -3,1 +3,2 @@
+x = 1
";
    let files = parse_file_hunks(diff);
    assert_eq!(files.len(), 1);
    assert_eq!(files.get("a.py").unwrap(), ["@@ -3,1 +3,2 @@\n+x = 1"].as_slice());
}

#[test]
fn parser_returns_empty_map_for_blank_input() {
    assert!(parse_file_hunks("").is_empty());
    assert!(parse_file_hunks("  \n\n\t").is_empty());
}

#[test]
fn repeated_file_sections_concatenate_hunks() {
    let diff = "\
+++ b/same.py
@@ -1,1 +1,2 @@
+a = 1
+++ b/other.py
@@ -1,1 +1,2 @@
+b = 2
+++ b/same.py
@@ -9,1 +10,2 @@
+c = 3
";
    let files = parse_file_hunks(diff);
    assert_eq!(files.len(), 2);
    let same = files.get("same.py").unwrap();
    assert_eq!(same.len(), 2);
    assert!(same[0].contains("+a = 1"));
    assert!(same[1].contains("+c = 3"));
}

#[test]
fn renamed_file_keys_under_new_path() {
    let diff = "\
--- a/old_name.py
+++ b/new_name.py
@@ -1,1 +1,1 @@
+x = 1
";
    let files = parse_file_hunks(diff);
    assert!(files.get("new_name.py").is_some());
    assert!(files.get("old_name.py").is_none());
}

#[test]
fn partial_file_overlap_scenario() {
    let generated = "\
+++ b/foo.py
@@ -1,3 +1,4 @@
+def bar():
+    return 1
";
    let actual = "\
+++ b/foo.py
@@ -1,3 +1,4 @@
+def bar():
+    return 1
+++ b/baz.py
@@ -1,2 +1,3 @@
+value = 2
";
    let b = score_patches_detailed(generated, actual, &ScoreWeights::default(), &PythonSymbols);
    // 1 of 2 union paths matches exactly; bar is shared; value is one-sided.
    assert!(approx(b.file_score, 0.5));
    assert!(approx(b.function_score, 1.0));
    assert!(approx(b.variable_score, 0.0));
    assert!(approx(b.combined, 0.5 * 0.5 + 0.35 * 1.0));
}

#[test]
fn non_diff_input_falls_back_to_literal_equality() {
    let full_file = "def main():\n    print('hello')\n";
    let b = score_patches_detailed(full_file, full_file, &ScoreWeights::default(), &PythonSymbols);
    assert!(approx(b.file_score, 1.0));
    assert!(approx(b.combined, 1.0));

    let other = "def main():\n    print('goodbye')\n";
    let b = score_patches_detailed(full_file, other, &ScoreWeights::default(), &PythonSymbols);
    assert!(approx(b.file_score, 0.0));
    // No hunks on either side means no identifiers on either side, and two
    // empty sets count as agreement.
    assert!(approx(b.function_score, 1.0));
    assert!(approx(b.variable_score, 1.0));
}

#[test]
fn differing_hunks_on_same_path_do_not_count_as_file_match() {
    let generated = "\
+++ b/foo.py
@@ -1,1 +1,2 @@
+def bar():
";
    let actual = "\
+++ b/foo.py
@@ -1,1 +1,2 @@
+def qux():
";
    let b = score_patches_detailed(generated, actual, &ScoreWeights::default(), &PythonSymbols);
    assert!(approx(b.file_score, 0.0));
    assert!(approx(b.function_score, 0.0));
}

#[test]
fn custom_weights_are_respected() {
    let weights = ScoreWeights { file: 1.0, function: 0.0, variable: 0.0 };
    let generated = "\
+++ b/foo.py
@@ -1,1 +1,2 @@
+def bar():
";
    let b = score_patches_detailed(generated, generated, &weights, &PythonSymbols);
    assert!(approx(b.combined, 1.0));
}

#[test]
fn extractor_recognizes_defs_assignments_and_skips_comparisons() {
    let hunk = "\
@@ -1,4 +1,6 @@
+def handle_request(self, req):
+    timeout = 30
+    if timeout == 30:
+        pass
";
    let sets = PythonSymbols.extract_from_hunk(hunk);
    assert_eq!(sets.functions.len(), 1);
    assert!(sets.functions.contains("handle_request"));
    assert_eq!(sets.variables.len(), 1);
    assert!(sets.variables.contains("timeout"));
}

#[test]
fn extractor_puts_classes_in_the_function_set() {
    let hunk = "\
@@ -1,2 +1,4 @@
+class RequestHandler(Base):
-class LegacyHandler:
 unchanged = 1
";
    let sets = PythonSymbols.extract_from_hunk(hunk);
    assert!(sets.functions.contains("RequestHandler"));
    assert!(sets.functions.contains("LegacyHandler"));
    assert!(sets.variables.contains("unchanged"));
}

#[test]
fn extractor_ignores_bare_comparisons_and_augmented_assignment() {
    let sets = PythonSymbols.extract_from_hunk("+flag == other\n+count += 1\n");
    assert!(sets.functions.is_empty());
    assert!(sets.variables.is_empty());
}

#[test]
fn extractor_records_one_symbol_per_line() {
    // The def pattern wins; the trailing assignment on the same line is not
    // scanned again.
    let sets = PythonSymbols.extract_from_hunk("+def wrapped(fn): cache = {}\n");
    assert!(sets.functions.contains("wrapped"));
    assert!(sets.variables.is_empty());
}
