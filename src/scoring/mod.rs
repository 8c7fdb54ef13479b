//! Patch similarity scoring.
//!
//! Compares a generated unified diff against the actually merged one and
//! produces a score in [0, 1] that rewards structural agreement: same files
//! touched, same hunks, same functions and variables. Pure and
//! deterministic; parsing never fails, degenerate input degrades to a low
//! but well-defined score.

pub mod hunks;
pub mod symbols;

use std::collections::HashSet;

use hunks::parse_file_hunks;
use symbols::{PythonSymbols, SymbolExtractor, collect_from_hunk_map};

/// Convex combination weights for the three agreement signals. File-level
/// agreement dominates: it is the strongest evidence that the same artifact
/// was touched. The split is tuned policy, not derived from data, which is
/// why it is a value and not a constant baked into the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub file: f64,
    pub function: f64,
    pub variable: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { file: 0.5, function: 0.35, variable: 0.15 }
    }
}

/// Component scores plus their weighted combination.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScoreBreakdown {
    pub file_score: f64,
    pub function_score: f64,
    pub variable_score: f64,
    pub combined: f64,
}

impl ScoreBreakdown {
    fn zero() -> Self {
        Self { file_score: 0.0, function_score: 0.0, variable_score: 0.0, combined: 0.0 }
    }
}

/// `|A ∩ B| / |A ∪ B|`, with two empty sets counting as perfect agreement:
/// "neither side touched any identifiers" is itself a match.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 { 0.0 } else { inter as f64 / union as f64 }
}

/// Score two unified diffs with the default weights and the Python symbol
/// patterns. Symmetric in its arguments.
pub fn score_patches(generated: &str, actual: &str) -> f64 {
    score_patches_detailed(generated, actual, &ScoreWeights::default(), &PythonSymbols).combined
}

/// Full scoring pipeline with explicit weights and symbol patterns.
pub fn score_patches_detailed(
    generated: &str,
    actual: &str,
    weights: &ScoreWeights,
    extractor: &dyn SymbolExtractor,
) -> ScoreBreakdown {
    let g = generated.trim();
    let a = actual.trim();

    // Emptiness is not rewarded: no signal on either side scores zero, and a
    // missing side zeroes every component.
    if g.is_empty() || a.is_empty() {
        return ScoreBreakdown::zero();
    }

    let g_files = parse_file_hunks(g);
    let a_files = parse_file_hunks(a);

    let file_score = if g_files.is_empty() && a_files.is_empty() {
        // Neither side looks like a unified diff (e.g. a full rewritten
        // file); fall back to literal equality of the trimmed texts.
        if g == a { 1.0 } else { 0.0 }
    } else {
        let mut all_paths: Vec<&str> = g_files.paths().collect();
        for p in a_files.paths() {
            if !all_paths.contains(&p) {
                all_paths.push(p);
            }
        }
        if all_paths.is_empty() {
            0.0
        } else {
            let matches = all_paths
                .iter()
                .filter(|p| {
                    match (g_files.get(p), a_files.get(p)) {
                        // Order-sensitive hunk equality; empty sections carry
                        // no evidence and never count.
                        (Some(gh), Some(ah)) => !gh.is_empty() && !ah.is_empty() && gh == ah,
                        _ => false,
                    }
                })
                .count();
            matches as f64 / all_paths.len() as f64
        }
    };

    let g_syms = collect_from_hunk_map(&g_files, extractor);
    let a_syms = collect_from_hunk_map(&a_files, extractor);

    let function_score = jaccard(&g_syms.functions, &a_syms.functions);
    let variable_score = jaccard(&g_syms.variables, &a_syms.variables);

    let combined = weights.file * file_score
        + weights.function * function_score
        + weights.variable * variable_score;

    ScoreBreakdown {
        file_score,
        function_score,
        variable_score,
        combined: combined.clamp(0.0, 1.0),
    }
}
