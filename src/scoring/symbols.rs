use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::hunks::HunkMap;

/// Named symbols recovered from hunk content: defined functions/classes on
/// one side, simple assignment targets on the other.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolSets {
    pub functions: HashSet<String>,
    pub variables: HashSet<String>,
}

impl SymbolSets {
    pub fn merge(&mut self, other: SymbolSets) {
        self.functions.extend(other.functions);
        self.variables.extend(other.variables);
    }
}

/// Pattern set for one source syntax. The scorer only ever sees this trait,
/// so supporting another language means swapping the patterns, not the
/// scoring policy.
pub trait SymbolExtractor {
    /// Scan one hunk's text and return the symbols it touches.
    fn extract_from_hunk(&self, hunk: &str) -> SymbolSets;
}

static PATTERN_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*def\s+([A-Za-z_]\w*)\s*\(").expect("def regex"));
static PATTERN_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*class\s+([A-Za-z_]\w*)\s*[:(]").expect("class regex"));
static PATTERN_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=").expect("assign regex"));

/// Heuristic extractor for Python-style sources: `def NAME(`, `class NAME`
/// and `name =` at line start. Functions and classes share one set; both are
/// "named symbols defined". Not a grammar — false negatives (multi-target or
/// attribute assignment) are accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonSymbols;

impl SymbolExtractor for PythonSymbols {
    fn extract_from_hunk(&self, hunk: &str) -> SymbolSets {
        let mut out = SymbolSets::default();
        for line in hunk.lines() {
            // Strip the diff marker before matching.
            let content = match line.as_bytes().first() {
                Some(b'+') | Some(b'-') | Some(b' ') => &line[1..],
                _ => line,
            };

            // First match wins; at most one symbol per line.
            if let Some(caps) = PATTERN_DEF.captures(content) {
                out.functions.insert(caps[1].to_string());
                continue;
            }
            if let Some(caps) = PATTERN_CLASS.captures(content) {
                out.functions.insert(caps[1].to_string());
                continue;
            }
            if let Some(caps) = PATTERN_ASSIGN.captures(content) {
                // A second `=` right after the match means a comparison.
                let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                if content.as_bytes().get(end) != Some(&b'=') {
                    out.variables.insert(caps[1].to_string());
                }
            }
        }
        out
    }
}

/// Union the symbols of every hunk across every file of one diff side. No
/// per-file breakdown survives this point.
pub fn collect_from_hunk_map(files: &HunkMap, extractor: &dyn SymbolExtractor) -> SymbolSets {
    let mut all = SymbolSets::default();
    for (_, hunks) in files.iter() {
        for hunk in hunks {
            all.merge(extractor.extract_from_hunk(hunk));
        }
    }
    all
}
