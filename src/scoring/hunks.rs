use once_cell::sync::Lazy;
use regex::Regex;

// `+++ b/<path>` names the resulting file of a change; it is the only line
// that opens a file section. Renames therefore key under the new path.
static FILE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\+\+\s+b/(.+)$").expect("file header regex"));

/// Ordered mapping from file path to the hunk texts collected for it.
///
/// Insertion order is the order paths first appear in the diff. A path that
/// shows up in more than one `+++` section keeps a single entry whose hunks
/// are concatenated in encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HunkMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HunkMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, hunks)| hunks.as_slice())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(p, h)| (p.as_str(), h.as_slice()))
    }

    fn append(&mut self, path: String, mut hunks: Vec<String>) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            existing.append(&mut hunks);
        } else {
            self.entries.push((path, hunks));
        }
    }
}

/// Parse a unified-diff blob into a [`HunkMap`].
///
/// Heuristic and total: unrecognized lines are dropped, malformed input
/// yields a partial or empty map, never an error. A hunk is the `@@` header
/// line plus every following `+`/`-`/space line up to the next boundary.
pub fn parse_file_hunks(diff: &str) -> HunkMap {
    let mut files = HunkMap::default();
    if diff.trim().is_empty() {
        return files;
    }

    let mut current_file: Option<String> = None;
    let mut current_hunks: Vec<String> = Vec::new();
    let mut hunk_buf: Vec<&str> = Vec::new();

    for line in diff.lines() {
        if let Some(caps) = FILE_HEADER.captures(line) {
            // New file section: flush the previous one, if any.
            if let Some(path) = current_file.take() {
                if !hunk_buf.is_empty() {
                    current_hunks.push(hunk_buf.join("\n"));
                }
                files.append(path, std::mem::take(&mut current_hunks));
            }
            // Hunks finalized before the first header belong to no file.
            current_hunks.clear();
            hunk_buf.clear();
            current_file = Some(caps[1].trim().to_string());
            continue;
        }

        if line.starts_with("@@") {
            if !hunk_buf.is_empty() {
                current_hunks.push(hunk_buf.join("\n"));
            }
            hunk_buf = vec![line];
            continue;
        }

        // Body lines accumulate only while a file section is open.
        if current_file.is_some()
            && (line.starts_with('+') || line.starts_with('-') || line.starts_with(' '))
        {
            hunk_buf.push(line);
        }
    }

    if let Some(path) = current_file {
        if !hunk_buf.is_empty() {
            current_hunks.push(hunk_buf.join("\n"));
        }
        files.append(path, current_hunks);
    }

    files
}
