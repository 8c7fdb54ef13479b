use std::collections::BTreeMap;

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

/// Render a list of file paths as a textual tree grouped by directory.
///
/// Deterministic: paths are deduplicated and sorted, so identical inputs
/// always produce identical output. Safe to embed in a model prompt.
pub fn build_file_tree<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = TreeNode::default();
    for path in paths {
        let normalized = path.as_ref().replace('\\', "/");
        let mut node = &mut root;
        for part in normalized.split('/').filter(|p| !p.is_empty()) {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    let mut lines = Vec::new();
    render(&root, "", &mut lines);
    lines.join("\n")
}

fn render(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└─ " } else { "├─ " };
        lines.push(format!("{prefix}{connector}{name}"));
        if !child.children.is_empty() {
            let ext = if last { "   " } else { "│  " };
            render(child, &format!("{prefix}{ext}"), lines);
        }
    }
}
