use pretty_assertions::assert_eq;

use patchscore::cmd::evaluate::tree::build_file_tree;

#[test]
fn renders_nested_paths_sorted() {
    let tree = build_file_tree(["src/cli.py", "src/app.py", "README.md"]);
    let expected = "\
├─ README.md
└─ src
   ├─ app.py
   └─ cli.py";
    assert_eq!(tree, expected);
}

#[test]
fn deduplicates_and_normalizes_separators() {
    let a = build_file_tree(["pkg\\mod.py", "pkg/mod.py", "pkg/mod.py"]);
    let b = build_file_tree(["pkg/mod.py"]);
    assert_eq!(a, b);
}

#[test]
fn is_deterministic_regardless_of_input_order() {
    let a = build_file_tree(["b/x.py", "a/y.py", "a/z.py"]);
    let b = build_file_tree(["a/z.py", "a/y.py", "b/x.py"]);
    assert_eq!(a, b);
}

#[test]
fn empty_input_renders_empty_string() {
    let paths: Vec<&str> = Vec::new();
    assert_eq!(build_file_tree(paths), "");
}

#[test]
fn sibling_directories_use_continuation_bars() {
    let tree = build_file_tree(["docs/guide.md", "src/main.py"]);
    let expected = "\
├─ docs
│  └─ guide.md
└─ src
   └─ main.py";
    assert_eq!(tree, expected);
}
