/// System message for every documentation-oriented model call.
pub const SYSTEM_MESSAGE: &str =
    "You convert source code into high-quality documentation that helps engineers \
     understand behavior and make correct changes. Be specific and reference \
     symbols and files explicitly.";

/// System message for patch generation: the reply must be a bare unified diff.
pub const PATCH_SYSTEM_MESSAGE: &str =
    "You generate unified diff patches based on documentation and issue/PR context. \
     Output only a unified diff with file paths and hunks (---, +++, @@).";

/// Summarization instruction injected into the summarize template.
pub const SUMMARIZE_DOC_PROMPT: &str =
    "You are an expert technical writer. Given source code, produce concise, actionable \
     documentation focused on purpose, key APIs, error handling, and edge cases. Keep it \
     short and suitable for code review guidance.";

/// Ask the model to pick relevant files from a rendered tree. The reply must
/// be a JSON array of relative paths.
pub fn build_selection_prompt(tree: &str) -> String {
    format!(
        "Given the project file tree below, pick which files are most relevant for \
         generating concise developer-facing documentation about implementation, \
         APIs, data flows and edge cases. Reply ONLY with a JSON array of the \
         relative file paths you choose (no extra text).\n\n{tree}\n"
    )
}

/// Inject the summarization instruction and the concatenated file contents.
pub fn build_summarize_prompt(files: &str) -> String {
    format!("{SUMMARIZE_DOC_PROMPT}\n\n{files}")
}

/// User prompt asking for a minimal candidate patch for one PR.
pub fn build_patch_prompt(doc_text: &str, pr_body: &str) -> String {
    format!(
        "Given the documentation below and the PR description, propose a minimal patch \
         that addresses the issue in the PR.\n\n\
         <documentation>\n{doc_text}\n</documentation>\n\n\
         <pr_description>\n{pr_body}\n</pr_description>\n"
    )
}
