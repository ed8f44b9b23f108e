//! Editor rule file generated from the template's `GEMINI.md`.
//!
//! The rule file is the source document prefixed with a front-matter block:
//!
//! ```text
//! ---
//! description: <first line of the source, heading marks removed>
//! globs:
//! alwaysApply: true
//! ---
//!
//! <source document, verbatim>
//! ```

/// Document at the project root the rule file is derived from.
pub const RULE_SOURCE_FILE: &str = "GEMINI.md";

/// Description taken from the first line of `source`.
///
/// The line is trimmed; when it starts with `#`, the leading run of `#` and
/// spaces is dropped as well, so `"## iOS rules"` becomes `"iOS rules"`.
pub fn rule_description(source: &str) -> String {
    let first_line = source.lines().next().unwrap_or_default().trim();

    if first_line.starts_with('#') {
        first_line
            .trim_start_matches(['#', ' '])
            .trim()
            .to_string()
    } else {
        first_line.to_string()
    }
}

/// Full content of the rule file for `source`.
pub fn render_rule_file(source: &str) -> String {
    let description = rule_description(source);
    format!("---\ndescription: {description}\nglobs:\nalwaysApply: true\n---\n\n{source}")
}
