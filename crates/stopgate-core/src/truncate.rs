//! Diagnostic truncation.
//!
//! Block reasons are read back by the orchestrating model, so a wall of
//! linter output is worse than useless. Over-cap output is filtered down to
//! the lines that carry an error/warning marker or name a source file, then
//! bounded at 20 lines / 2000 characters.

/// Character cap on emitted diagnostic text.
pub const MAX_OUTPUT_CHARS: usize = 2000;

/// Line cap applied after relevance filtering.
pub const MAX_OUTPUT_LINES: usize = 20;

const TRUNCATION_SUFFIX: &str = "\n... (output truncated)";

/// Case-sensitive substrings that mark a line as relevant.
const MARKERS: [&str; 4] = ["error", "Error", "warning", "Warning"];

/// Source-file extensions that mark a line as relevant (tool output that
/// names a file is worth keeping even without an error word on that line).
const SOURCE_EXTENSIONS: [&str; 6] = [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

fn is_relevant(line: &str) -> bool {
    MARKERS.iter().any(|m| line.contains(m))
        || SOURCE_EXTENSIONS.iter().any(|ext| line.contains(ext))
}

/// Truncate raw check output for the block reason.
///
/// Text already within the cap is passed through unchanged and unfiltered.
/// Anything longer keeps the first [`MAX_OUTPUT_LINES`] relevant lines,
/// re-capped at [`MAX_OUTPUT_CHARS`] on a char boundary, with a fixed suffix
/// noting the truncation.
pub fn truncate_diagnostics(raw: &str) -> String {
    if raw.len() <= MAX_OUTPUT_CHARS {
        return raw.to_string();
    }

    let kept: Vec<&str> = raw
        .lines()
        .filter(|line| is_relevant(line))
        .take(MAX_OUTPUT_LINES)
        .collect();

    let mut text = if kept.is_empty() {
        // Nothing matched the markers; fall back to the head of the raw text
        // so the reason is never empty for a genuinely failing check.
        raw.lines().take(MAX_OUTPUT_LINES).collect::<Vec<_>>().join("\n")
    } else {
        kept.join("\n")
    };

    if text.len() > MAX_OUTPUT_CHARS {
        let mut end = MAX_OUTPUT_CHARS;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }

    text.push_str(TRUNCATION_SUFFIX);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_is_untouched() {
        let raw = "error TS2322: Type 'string' is not assignable to type 'number'.";
        assert_eq!(truncate_diagnostics(raw), raw);
    }

    #[test]
    fn short_output_is_not_filtered() {
        // Under the cap, irrelevant lines survive too.
        let raw = "some banner\nerror on line 3\ndone";
        assert_eq!(truncate_diagnostics(raw), raw);
    }

    #[test]
    fn long_output_keeps_only_relevant_lines() {
        let mut raw = String::new();
        for i in 0..100 {
            raw.push_str(&format!("noise line {i} with plenty of padding text\n"));
        }
        raw.push_str("src/app.ts:4:1 error something broke\n");
        raw.push_str("warning: unused variable\n");

        let out = truncate_diagnostics(&raw);
        assert!(out.contains("src/app.ts:4:1 error something broke"));
        assert!(out.contains("warning: unused variable"));
        assert!(!out.contains("noise line 0"));
        assert!(out.ends_with("... (output truncated)"));
    }

    #[test]
    fn line_cap_is_twenty() {
        let mut raw = String::new();
        for i in 0..200 {
            raw.push_str(&format!("error number {i}\n"));
        }
        let out = truncate_diagnostics(&raw);
        let diagnostic_lines = out
            .lines()
            .filter(|l| l.starts_with("error number"))
            .count();
        assert_eq!(diagnostic_lines, MAX_OUTPUT_LINES);
        assert!(out.contains("error number 0"));
        assert!(out.contains("error number 19"));
        assert!(!out.contains("error number 20\n"));
    }

    #[test]
    fn char_cap_is_enforced() {
        let long_line = format!("error: {}", "x".repeat(500));
        let raw = format!("{long_line}\n").repeat(10);
        let out = truncate_diagnostics(&raw);
        assert!(out.len() <= MAX_OUTPUT_CHARS + TRUNCATION_SUFFIX.len());
        assert!(out.ends_with("... (output truncated)"));
    }

    #[test]
    fn no_relevant_lines_falls_back_to_head() {
        let line = format!("{}\n", "x".repeat(50));
        let raw = line.repeat(100);
        let out = truncate_diagnostics(&raw);
        assert!(!out.is_empty());
        assert!(out.ends_with("... (output truncated)"));
    }

    #[test]
    fn file_extension_counts_as_relevant() {
        let mut raw = "padding\n".repeat(300);
        raw.push_str("src/index.jsx mentioned here\n");
        let out = truncate_diagnostics(&raw);
        assert!(out.contains("src/index.jsx mentioned here"));
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert!(is_relevant("Error: bad"));
        assert!(is_relevant("error: bad"));
        assert!(!is_relevant("ERR0R in all caps only"));
    }
}
