//! Command parser facade plus a minimal reference line-based grammar.
//!
//! The concrete command syntax is explicitly out of scope (SPEC_FULL.md §1's Non-goals name
//! "the command grammar's concrete syntax"), so `LineCommandParser` is a supplementary
//! reconstruction rather than a mandated one — one command per line, `name key="value" key2=bare`,
//! in the teacher's plain hand-rolled parsing style (no parser-combinator crate reached for
//! anywhere in the pack).

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    pub command_name: String,
    pub args: std::collections::HashMap<String, String>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub trait CommandParser: Send + Sync {
    fn parse_text(&self, text: &str) -> Vec<ParseResult>;

    fn generate_error_report(&self, results: &[ParseResult]) -> String {
        let mut lines = Vec::new();
        for result in results {
            for error in &result.errors {
                lines.push(format!("line {}: {}", error.line, error.message));
            }
        }
        lines.join("\n")
    }
}

fn arg_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(\w+)=(?:"([^"]*)"|(\S+))"#).unwrap())
}

/// One command invocation per non-blank line: `command_name key="value" key2=bare`.
pub struct LineCommandParser;

impl CommandParser for LineCommandParser {
    fn parse_text(&self, text: &str) -> Vec<ParseResult> {
        let mut results = Vec::new();
        for (offset, raw_line) in text.lines().enumerate() {
            let line_number = offset + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let command_name = parts.next().unwrap_or_default().to_string();
            let rest = parts.next().unwrap_or_default();

            let mut args = std::collections::HashMap::new();
            let mut errors = Vec::new();
            for caps in arg_pattern().captures_iter(rest) {
                let key = caps.get(1).unwrap().as_str().to_string();
                let value = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str().to_string()).unwrap_or_default();
                args.insert(key, value);
            }
            if !rest.trim().is_empty() && args.is_empty() {
                errors.push(ParseError { line: line_number, message: format!("could not parse arguments: '{rest}'") });
            }

            results.push(ParseResult { command_name, args, errors });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_arguments() {
        let parser = LineCommandParser;
        let results = parser.parse_text(r#"add_artifact name="notes" summary="a short note" external=true"#);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.command_name, "add_artifact");
        assert_eq!(result.args.get("name").map(String::as_str), Some("notes"));
        assert_eq!(result.args.get("summary").map(String::as_str), Some("a short note"));
        assert_eq!(result.args.get("external").map(String::as_str), Some("true"));
        assert!(result.is_ok());
    }

    #[test]
    fn multiple_lines_produce_multiple_results() {
        let parser = LineCommandParser;
        let results = parser.parse_text("focus_down child=\"A\"\nfinish_problem");
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].command_name, "finish_problem");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let parser = LineCommandParser;
        let results = parser.parse_text("\n\nfinish_problem\n\n");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn error_report_includes_line_numbers() {
        let parser = LineCommandParser;
        let results = vec![ParseResult {
            command_name: "bad".into(),
            args: Default::default(),
            errors: vec![ParseError { line: 3, message: "boom".into() }],
        }];
        let report = parser.generate_error_report(&results);
        assert_eq!(report, "line 3: boom");
    }
}
