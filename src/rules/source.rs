// src/rules/source.rs
// Source-format rules: the persisted record must be parseable JSON and must
// match its own canonical pretty-print byte for byte (2-space indentation,
// trailing newline). Checked line-by-line so a mismatch reports the first
// differing line.

use super::{Verdict, HI, RESET};

pub struct SourceRule {
    pub name: &'static str,
    pub description: &'static str,
    pub bad: &'static str,
    pub good: &'static str,
    pub check: fn(&str) -> Verdict,
}

pub fn source_rules() -> Vec<SourceRule> {
    vec![
        SourceRule {
            name: "parseable",
            description: "JSON must be parseable",
            bad: "{",
            good: "{}",
            check: check_parseable,
        },
        SourceRule {
            name: "formatted",
            description: "JSON should be pretty-printed with 2-space indentation",
            bad: r#"{
"css": {
"properties": {
"align-content": {
"__short_description": ""
}
}
}
}"#,
            good: r#"{
  "css": {
    "properties": {
      "align-content": {
        "__short_description": ""
      }
    }
  }
}"#,
            check: check_formatted,
        },
    ]
}

fn check_parseable(source: &str) -> Verdict {
    match serde_json::from_str::<serde_json::Value>(source) {
        Ok(_) => Verdict::ok(),
        Err(err) => Verdict::fail(vec![format!("Could not parse as JSON: {err}")]),
    }
}

fn check_formatted(source: &str) -> Verdict {
    let parsed: serde_json::Value = match serde_json::from_str(source) {
        Ok(v) => v,
        Err(err) => return Verdict::fail(vec![format!("Could not parse as JSON: {err}")]),
    };
    let expected = match serde_json::to_string_pretty(&parsed) {
        Ok(s) => format!("{s}\n"),
        Err(err) => return Verdict::fail(vec![format!("Could not re-serialize JSON: {err}")]),
    };

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    for (i, actual) in source.split('\n').enumerate() {
        let want = expected_lines.get(i).copied().unwrap_or("");
        if actual != want {
            return Verdict::fail(vec![
                s!("Unexpected JSON formatting"),
                format!("Line {} (Expected): {want}", i + 1),
                format!("Line {} (Actual): {HI}{actual}{RESET}", i + 1),
            ]);
        }
    }
    Verdict::ok()
}
