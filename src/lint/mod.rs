// src/lint/mod.rs
// Two-phase lint: source format first, content second. A record whose
// source format fails is never content-checked (content result stays
// indeterminate); one record's failure never stops the run.

use std::{error::Error, fs, path::Path};

use crate::core::dom::Fragment;
use crate::core::policy::AllowPolicy;
use crate::progress::Progress;
use crate::rules::{content_rules, source_rules, ContentRule};
use crate::scrape::{fetch_many, FetchItem};
use crate::{props, store};

/// Per-record outcome.
#[derive(Clone, Debug)]
pub struct LintResult {
    pub identifier: String,
    pub source_passes: bool,
    /// None when the source phase failed (content never checked).
    pub content_passes: Option<bool>,
    pub success: bool,
}

/// One record's outcome plus its display diagnostics.
pub struct RecordOutcome {
    pub result: LintResult,
    pub messages: Vec<String>,
}

/// Aggregated outcome of a batch run.
pub struct Report {
    pub results: Vec<LintResult>,
    pub messages: Vec<String>,
}

impl Report {
    pub fn checked(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.identifier.as_str())
            .collect()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

/// Source phase: rules run in order, first failure wins.
fn lint_source(identifier: &str, source: &str, messages: &mut Vec<String>) -> bool {
    for rule in source_rules() {
        let verdict = (rule.check)(source);
        if !verdict.passes {
            messages.extend(verdict.errors.iter().map(|e| format!("{identifier}: {e}")));
            return false;
        }
    }
    true
}

/// Content phase: every rule runs; all diagnostics are collected.
fn lint_content(
    identifier: &str,
    frag: &Fragment,
    policy: &AllowPolicy,
    messages: &mut Vec<String>,
) -> bool {
    let mut passes = true;
    for rule in content_rules() {
        let verdict = (rule.check)(frag, policy);
        if !verdict.passes {
            messages.extend(verdict.errors.iter().map(|e| format!("{identifier}: {e}")));
            passes = false;
        }
    }
    passes
}

/// Evaluate one persisted record through both phases.
pub fn evaluate_record(identifier: &str, source: &str, policy: &AllowPolicy) -> RecordOutcome {
    let mut messages = Vec::new();

    if !lint_source(identifier, source, &mut messages) {
        messages.push(format!(
            "{identifier}: source checks didn't pass. Skipping content checks."
        ));
        return RecordOutcome {
            result: LintResult {
                identifier: s!(identifier),
                source_passes: false,
                content_passes: None,
                success: false,
            },
            messages,
        };
    }

    // Source phase guaranteed parseability; shape errors surface here.
    let description = serde_json::from_str::<serde_json::Value>(source)
        .map_err(|e| -> Box<dyn Error> { e.into() })
        .and_then(|record| store::extract_description(&record))
        .map(|(_, description)| description);

    let (content_passes, success) = match description {
        Ok(description) => {
            let frag = Fragment::parse(&description);
            let passes = lint_content(identifier, &frag, policy, &mut messages);
            (Some(passes), passes)
        }
        Err(e) => {
            messages.push(format!("{identifier}: {e}"));
            (Some(false), false)
        }
    };

    RecordOutcome {
        result: LintResult {
            identifier: s!(identifier),
            source_passes: true,
            content_passes,
            success,
        },
        messages,
    }
}

/// Lint every `.json` record under `dir`.
pub fn lint_directory(dir: &Path, policy: &AllowPolicy) -> Result<Report, Box<dyn Error>> {
    let t = std::time::Instant::now();
    let mut results = Vec::new();
    let mut messages = Vec::new();

    for path in store::collect_json_files(dir)? {
        let source = fs::read_to_string(&path)?;
        let outcome = evaluate_record(&path.display().to_string(), &source, policy);
        results.push(outcome.result);
        messages.extend(outcome.messages);
    }
    logd!("Lint: {} records in {:?}", results.len(), t.elapsed());

    Ok(Report { results, messages })
}

/// Rules that apply to live wiki content (pre-sanitization).
pub fn wiki_rules() -> Vec<ContentRule> {
    content_rules().into_iter().filter(|r| r.wiki).collect()
}

/// Check one markup fragment against the wiki rule subset.
/// Messages carry the property and source address for attribution.
pub fn check_wiki_fragment(
    prop: &str,
    address: &str,
    markup: &str,
    policy: &AllowPolicy,
) -> RecordOutcome {
    let frag = Fragment::parse(markup);
    let mut messages = Vec::new();
    let mut passes = true;

    for rule in wiki_rules() {
        let verdict = (rule.check)(&frag, policy);
        if !verdict.passes {
            messages.extend(
                verdict
                    .errors
                    .iter()
                    .map(|e| format!("{prop} ({address}): {e}")),
            );
            passes = false;
        }
    }

    RecordOutcome {
        result: LintResult {
            identifier: s!(prop),
            source_passes: true,
            content_passes: Some(passes),
            success: passes,
        },
        messages,
    }
}

/// Fetch the named properties' live wiki content and lint each fragment.
/// Fetch failures are per-item results, not batch aborts.
pub fn lint_wiki(
    names: &[String],
    policy: &AllowPolicy,
    progress: Option<&mut dyn Progress>,
) -> Result<Report, Box<dyn Error>> {
    let mut items = Vec::new();
    for name in names {
        let url = props::wiki_url(name)?;
        items.push(FetchItem {
            name: name.clone(),
            url: props::summary_url(url),
        });
    }

    let mut results = Vec::new();
    let mut messages = Vec::new();

    for (item, result) in fetch_many(items, progress) {
        match result {
            Ok(body) => {
                let outcome = check_wiki_fragment(&item.name, &item.url, &body, policy);
                results.push(outcome.result);
                messages.extend(outcome.messages);
            }
            Err(msg) => {
                messages.push(format!("{} ({}): {msg}", item.name, item.url));
                results.push(LintResult {
                    identifier: item.name,
                    source_passes: true,
                    content_passes: None,
                    success: false,
                });
            }
        }
    }

    Ok(Report { results, messages })
}
