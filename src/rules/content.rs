// src/rules/content.rs
// The content rule set: independent predicates over a parsed fragment.
// Each rule is a self-documenting descriptor with a stable name, a prose
// description, and one literal bad/good example pair; the examples double
// as the rule set's own self-test (good must pass clean, bad must fail).

use crate::core::dom::{Fragment, ROOT};
use crate::core::policy::AllowPolicy;
use crate::core::text::{char_len, first_sentence, split_at_chars};

use super::{Verdict, HI, RESET};

pub const MAX_LENGTH: usize = 180;
pub const MAX_FIRST_SENTENCE_LENGTH: usize = 150;

pub struct ContentRule {
    /// Stable machine-readable identifier. Exclusion lists and tests key
    /// off this, never off the description prose.
    pub name: &'static str,
    pub description: String,
    pub bad: &'static str,
    pub good: &'static str,
    /// Whether the rule applies to live wiki content (pre-sanitization).
    pub wiki: bool,
    pub check: fn(&Fragment, &AllowPolicy) -> Verdict,
}

pub fn content_rules() -> Vec<ContentRule> {
    vec![
        ContentRule {
            name: "max-sentence-length",
            description: format!(
                "First sentence should not exceed {MAX_FIRST_SENTENCE_LENGTH} characters"
            ),
            bad: "This is a very, very, very, very, very, very, very, very, very, very, \
                  very, very, very, very, very, very, very, very, very, very, very, very, \
                  very, very long first sentence. This is the second sentence.",
            good: "This is a short first sentence. This is the second sentence.",
            wiki: true,
            check: check_first_sentence_length,
        },
        ContentRule {
            name: "max-length",
            description: format!("Overall length should not exceed {MAX_LENGTH} characters"),
            bad: "This is an example. This is an example. This is an example. \
                  This is an example. This is an example. This is an example. \
                  This is an example. This is an example. This is an example. \
                  But now we've gone on too long.",
            good: "This is short and sweet.",
            wiki: true,
            check: check_total_length,
        },
        ContentRule {
            name: "no-nbsps",
            description: s!("\"&nbsp;\" shouldn't be used"),
            bad: "Use&nbsp;literal&nbsp;spaces.",
            good: "Use literal spaces.",
            wiki: false,
            check: check_no_nbsps,
        },
        ContentRule {
            name: "no-forbidden-tags",
            description: s!("Only use allowed tags"),
            bad: "<div>I am a poet<br> and didn't even know it.</div>",
            good: "I am a poet and didn't even know it.",
            wiki: true,
            check: check_no_forbidden_tags,
        },
        ContentRule {
            name: "no-forbidden-attrs",
            description: s!("Only use allowed attributes"),
            bad: "<a data-random=\"v7mm9m5c\" href=\"https://developer.mozilla.org/\">MDN Web Docs</a>",
            good: "<a href=\"https://developer.mozilla.org/\">MDN Web Docs</a>",
            wiki: false,
            check: check_no_forbidden_attrs,
        },
    ]
}

fn check_first_sentence_length(frag: &Fragment, _policy: &AllowPolicy) -> Verdict {
    let sentence = first_sentence(&frag.text_content());
    let len = char_len(&sentence);
    if len <= MAX_FIRST_SENTENCE_LENGTH {
        return Verdict::ok();
    }
    let (head, tail) = split_at_chars(&sentence, MAX_FIRST_SENTENCE_LENGTH);
    Verdict::fail(vec![
        format!(
            "First sentence may be too long. Expected ≤{MAX_FIRST_SENTENCE_LENGTH}; got {len}"
        ),
        format!("> {head}{HI}{tail}{RESET}"),
    ])
}

fn check_total_length(frag: &Fragment, _policy: &AllowPolicy) -> Verdict {
    let text = frag.text_content();
    let len = char_len(&text);
    if len <= MAX_LENGTH {
        return Verdict::ok();
    }
    let (head, tail) = split_at_chars(&text, MAX_LENGTH);
    Verdict::fail(vec![
        format!("Summary is too long. Expected ≤{MAX_LENGTH} characters; got {len}"),
        format!("> {head}{HI}{tail}{RESET}"),
    ])
}

// The entity escape form only; literal U+00A0 characters are fine.
fn check_no_nbsps(frag: &Fragment, _policy: &AllowPolicy) -> Verdict {
    let html = frag.serialize();
    if !html.contains("&nbsp") {
        return Verdict::ok();
    }
    Verdict::fail(vec![
        s!("Contains `&nbsp;` instead of literal spaces."),
        format!("> {}", html.replace("&nbsp;", &format!("{HI}&nbsp;{RESET}"))),
    ])
}

fn check_no_forbidden_tags(frag: &Fragment, policy: &AllowPolicy) -> Verdict {
    let ids = frag.elements();
    let bad_tags = policy.forbidden_tags_in(ids.iter().filter_map(|&id| frag.tag(id)));
    if bad_tags.is_empty() {
        return Verdict::ok();
    }

    // For context, echo the parent markup of each offending element.
    let mut errors = vec![format!(
        "Contains forbidden tags: {HI}{}{RESET}",
        bad_tags.join(", ")
    )];
    for &id in &ids {
        let Some(tag) = frag.tag(id) else { continue };
        if bad_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            let parent = frag.parent(id).unwrap_or(ROOT);
            errors.push(format!("> {}", frag.inner_html(parent)));
        }
    }
    Verdict::fail(errors)
}

fn check_no_forbidden_attrs(frag: &Fragment, policy: &AllowPolicy) -> Verdict {
    let mut bad_attrs: Vec<String> = Vec::new();
    for id in frag.elements() {
        let Some(tag) = frag.tag(id) else { continue };
        let names: Vec<&str> = frag.attrs(id).iter().map(|(k, _)| k.as_str()).collect();
        bad_attrs.extend(policy.forbidden_attributes_of(tag, &names));
    }
    if bad_attrs.is_empty() {
        return Verdict::ok();
    }
    Verdict::fail(vec![format!(
        "Contains forbidden attributes: {HI}{}{RESET}",
        bad_attrs.join(", ")
    )])
}
