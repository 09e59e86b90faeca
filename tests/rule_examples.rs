// tests/rule_examples.rs
// Every rule documents itself with one bad and one good example; the rule
// set's standing invariant is that each rule agrees with its own examples.

use sd_scrape::core::dom::Fragment;
use sd_scrape::core::policy::AllowPolicy;
use sd_scrape::rules::{content_rules, source_rules};

#[test]
fn content_rule_good_examples_pass_clean() {
    let policy = AllowPolicy::default();
    for rule in content_rules() {
        let verdict = (rule.check)(&Fragment::parse(rule.good), &policy);
        assert!(
            verdict.passes,
            "expected pass for \"{}\" good example",
            rule.name
        );
        assert!(
            verdict.errors.is_empty(),
            "expected 0 errors for \"{}\" good example",
            rule.name
        );
    }
}

#[test]
fn content_rule_bad_examples_fail_with_diagnostics() {
    let policy = AllowPolicy::default();
    for rule in content_rules() {
        let verdict = (rule.check)(&Fragment::parse(rule.bad), &policy);
        assert!(
            !verdict.passes,
            "expected fail for \"{}\" bad example",
            rule.name
        );
        assert!(
            !verdict.errors.is_empty(),
            "expected errors for \"{}\" bad example",
            rule.name
        );
    }
}

#[test]
fn source_rule_good_examples_pass_clean() {
    for rule in source_rules() {
        let verdict = (rule.check)(rule.good);
        assert!(
            verdict.passes,
            "expected pass for \"{}\" good example",
            rule.name
        );
        assert!(
            verdict.errors.is_empty(),
            "expected 0 errors for \"{}\" good example",
            rule.name
        );
    }
}

#[test]
fn source_rule_bad_examples_fail_with_diagnostics() {
    for rule in source_rules() {
        let verdict = (rule.check)(rule.bad);
        assert!(
            !verdict.passes,
            "expected fail for \"{}\" bad example",
            rule.name
        );
        assert!(
            !verdict.errors.is_empty(),
            "expected errors for \"{}\" bad example",
            rule.name
        );
    }
}

#[test]
fn rule_names_are_stable_and_unique() {
    let mut names: Vec<&str> = content_rules().iter().map(|r| r.name).collect();
    names.extend(source_rules().iter().map(|r| r.name));

    let mut deduped = names.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len(), "duplicate rule name");

    // identifiers are the stable contract; descriptions are prose
    assert!(names.contains(&"max-sentence-length"));
    assert!(names.contains(&"max-length"));
    assert!(names.contains(&"no-nbsps"));
    assert!(names.contains(&"no-forbidden-tags"));
    assert!(names.contains(&"no-forbidden-attrs"));
    assert!(names.contains(&"parseable"));
    assert!(names.contains(&"formatted"));
}

#[test]
fn rules_are_order_independent() {
    // same verdicts whichever order the rules run in
    let policy = AllowPolicy::default();
    let markup = r#"<div>bad tag</div> and <a href="/x" data-foo="y">bad attr</a>"#;
    let frag = Fragment::parse(markup);

    let forward: Vec<bool> = content_rules()
        .iter()
        .map(|r| (r.check)(&frag, &policy).passes)
        .collect();
    let reverse: Vec<bool> = content_rules()
        .iter()
        .rev()
        .map(|r| (r.check)(&frag, &policy).passes)
        .collect();

    let mut reverse_reversed = reverse.clone();
    reverse_reversed.reverse();
    assert_eq!(forward, reverse_reversed);
}
