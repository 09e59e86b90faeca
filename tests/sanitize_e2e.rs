// tests/sanitize_e2e.rs
// The pipeline and the rule set agree: whatever the sanitizer emits, the
// content rules accept.

use sd_scrape::core::dom::Fragment;
use sd_scrape::core::policy::AllowPolicy;
use sd_scrape::core::sanitize::sanitize_description;
use sd_scrape::rules::content_rules;

const PAGE: &str = "https://developer.mozilla.org/docs/Web/CSS/color";

fn check(name: &str, markup: &str, policy: &AllowPolicy) -> bool {
    let rule = content_rules()
        .into_iter()
        .find(|r| r.name == name)
        .expect("known rule name");
    let frag = Fragment::parse(markup);
    (rule.check)(&frag, policy).passes
}

#[test]
fn nbsp_entities_become_literal_spaces() {
    let policy = AllowPolicy::default();
    let input = "Use&nbsp;literal&nbsp;spaces.";
    let output = sanitize_description(input, PAGE, &policy);

    assert_eq!(output, "Use literal spaces.");
    assert!(!check("no-nbsps", input, &policy));
    assert!(check("no-nbsps", &output, &policy));
}

#[test]
fn stripped_attributes_pass_recheck() {
    let policy = AllowPolicy::default();
    let input = r#"<a href="/en-US/docs/Web/CSS/width" data-foo="y">t</a>"#;
    assert!(!check("no-forbidden-attrs", input, &policy));

    let output = sanitize_description(input, PAGE, &policy);
    assert!(check("no-forbidden-attrs", &output, &policy));
    // relative link got absolutized (and delocalized) along the way
    assert!(output.contains("https://developer.mozilla.org/docs/Web/CSS/width"));
}

#[test]
fn root_relative_links_are_absolutized() {
    let policy = AllowPolicy::default();
    let output = sanitize_description(r#"<a href="/docs/Web/CSS/width">w</a>"#, PAGE, &policy);
    assert!(output.contains("'https://developer.mozilla.org/docs/Web/CSS/width'"));
}

#[test]
fn sanitizing_twice_changes_nothing() {
    let policy = AllowPolicy::default();
    let input = concat!(
        "The <strong><code>color</code></strong> CSS property sets the foreground ",
        r#"<a href="/en-US/docs/Web/CSS/color_value">color value</a> of an element's text "#,
        r#"and <a href="/en-US/docs/Web/CSS/text-decoration" name="notallowed">text decorations</a>.&nbsp;"#,
    );
    let once = sanitize_description(input, PAGE, &policy);
    let twice = sanitize_description(&once, PAGE, &policy);
    assert_eq!(once, twice);
}

#[test]
fn realistic_summary_sanitizes_to_a_passing_record() {
    let policy = AllowPolicy::default();
    let input = concat!(
        "The <strong><code>color</code></strong> CSS property sets the foreground ",
        r#"<a href="/en-US/docs/Web/CSS/color_value">color value</a> of an element's text "#,
        r#"and <a href="/en-US/docs/Web/CSS/text-decoration" name="x">text decorations</a>."#,
    );
    let output = sanitize_description(input, PAGE, &policy);

    for rule in content_rules() {
        let frag = Fragment::parse(&output);
        let verdict = (rule.check)(&frag, &policy);
        assert!(verdict.passes, "rule {} rejected sanitized output", rule.name);
    }

    // locale segment gone, storage quoting in force
    assert!(output.contains("'https://developer.mozilla.org/docs/Web/CSS/color_value'"));
    assert!(!output.contains('"'));
}
