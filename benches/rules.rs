// benches/rules.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sd_scrape::core::dom::Fragment;
use sd_scrape::core::policy::AllowPolicy;
use sd_scrape::core::sanitize::sanitize_description;
use sd_scrape::rules::content_rules;

const SAMPLE: &str = concat!(
    "The <strong><code>color</code></strong> CSS property sets the foreground ",
    "<a href='https://developer.mozilla.org/docs/Web/CSS/color_value'>color value</a> ",
    "of an element's text and <a href='https://developer.mozilla.org/docs/Web/CSS/",
    "text-decoration'>text decorations</a>. It also sets the ",
    "<a href='https://developer.mozilla.org/docs/Web/CSS/currentcolor'><code>currentcolor",
    "</code></a> value, an indirect value on <em>other</em> properties.",
);

const PAGE: &str = "https://developer.mozilla.org/docs/Web/CSS/color";

fn bench_core(c: &mut Criterion) {
    let policy = AllowPolicy::default();

    c.bench_function("parse_fragment", |b| {
        b.iter(|| Fragment::parse(black_box(SAMPLE)))
    });

    c.bench_function("content_rules", |b| {
        let frag = Fragment::parse(SAMPLE);
        let rules = content_rules();
        b.iter(|| {
            rules
                .iter()
                .filter(|r| (r.check)(black_box(&frag), &policy).passes)
                .count()
        })
    });

    c.bench_function("sanitize_description", |b| {
        b.iter(|| sanitize_description(black_box(SAMPLE), PAGE, &policy))
    });
}

criterion_group!(benches, bench_core);
criterion_main!(benches);
