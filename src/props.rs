// src/props.rs
// Property metadata: CSS property name → wiki page URL. The embedded analog
// of the upstream property-data table; scrape and lint-wiki resolve names
// through here. A property can be known yet have no wiki page.

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct PropertyMeta {
    pub name: &'static str,
    pub wiki_url: Option<&'static str>,
}

macro_rules! css_prop {
    ($name:literal) => {
        PropertyMeta {
            name: $name,
            wiki_url: Some(concat!("https://developer.mozilla.org/docs/Web/CSS/", $name)),
        }
    };
    ($name:literal, none) => {
        PropertyMeta { name: $name, wiki_url: None }
    };
}

static PROPERTIES: &[PropertyMeta] = &[
    css_prop!("align-content"),
    css_prop!("align-items"),
    css_prop!("align-self"),
    css_prop!("animation"),
    css_prop!("azimuth", none),
    css_prop!("background"),
    css_prop!("background-color"),
    css_prop!("background-image"),
    css_prop!("border"),
    css_prop!("border-radius"),
    css_prop!("bottom"),
    css_prop!("box-shadow"),
    css_prop!("box-sizing"),
    css_prop!("clear"),
    css_prop!("color"),
    css_prop!("column-gap"),
    css_prop!("cursor"),
    css_prop!("display"),
    css_prop!("filter"),
    css_prop!("flex"),
    css_prop!("flex-basis"),
    css_prop!("flex-direction"),
    css_prop!("float"),
    css_prop!("font"),
    css_prop!("font-family"),
    css_prop!("font-size"),
    css_prop!("font-weight"),
    css_prop!("gap"),
    css_prop!("grid"),
    css_prop!("height"),
    css_prop!("justify-content"),
    css_prop!("left"),
    css_prop!("letter-spacing"),
    css_prop!("line-height"),
    css_prop!("margin"),
    css_prop!("max-width"),
    css_prop!("min-height"),
    css_prop!("opacity"),
    css_prop!("order"),
    css_prop!("outline"),
    css_prop!("overflow"),
    css_prop!("padding"),
    css_prop!("position"),
    css_prop!("right"),
    css_prop!("ruby-merge", none),
    css_prop!("text-align"),
    css_prop!("text-decoration"),
    css_prop!("top"),
    css_prop!("transform"),
    css_prop!("transition"),
    css_prop!("vertical-align"),
    css_prop!("visibility"),
    css_prop!("white-space"),
    css_prop!("width"),
    css_prop!("z-index"),
];

pub fn all() -> impl Iterator<Item = &'static PropertyMeta> {
    PROPERTIES.iter()
}

pub fn find(name: &str) -> Option<&'static PropertyMeta> {
    PROPERTIES.iter().find(|meta| meta.name == name)
}

/// Hard-error resolution for an explicitly named property.
pub fn wiki_url(name: &str) -> Result<&'static str, Box<dyn Error>> {
    let meta = find(name).ok_or_else(|| format!("{name} is not a known CSS property"))?;
    meta.wiki_url
        .ok_or_else(|| format!("{name} does not have a wiki URL").into())
}

/// Page-summary form of a wiki URL: raw + summary output, plus a
/// cache-busting token (the wiki caches aggressively).
pub fn summary_url(url: &str) -> String {
    format!("{url}?raw&summary&{}", cache_buster())
}

fn cache_buster() -> String {
    let mut n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
        .unwrap_or(0);
    let digits = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = s!();
    for _ in 0..5 {
        out.push(digits[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_property_resolves() {
        assert_eq!(
            wiki_url("color").unwrap(),
            "https://developer.mozilla.org/docs/Web/CSS/color"
        );
    }

    #[test]
    fn unknown_property_is_an_error() {
        let err = wiki_url("not-a-property").unwrap_err();
        assert!(err.to_string().contains("not a known CSS property"));
    }

    #[test]
    fn url_less_property_is_an_error() {
        let err = wiki_url("azimuth").unwrap_err();
        assert!(err.to_string().contains("does not have a wiki URL"));
    }

    #[test]
    fn summary_url_keeps_base_and_flags() {
        let url = summary_url("https://developer.mozilla.org/docs/Web/CSS/color");
        assert!(url.starts_with("https://developer.mozilla.org/docs/Web/CSS/color?raw&summary&"));
    }
}
