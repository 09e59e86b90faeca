// src/core/sanitize.rs
// The sanitizing transform pipeline: fetched wiki fragment → canonical
// stored markup. DOM stages first, then string stages, composed in order.

use crate::config::consts::DOC_HOST;

use super::dom::Fragment;
use super::policy::AllowPolicy;
use super::url;

/// Rewrite every anchor's href to an absolute, locale-neutral address.
pub fn clean_links(frag: &mut Fragment, page_url: &str) {
    for id in frag.elements() {
        if frag.tag(id) != Some("a") {
            continue;
        }
        let Some(href) = frag.attr(id, "href").map(String::from) else {
            continue;
        };
        let absolute = url::resolve(page_url, &href);
        frag.set_attr(id, "href", &delocalize(&absolute));
    }
}

/// Strip the locale path segment from documentation-host addresses: the
/// first path segment is dropped unless it is literally `docs`. Other hosts
/// pass through untouched.
pub fn delocalize(address: &str) -> String {
    if url::host(address) != Some(DOC_HOST) {
        return s!(address);
    }
    let Some((origin, rest)) = url::split_origin(address) else {
        return s!(address);
    };
    let (path, suffix) = match rest.find(['?', '#']) {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let mut segments: Vec<&str> = path.split('/').collect();
    if segments.len() > 1 && !segments[1].is_empty() && segments[1] != "docs" {
        segments.remove(1);
    }
    format!("{origin}{}{suffix}", segments.join("/"))
}

/// Remove every attribute the policy forbids. Only fires for tags the policy
/// knows; unknown tags keep their attributes (the tag rule reports those).
pub fn strip_unwanted_attrs(frag: &mut Fragment, policy: &AllowPolicy) {
    for id in frag.elements() {
        let Some(tag) = frag.tag(id).map(String::from) else {
            continue;
        };
        let Some(allowed) = policy.allowed_attrs(&tag) else {
            continue;
        };
        let unwanted: Vec<String> = frag
            .attrs(id)
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| !allowed.iter().any(|a| a.eq_ignore_ascii_case(name)))
            .collect();
        for name in unwanted {
            frag.remove_attr(id, &name);
        }
    }
}

/// Storage convention: single-quoted markup.
pub fn replace_double_quotes(html: &str) -> String {
    html.replace('"', "'")
}

/// The entity escape form is banned from stored descriptions.
pub fn remove_nbsps(html: &str) -> String {
    html.replace("&nbsp;", " ")
}

/// Full pipeline. `page_url` is the address the fragment was fetched from,
/// used to absolutize relative links.
pub fn sanitize_description(markup: &str, page_url: &str, policy: &AllowPolicy) -> String {
    let mut frag = Fragment::parse(markup);
    clean_links(&mut frag, page_url);
    strip_unwanted_attrs(&mut frag, policy);
    let html = frag.serialize();
    remove_nbsps(&replace_double_quotes(&html))
}
