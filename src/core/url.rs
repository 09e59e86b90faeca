// src/core/url.rs
// Minimal address handling for link cleaning. Covers the URL shapes that
// occur in wiki fragments; not a general-purpose parser.

/// Scheme of an absolute address ("https"), if it has one.
pub fn scheme(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let candidate = &url[..colon];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

/// "scheme://authority" prefix and the rest ("/path?query#fragment").
pub fn split_origin(url: &str) -> Option<(&str, &str)> {
    let p = url.find("://")?;
    let after = p + 3;
    let path_start = url[after..]
        .find(|c| matches!(c, '/' | '?' | '#'))
        .map(|q| after + q)
        .unwrap_or(url.len());
    Some((&url[..path_start], &url[path_start..]))
}

/// Hostname of an absolute URL (userinfo and port stripped).
pub fn host(url: &str) -> Option<&str> {
    let (origin, _) = split_origin(url)?;
    let auth = &origin[origin.find("://")? + 3..];
    let auth = auth.rsplit('@').next().unwrap_or(auth);
    let auth = auth.split(':').next().unwrap_or(auth);
    Some(auth)
}

/// Resolve `href` against `base` into an absolute address.
pub fn resolve(base: &str, href: &str) -> String {
    if href.is_empty() {
        return s!(base);
    }
    if scheme(href).is_some() {
        return s!(href);
    }
    if href.starts_with("//") {
        let scheme = scheme(base).unwrap_or("https");
        return format!("{scheme}:{href}");
    }
    let Some((origin, base_rest)) = split_origin(base) else {
        // relative base: nothing sane to resolve against
        return s!(href);
    };
    if let Some(frag) = href.strip_prefix('#') {
        let without = base.split('#').next().unwrap_or(base);
        return format!("{without}#{frag}");
    }
    if let Some(query) = href.strip_prefix('?') {
        let path = base_rest.split(['?', '#']).next().unwrap_or("");
        return format!("{origin}{path}?{query}");
    }
    if href.starts_with('/') {
        return format!("{origin}{}", normalize_path(href));
    }
    // path-relative: resolve against the base path's directory
    let base_path = base_rest.split(['?', '#']).next().unwrap_or("");
    let dir = match base_path.rfind('/') {
        Some(i) => &base_path[..i + 1],
        None => "/",
    };
    format!("{origin}{}", normalize_path(&format!("{dir}{href}")))
}

/// Collapse "." and ".." segments of an absolute path (query/fragment kept).
fn normalize_path(path: &str) -> String {
    let (path_only, suffix) = match path.find(['?', '#']) {
        Some(i) => path.split_at(i),
        None => (path, ""),
    };
    let mut segments: Vec<&str> = Vec::new();
    for seg in path_only.split('/').skip(1) {
        match seg {
            "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let trailing_dot = path_only.ends_with("/.") || path_only.ends_with("/..");
    let mut out = s!();
    for seg in &segments {
        out.push('/');
        out.push_str(seg);
    }
    if out.is_empty() || trailing_dot {
        out.push('/');
    }
    format!("{out}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/color?raw&summary";

    #[test]
    fn absolute_href_passes_through() {
        assert_eq!(resolve(BASE, "https://example.com/a"), "https://example.com/a");
        assert_eq!(resolve(BASE, "mailto:x@example.com"), "mailto:x@example.com");
    }

    #[test]
    fn root_relative_uses_origin() {
        assert_eq!(
            resolve(BASE, "/en-US/docs/Web/CSS/color_value"),
            "https://developer.mozilla.org/en-US/docs/Web/CSS/color_value"
        );
    }

    #[test]
    fn path_relative_resolves_against_directory() {
        assert_eq!(
            resolve(BASE, "color_value"),
            "https://developer.mozilla.org/en-US/docs/Web/CSS/color_value"
        );
        assert_eq!(
            resolve(BASE, "../text-decoration"),
            "https://developer.mozilla.org/en-US/docs/Web/text-decoration"
        );
    }

    #[test]
    fn protocol_relative_keeps_scheme() {
        assert_eq!(
            resolve(BASE, "//example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn fragment_href_replaces_fragment() {
        assert_eq!(
            resolve("https://example.com/a#old", "#new"),
            "https://example.com/a#new"
        );
    }

    #[test]
    fn host_extraction() {
        assert_eq!(host(BASE), Some("developer.mozilla.org"));
        assert_eq!(host("https://user@example.com:8080/x"), Some("example.com"));
        assert_eq!(host("/relative/path"), None);
    }
}
