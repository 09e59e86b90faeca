// src/core/policy.rs
// Allow-list policy: which tags may appear in a short description and which
// attributes each tag may carry. Built once and passed by reference into the
// rules and the sanitizer; never mutated.
//
// The tag and attribute checks are deliberately asymmetric: a tag absent
// from the table is forbidden outright, but attribute checks fire only for
// tags the table knows about (unknown tags are the tag rule's problem).

#[derive(Clone, Debug)]
pub struct AllowPolicy {
    /// Tag (uppercase) → allowed attribute names (lowercase). Ordered.
    allowed: Vec<(String, Vec<String>)>,
}

const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    ("A", &["href"]),
    ("CODE", &[]),
    ("EM", &[]),
    ("STRONG", &[]),
];

impl Default for AllowPolicy {
    fn default() -> Self {
        AllowPolicy::new(DEFAULT_TABLE)
    }
}

impl AllowPolicy {
    pub fn new(table: &[(&str, &[&str])]) -> Self {
        let allowed = table
            .iter()
            .map(|(tag, attrs)| {
                (
                    tag.to_ascii_uppercase(),
                    attrs.iter().map(|a| a.to_ascii_lowercase()).collect(),
                )
            })
            .collect();
        AllowPolicy { allowed }
    }

    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.allowed.iter().any(|(t, _)| t.eq_ignore_ascii_case(tag))
    }

    /// Allowed attribute names for `tag`; None when the tag is not in the
    /// table at all (attribute checks must then stay silent).
    pub fn allowed_attrs(&self, tag: &str) -> Option<&[String]> {
        self.allowed
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, attrs)| attrs.as_slice())
    }

    /// `TAG.attribute` for every attribute not allowed on `tag`. Tags absent
    /// from the table contribute nothing.
    pub fn forbidden_attributes_of(&self, tag: &str, attr_names: &[&str]) -> Vec<String> {
        let Some(allowed) = self.allowed_attrs(tag) else {
            return Vec::new();
        };
        attr_names
            .iter()
            .filter(|name| !allowed.iter().any(|a| a.eq_ignore_ascii_case(name)))
            .map(|name| format!("{}.{}", tag.to_ascii_uppercase(), name))
            .collect()
    }

    /// Distinct tags (first-seen order, uppercase) missing from the table.
    pub fn forbidden_tags_in<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            if self.is_tag_allowed(tag) {
                continue;
            }
            let upper = tag.to_ascii_uppercase();
            if !out.contains(&upper) {
                out.push(upper);
            }
        }
        out
    }
}
