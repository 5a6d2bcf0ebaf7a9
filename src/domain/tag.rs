use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Tag name after `refs/tags/`, stopping at a newline or a peeled-tag `^`
static TAG_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"refs/tags/([^^\n]+)").expect("tag ref pattern is valid"));

/// Snapshot of tag names, local or remote. Enumeration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: HashSet<String>,
}

impl TagSet {
    /// Extracts tag names from `git show-ref` / `git ls-remote` output.
    ///
    /// Annotated tags listed twice (once peeled as `name^{}`) collapse to a
    /// single entry.
    pub fn from_ref_listing(listing: &str) -> Self {
        let names = TAG_REF
            .captures_iter(listing)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches('\r').to_string())
            .collect();

        TagSet { names }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.names.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
