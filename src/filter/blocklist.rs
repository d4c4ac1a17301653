//! Blocklist for tracking domains.
//!
//! Loads a static list of patterns at compile time and matches queried
//! host names against it without allocating.

/// Embedded list of tracker patterns, loaded at compile time.
const STALKERS_LIST: &str = include_str!("stalkers.txt");

/// A single blocklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern<'a> {
    /// Leading-dot entry, matches any name ending in the text (dot included).
    Suffix(&'a str),
    /// Whole-name entry, matched ignoring ASCII case.
    Exact(&'a str),
}

impl<'a> Pattern<'a> {
    /// Classify a raw entry by its first byte.
    pub fn parse(pattern: &'a str) -> Self {
        if pattern.starts_with('.') {
            Pattern::Suffix(pattern)
        } else {
            Pattern::Exact(pattern)
        }
    }

    /// The entry as written in the list.
    pub fn as_str(&self) -> &'a str {
        match *self {
            Pattern::Suffix(s) | Pattern::Exact(s) => s,
        }
    }

    /// Check whether `name` is covered by this entry.
    ///
    /// Suffix entries compare byte-for-byte, so `ADS.DOUBLECLICK.NET` does
    /// not match `.doubleclick.net`. Exact entries ignore ASCII case.
    pub fn matches(&self, name: &[u8]) -> bool {
        match self {
            Pattern::Suffix(suffix) => name.ends_with(suffix.as_bytes()),
            Pattern::Exact(exact) => name.eq_ignore_ascii_case(exact.as_bytes()),
        }
    }
}

/// Check if host `name` matches the given raw `pattern`.
pub fn match_pattern(name: &[u8], pattern: &str) -> bool {
    Pattern::parse(pattern).matches(name)
}

/// An ordered set of tracker patterns.
///
/// The source text is kept as-is and walked line by line on every lookup,
/// so membership checks never touch the heap.
#[derive(Debug, Clone, Copy)]
pub struct Blocklist {
    source: &'static str,
}

impl Blocklist {
    /// Create a blocklist from the embedded stalkers list.
    pub const fn new() -> Self {
        Self::from_source(STALKERS_LIST)
    }

    /// Create a blocklist from list text in the embedded format: one pattern
    /// per line, `#` comments and blank lines ignored.
    pub const fn from_source(source: &'static str) -> Self {
        Self { source }
    }

    /// Iterate the patterns in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = Pattern<'static>> {
        self.source.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            Some(Pattern::parse(line))
        })
    }

    /// Return the first pattern that covers `name`, if any.
    pub fn matching_pattern(&self, name: impl AsRef<[u8]>) -> Option<Pattern<'static>> {
        let name = name.as_ref();
        self.patterns().find(|pattern| pattern.matches(name))
    }

    /// Check if a host name should be answered locally.
    pub fn is_blocked(&self, name: impl AsRef<[u8]>) -> bool {
        self.matching_pattern(name).is_some()
    }

    /// Returns the number of patterns in the blocklist.
    pub fn len(&self) -> usize {
        self.patterns().count()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns().next().is_none()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new()
    }
}
