//! Parsing and matching of OAuth2 scope claims.
//!
//! A scope claim is a single string holding whitespace separated scope
//! tokens, e.g. `"altinn:instances.read altinn:instances.write"`. [`Scopes`]
//! borrows the raw claim value and never allocates: matching walks the
//! tokens in place.

use std::fmt;
use std::str::SplitWhitespace;

/// Scope granted to logins through the platform's own portal. Valid for every application.
pub const PORTAL_END_USER_SCOPE: &str = "altinn:portal/enduser";
pub const DEFAULT_READ_SCOPE: &str = "altinn:instances.read";
pub const DEFAULT_WRITE_SCOPE: &str = "altinn:instances.write";
pub const SERVICE_OWNER_READ_SCOPE: &str = "altinn:serviceowner/instances.read";
pub const SERVICE_OWNER_WRITE_SCOPE: &str = "altinn:serviceowner/instances.write";

/// Borrowed view over a raw scope claim value.
///
/// Two `Scopes` are equal iff their raw strings are equal. Token order and
/// whitespace therefore matter for equality, but not for matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Scopes<'a> {
    raw: Option<&'a str>,
}

impl<'a> Scopes<'a> {
    pub fn new(raw: Option<&'a str>) -> Self {
        Self { raw }
    }

    pub fn empty() -> Self {
        Self { raw: None }
    }

    /// The raw claim value, if one was present.
    pub fn raw(&self) -> Option<&'a str> {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterate the scope tokens. Every call starts from the beginning.
    pub fn iter(&self) -> ScopeIter<'a> {
        ScopeIter {
            inner: self.raw.unwrap_or_default().split_whitespace(),
        }
    }

    /// True iff some token equals `scope` exactly (ordinal, case-sensitive).
    pub fn has_scope(&self, scope: &str) -> bool {
        self.iter().any(|token| token == scope)
    }

    /// True iff some token starts with `prefix` followed by a colon.
    ///
    /// `prefix` must be a complete path segment: `altinn:serviceowner` matches
    /// `altinn:serviceowner:read` but not `altinn:serviceowners.read`.
    pub fn has_scope_prefix(&self, prefix: &str) -> bool {
        self.iter().any(|token| {
            token
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(':'))
        })
    }
}

impl<'a> From<&'a str> for Scopes<'a> {
    fn from(raw: &'a str) -> Self {
        Self::new(Some(raw))
    }
}

impl<'a> IntoIterator for Scopes<'a> {
    type Item = &'a str;
    type IntoIter = ScopeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Scopes<'a> {
    type Item = &'a str;
    type IntoIter = ScopeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Scopes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.unwrap_or_default())
    }
}

/// Forward iterator over the tokens of a [`Scopes`] value.
#[derive(Debug, Clone)]
pub struct ScopeIter<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Iterator for ScopeIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
