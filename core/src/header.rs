//! Case-insensitive, multi-valued HTTP headers.
//!
//! # Design
//! An `HttpHeader` is a name plus an ordered, non-empty list of values. The
//! name keeps the casing it was created with but every comparison (equality,
//! hashing, lookup inside `HttpHeaders`) ignores ASCII case. Values are only
//! reachable through a shared slice, so a header cannot change once built.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{not_blank, ClientError};

/// A single HTTP header with one or more values.
#[derive(Debug, Clone)]
pub struct HttpHeader {
    name: String,
    values: Vec<String>,
}

impl HttpHeader {
    /// Create a header with a single value.
    ///
    /// Fails with [`ClientError::Validation`] if `name` is blank.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_values(name, [value])
    }

    /// Create a header with several values, kept in the given order.
    ///
    /// Fails with [`ClientError::Validation`] if `name` is blank or `values`
    /// is empty.
    pub fn with_values<I, V>(name: impl Into<String>, values: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        not_blank(&name, "name")?;

        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ClientError::Validation("values must not be empty".to_string()));
        }

        Ok(Self { name, values })
    }

    /// Build a header from parts already known to be valid.
    pub(crate) fn trusted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn first_value(&self) -> &str {
        &self.values[0]
    }

    /// Same as [`first_value`](Self::first_value) for single-valued headers.
    pub fn last_value(&self) -> &str {
        &self.values[self.values.len() - 1]
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for HttpHeader {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(&other.name) && self.values == other.values
    }
}

impl Eq for HttpHeader {}

impl Hash for HttpHeader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.values.hash(state);
    }
}

impl fmt::Display for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpHeader {{{} = [{}]}}", self.name, self.values.join(", "))
    }
}

/// Ordered collection of headers, looked up by case-insensitive name.
///
/// Each name appears at most once; repeated values for the same name are
/// merged into a single multi-valued [`HttpHeader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: Vec<HttpHeader>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the header's values after any existing values for the same name.
    pub fn append(&mut self, header: HttpHeader) {
        match self.position(&header.name) {
            Some(index) => self.entries[index].values.extend(header.values),
            None => self.entries.push(header),
        }
    }

    /// Replace any existing header with the same name, returning it.
    pub fn insert(&mut self, header: HttpHeader) -> Option<HttpHeader> {
        match self.position(&header.name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], header)),
            None => {
                self.entries.push(header);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&HttpHeader> {
        self.entries.iter().find(|header| header.is_named(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<HttpHeader> {
        self.position(name).map(|index| self.entries.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HttpHeader> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|header| header.is_named(name))
    }
}

impl FromIterator<HttpHeader> for HttpHeaders {
    fn from_iter<I: IntoIterator<Item = HttpHeader>>(iter: I) -> Self {
        let mut headers = HttpHeaders::new();
        for header in iter {
            headers.append(header);
        }
        headers
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = &'a HttpHeader;
    type IntoIter = std::slice::Iter<'a, HttpHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(header: &HttpHeader) -> u64 {
        let mut hasher = DefaultHasher::new();
        header.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn single_value_is_first_and_last() {
        let header = HttpHeader::new("Accept", "application/json").unwrap();
        assert_eq!(header.name(), "Accept");
        assert_eq!(header.first_value(), "application/json");
        assert_eq!(header.last_value(), "application/json");
        assert_eq!(header.values(), ["application/json"]);
    }

    #[test]
    fn multiple_values_keep_order_and_duplicates() {
        let header = HttpHeader::with_values("Accept", ["text/html", "text/plain", "text/html"]).unwrap();
        assert_eq!(header.first_value(), "text/html");
        assert_eq!(header.last_value(), "text/html");
        assert_eq!(header.values().len(), 3);
        assert_eq!(header.values()[1], "text/plain");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(HttpHeader::new("", "x"), Err(ClientError::Validation(_))));
        assert!(matches!(HttpHeader::new("   ", "x"), Err(ClientError::Validation(_))));
    }

    #[test]
    fn empty_values_are_rejected() {
        let values: Vec<String> = Vec::new();
        assert!(matches!(
            HttpHeader::with_values("Accept", values),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn empty_value_is_allowed() {
        let header = HttpHeader::new("X-Empty", "").unwrap();
        assert_eq!(header.first_value(), "");
    }

    #[test]
    fn equality_ignores_name_case() {
        let lower = HttpHeader::with_values("content-type", ["a", "b"]).unwrap();
        let upper = HttpHeader::with_values("CONTENT-TYPE", ["a", "b"]).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(hash_of(&lower), hash_of(&upper));
    }

    #[test]
    fn equality_respects_value_order() {
        let first = HttpHeader::with_values("Accept", ["a", "b"]).unwrap();
        let second = HttpHeader::with_values("accept", ["b", "a"]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn headers_differing_in_case_collapse_in_a_set() {
        let set: HashSet<HttpHeader> = [
            HttpHeader::new("ETag", "\"v1\"").unwrap(),
            HttpHeader::new("etag", "\"v1\"").unwrap(),
            HttpHeader::new("etag", "\"v2\"").unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_lists_values() {
        let header = HttpHeader::with_values("Accept", ["a", "b"]).unwrap();
        assert_eq!(header.to_string(), "HttpHeader {Accept = [a, b]}");
    }

    #[test]
    fn append_merges_values_case_insensitively() {
        let mut headers = HttpHeaders::new();
        headers.append(HttpHeader::new("Accept", "text/html").unwrap());
        headers.append(HttpHeader::new("accept", "application/json").unwrap());

        assert_eq!(headers.len(), 1);
        let accept = headers.get("ACCEPT").unwrap();
        assert_eq!(accept.name(), "Accept");
        assert_eq!(accept.values(), ["text/html", "application/json"]);
    }

    #[test]
    fn insert_replaces_existing_header() {
        let mut headers = HttpHeaders::new();
        headers.append(HttpHeader::new("Content-Type", "application/json").unwrap());
        let previous = headers.insert(HttpHeader::new("content-type", "application/xml").unwrap());

        assert_eq!(previous.unwrap().first_value(), "application/json");
        assert_eq!(headers.get("Content-Type").unwrap().values(), ["application/xml"]);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn remove_and_contains() {
        let mut headers: HttpHeaders = [
            HttpHeader::new("Origin", "http://a").unwrap(),
            HttpHeader::new("Referer", "http://b").unwrap(),
        ]
        .into_iter()
        .collect();

        assert!(headers.contains("origin"));
        assert!(headers.remove("ORIGIN").is_some());
        assert!(!headers.contains("Origin"));
        assert!(headers.get("missing").is_none());
        assert_eq!(headers.iter().map(HttpHeader::name).collect::<Vec<_>>(), ["Referer"]);
    }
}
