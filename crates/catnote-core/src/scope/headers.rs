//! Owned snapshot of inbound request headers.

use std::collections::HashMap;

use crate::defaults::CATEGORY_HEADER;
use crate::error::ScopeError;
use crate::models::CategoryId;

/// Case-insensitive header snapshot taken from a live request.
///
/// Transport layers copy the headers they receive into this type, so the core
/// never depends on a particular HTTP stack. Repeated headers keep every
/// value in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: HashMap<String, Vec<String>>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.insert(name.as_ref(), value);
        }
        headers
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of a header sent exactly once. `None` when absent or repeated.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.get_all(name) {
            [value] => Some(value.as_str()),
            _ => None,
        }
    }

    /// Every value received for `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parse the category header. A repeated header is ambiguous and rejected.
    pub fn category_id(&self) -> Result<CategoryId, ScopeError> {
        match self.get_all(CATEGORY_HEADER) {
            [] => parse_category_id(None),
            [value] => parse_category_id(Some(value)),
            values => Err(ScopeError::InvalidHeader {
                header: CATEGORY_HEADER.to_string(),
                value: values.join(","),
            }),
        }
    }
}

/// Parse a raw category header value.
pub fn parse_category_id(raw: Option<&str>) -> Result<CategoryId, ScopeError> {
    let raw = raw.ok_or_else(|| ScopeError::MissingHeader(CATEGORY_HEADER.to_string()))?;
    raw.trim()
        .parse::<CategoryId>()
        .map_err(|_| ScopeError::InvalidHeader {
            header: CATEGORY_HEADER.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_case_insensitive() {
        let headers = RequestHeaders::new().with("CategoryId", "1");
        assert_eq!(headers.get("categoryid"), Some("1"));
        assert_eq!(headers.get("CATEGORYID"), Some("1"));
        assert_eq!(headers.get("other"), None);
    }

    #[test]
    fn test_repeated_category_header_is_rejected() {
        let headers = RequestHeaders::from_pairs([("categoryid", "1"), ("CategoryId", "999")]);
        assert_eq!(headers.get_all("CategoryId"), ["1", "999"]);
        assert_eq!(headers.get("CategoryId"), None);
        assert_eq!(
            headers.category_id(),
            Err(ScopeError::InvalidHeader {
                header: "CategoryId".to_string(),
                value: "1,999".to_string(),
            })
        );
    }

    #[test]
    fn test_repeated_identical_values_are_still_ambiguous() {
        let headers = RequestHeaders::new().with("CategoryId", "1").with("CategoryId", "1");
        assert!(matches!(
            headers.category_id(),
            Err(ScopeError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_parse_category_id_trims_whitespace() {
        assert_eq!(parse_category_id(Some(" 42 ")), Ok(42));
    }

    #[test]
    fn test_parse_category_id_missing() {
        assert_eq!(
            parse_category_id(None),
            Err(ScopeError::MissingHeader("CategoryId".to_string()))
        );
    }

    #[test]
    fn test_parse_category_id_non_numeric() {
        for raw in ["abc", "", "1.5", "99999999999"] {
            match parse_category_id(Some(raw)) {
                Err(ScopeError::InvalidHeader { value, .. }) => assert_eq!(value, raw),
                other => panic!("Expected InvalidHeader for {:?}, got {:?}", raw, other),
            }
        }
    }
}
