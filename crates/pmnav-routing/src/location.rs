//! Location parsing and query string codec
//!
//! Query values are JSON encoded per key before form-urlencoding, so
//! `{status: "Active", page: 2}` becomes `status=%22Active%22&page=2`.

use crate::error::RouteError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use pmnav_model::{NavParams, ParamValue};
use url::form_urlencoded;
use url::Url;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path and query of a page location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Decoded path segments, empty segments dropped
    pub segments: Vec<String>,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
}

impl Location {
    /// Parse an absolute URL or a path with optional query and fragment
    ///
    /// # Errors
    /// `RouteError::InvalidLocation` when the input cannot be read as either.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(_) => Url::parse("http://localhost/")
                .and_then(|base| base.join(input))
                .map_err(|e| RouteError::InvalidLocation(format!("{input}: {e}")))?,
        };

        let segments = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|s| !s.is_empty())
                    .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            segments,
            query: url.query().map(str::to_string),
        })
    }

    /// Parameters carried by the query string
    #[must_use]
    pub fn query_params(&self) -> NavParams {
        self.query.as_deref().map(decode_query).unwrap_or_default()
    }
}

/// Encode parameters as `key=<json>` pairs
#[must_use]
pub fn encode_query<'a>(params: impl IntoIterator<Item = (&'a str, &'a ParamValue)>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, &value.to_json());
    }
    serializer.finish()
}

/// Decode a query string produced by [`encode_query`]
///
/// Values that are not JSON strings or numbers are kept as raw text, so
/// hand-typed links like `?status=Active` still work.
#[must_use]
pub fn decode_query(query: &str) -> NavParams {
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), ParamValue::from_json(&value)))
        .collect()
}

/// Escape a value for use as one path segment
#[must_use]
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_path_and_query() {
        let loc = Location::parse("/projects/?status=%22Active%22#top").unwrap();
        assert_eq!(loc.segments, vec!["projects"]);
        assert_eq!(loc.query.as_deref(), Some("status=%22Active%22"));
    }

    #[test]
    fn parses_absolute_url() {
        let loc = Location::parse("https://pm.example.com/projects/42").unwrap();
        assert_eq!(loc.segments, vec!["projects", "42"]);
        assert!(loc.query.is_none());
    }

    #[test]
    fn root_has_no_segments() {
        let loc = Location::parse("/").unwrap();
        assert!(loc.segments.is_empty());
    }

    #[test]
    fn query_values_are_json_encoded() {
        let params = NavParams::new().with("status", "Active").with("page", 2_i64);
        let query = encode_query(params.iter());
        assert_eq!(query, "status=%22Active%22&page=2");
        assert_eq!(decode_query(&query), params);
    }

    #[test]
    fn raw_query_values_survive() {
        let params = decode_query("status=Active&owner=J+Doe");
        assert_eq!(params.get("status"), Some(&ParamValue::from("Active")));
        assert_eq!(params.get("owner"), Some(&ParamValue::from("J Doe")));
    }

    #[test]
    fn segment_escapes_slash_and_space() {
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }
}
