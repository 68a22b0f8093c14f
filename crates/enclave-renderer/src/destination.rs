//! Parsed image destinations.

use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::ClassifyError;

/// Base used to resolve relative references such as `pic.png` or `//host/x`.
static RELATIVE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("relative:///").expect("static base URL is valid"));

/// An image destination: the string as written plus its parsed form.
///
/// Relative references are accepted and parsed against an internal base, so
/// host and path lookups work the same way for `https://a.com/x.png` and
/// `x.png`. The raw string is what ends up in rendered markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    raw: String,
    url: Url,
    relative: bool,
}

impl Destination {
    /// Parse a destination string.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::ControlCharacter`] if the string contains an
    /// ASCII control character and [`ClassifyError::UrlParse`] if it is not a
    /// valid URL or relative reference.
    pub fn parse(raw: &str) -> Result<Self, ClassifyError> {
        if raw.chars().any(|c| c.is_ascii_control()) {
            return Err(ClassifyError::ControlCharacter {
                url: raw.to_owned(),
            });
        }

        let (url, relative) = match Url::parse(raw) {
            Ok(url) => (url, false),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let url = RELATIVE_BASE.join(raw).map_err(|source| ClassifyError::UrlParse {
                    url: raw.to_owned(),
                    source,
                })?;
                (url, true)
            }
            Err(source) => {
                return Err(ClassifyError::UrlParse {
                    url: raw.to_owned(),
                    source,
                });
            }
        };

        Ok(Self {
            raw: raw.to_owned(),
            url,
            relative,
        })
    }

    /// Destination exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// URL scheme, empty for relative references.
    #[must_use]
    pub fn scheme(&self) -> &str {
        if self.relative { "" } else { self.url.scheme() }
    }

    /// Host name without port, empty when absent.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Host name followed by `:port` when an explicit port is present.
    #[must_use]
    pub fn authority(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{port}", self.host()),
            None => self.host().to_owned(),
        }
    }

    /// URL path (percent-encoded form).
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// URL path with percent-escapes decoded.
    #[must_use]
    pub fn decoded_path(&self) -> Cow<'_, str> {
        percent_decode_str(self.path()).decode_utf8_lossy()
    }

    /// First value of query parameter `name`.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// First non-empty value among the given query parameters, in order.
    #[must_use]
    pub fn query_any(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.query(name))
            .find(|value| !value.is_empty())
    }

    /// `scheme://host/path` with query string and fragment dropped.
    #[must_use]
    pub fn canonical(&self) -> String {
        let authority = self.authority();
        match (self.scheme(), authority.is_empty()) {
            ("", true) => self.path().to_owned(),
            ("", false) => format!("//{authority}{}", self.path()),
            (scheme, _) => format!("{scheme}://{authority}{}", self.path()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Destination {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let dest = Destination::parse("https://www.youtube.com/watch?v=abc&t=10").unwrap();
        assert_eq!(dest.scheme(), "https");
        assert_eq!(dest.host(), "www.youtube.com");
        assert_eq!(dest.path(), "/watch");
        assert_eq!(dest.query("v").as_deref(), Some("abc"));
        assert_eq!(dest.query("missing"), None);
    }

    #[test]
    fn test_parse_relative() {
        let dest = Destination::parse("images/pic.png?w=100").unwrap();
        assert_eq!(dest.scheme(), "");
        assert_eq!(dest.host(), "");
        assert_eq!(dest.path(), "/images/pic.png");
        assert_eq!(dest.query("w").as_deref(), Some("100"));
        assert_eq!(dest.as_str(), "images/pic.png?w=100");
    }

    #[test]
    fn test_parse_scheme_relative_keeps_host() {
        let dest = Destination::parse("//youtu.be/abc").unwrap();
        assert_eq!(dest.host(), "youtu.be");
        assert_eq!(dest.canonical(), "//youtu.be/abc");
    }

    #[test]
    fn test_decoded_path() {
        let dest = Destination::parse("https://youtu.be/ab%20c").unwrap();
        assert_eq!(dest.path(), "/ab%20c");
        assert_eq!(dest.decoded_path(), "/ab c");
    }

    #[test]
    fn test_parse_custom_scheme() {
        let dest = Destination::parse("dify://udify.app/chatbot/abc").unwrap();
        assert_eq!(dest.scheme(), "dify");
        assert_eq!(dest.host(), "udify.app");
        assert_eq!(dest.path(), "/chatbot/abc");
    }

    #[test]
    fn test_parse_invalid_port() {
        let err = Destination::parse("http://example.com:99999/a.png").unwrap_err();
        assert!(matches!(err, ClassifyError::UrlParse { .. }));
        assert!(err.to_string().contains("failed to parse url"));
    }

    #[test]
    fn test_parse_control_character() {
        let err = Destination::parse("https://example.com/\u{7f}a.png").unwrap_err();
        assert!(matches!(err, ClassifyError::ControlCharacter { .. }));
    }

    #[test]
    fn test_canonical_drops_query_and_fragment() {
        let dest = Destination::parse("https://quaily.com/list/p/post?theme=dark#top").unwrap();
        assert_eq!(dest.canonical(), "https://quaily.com/list/p/post");
    }

    #[test]
    fn test_canonical_keeps_port() {
        let dest = Destination::parse("http://localhost:8080/widget?x=1").unwrap();
        assert_eq!(dest.authority(), "localhost:8080");
        assert_eq!(dest.canonical(), "http://localhost:8080/widget");
    }

    #[test]
    fn test_query_any_skips_empty() {
        let dest = Destination::parse("https://a.com/x.png?w=&width=300").unwrap();
        assert_eq!(dest.query_any(&["w", "width"]).as_deref(), Some("300"));
    }
}
