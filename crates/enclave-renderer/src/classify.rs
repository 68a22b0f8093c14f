//! Image destination classification.
//!
//! Decides which embed provider (if any) an image reference targets and
//! extracts the provider's object id, theme hint and options.
//!
//! Providers are matched by an ordered rule table; the first rule whose
//! predicate accepts the destination wins. Destinations no rule accepts fall
//! back to generic image handling, which looks for caption and size hints.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::destination::Destination;
use crate::error::ClassifyError;

/// `|WIDTH` or `|WIDTHxHEIGHT` size suffix on a destination or alt text.
static SIZE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|(\d+)(?:x(\d+))?").unwrap());

/// `list-slug` or `list-slug/p/post-slug`.
static QUAIL_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+(?:/p/[A-Za-z0-9_-]+)?$").unwrap());

static SPOTIFY_TRACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^track/([A-Za-z0-9_-]+)$").unwrap());

/// Option names stored in [`Params`].
pub mod param {
    pub const LAYOUT: &str = "layout";
    pub const TITLE: &str = "title";
    pub const ALT: &str = "alt";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ALIGN: &str = "align";
}

/// String-keyed provider options.
pub type Params = BTreeMap<String, String>;

/// Embed provider selected for an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    YouTube,
    Bilibili,
    Twitter,
    TradingView,
    DifyWidget,
    QuailWidget,
    QuailImage,
    Spotify,
    Html5Audio,
    /// Plain image left to the regular image renderer.
    RegularImage,
}

impl Provider {
    /// Stable lowercase tag, also used as the template name.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Bilibili => "bilibili",
            Self::Twitter => "twitter",
            Self::TradingView => "tradingview",
            Self::DifyWidget => "dify",
            Self::QuailWidget => "quail-widget",
            Self::QuailImage => "quail-image",
            Self::Spotify => "spotify",
            Self::Html5Audio => "html5-audio",
            Self::RegularImage => "regular-image",
        }
    }

    /// Whether the provider's markup loads third-party content in a frame.
    ///
    /// These providers render a plain link instead when iframes are disabled.
    #[must_use]
    pub const fn is_framed(self) -> bool {
        matches!(
            self,
            Self::YouTube
                | Self::Bilibili
                | Self::Twitter
                | Self::TradingView
                | Self::DifyWidget
                | Self::QuailWidget
                | Self::Spotify
        )
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Provider {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Result of classifying an image destination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// Selected provider.
    pub provider: Provider,
    /// Provider-specific identifier; never empty.
    pub object_id: String,
    /// Raw theme hint from the destination, empty when absent.
    pub theme: String,
    /// Provider options.
    pub params: Params,
    /// Destination the embed refers to, with size suffixes removed.
    pub destination: Destination,
}

/// Fields produced by a rule's extractor.
#[derive(Default)]
struct Extracted {
    object_id: String,
    theme: String,
    params: Params,
}

impl Extracted {
    fn id(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            ..Self::default()
        }
    }

    fn with_theme(mut self, dest: &Destination) -> Self {
        self.theme = dest.query("theme").unwrap_or_default();
        self
    }
}

/// A provider rule: host/path predicate plus id extractor.
struct Rule {
    provider: Provider,
    matches: fn(&Destination) -> bool,
    extract: fn(&Destination) -> Extracted,
}

/// Provider rules in priority order.
static RULES: &[Rule] = &[
    Rule {
        provider: Provider::YouTube,
        matches: |d| d.host() == "www.youtube.com" && d.path() == "/watch",
        extract: |d| Extracted::id(d.query("v").unwrap_or_default()),
    },
    Rule {
        provider: Provider::YouTube,
        matches: |d| d.host() == "youtu.be",
        extract: |d| Extracted::id(d.decoded_path().trim_matches('/')),
    },
    Rule {
        provider: Provider::Bilibili,
        matches: |d| d.host() == "www.bilibili.com" && d.path().starts_with("/video/"),
        extract: |d| Extracted::id(d.decoded_path()["/video/".len()..].trim_matches('/')),
    },
    Rule {
        provider: Provider::Twitter,
        matches: |d| matches!(d.host(), "twitter.com" | "m.twitter.com" | "x.com"),
        extract: extract_tweet,
    },
    Rule {
        provider: Provider::TradingView,
        matches: |d| matches!(d.host(), "tradingview.com" | "www.tradingview.com"),
        extract: |d| Extracted::id(d.query("symbol").unwrap_or_default()).with_theme(d),
    },
    Rule {
        provider: Provider::DifyWidget,
        matches: |d| d.host() == "udify.app" || d.scheme() == "dify",
        extract: extract_dify,
    },
    Rule {
        provider: Provider::QuailWidget,
        matches: |d| matches!(d.host(), "quail.ink" | "dev.quail.ink" | "quaily.com"),
        extract: extract_quail_widget,
    },
    Rule {
        provider: Provider::Spotify,
        matches: |d| d.host() == "open.spotify.com",
        extract: extract_spotify_track,
    },
    Rule {
        provider: Provider::Html5Audio,
        matches: |d| d.path().to_ascii_lowercase().ends_with(".mp3"),
        extract: |d| Extracted::id(d.as_str()),
    },
];

/// Classify an image by its destination, title and reconstructed alt text.
///
/// Returns `Ok(None)` when nothing should change: a provider host matched but
/// no object id could be resolved, or the destination is empty.
///
/// # Errors
///
/// Returns [`ClassifyError`] if the destination cannot be parsed.
///
/// # Examples
///
/// ```
/// use enclave_renderer::{Provider, classify};
///
/// let c = classify("https://youtu.be/abc123/", None, "").unwrap().unwrap();
/// assert_eq!(c.provider, Provider::YouTube);
/// assert_eq!(c.object_id, "abc123");
/// ```
pub fn classify(
    destination: &str,
    title: Option<&str>,
    alt: &str,
) -> Result<Option<Classification>, ClassifyError> {
    let dest = Destination::parse(destination)?;

    let classification = match RULES.iter().find(|rule| (rule.matches)(&dest)) {
        Some(rule) => {
            let extracted = (rule.extract)(&dest);
            if extracted.object_id.is_empty() {
                tracing::debug!(
                    provider = %rule.provider,
                    destination,
                    "Provider matched without object id"
                );
                return Ok(None);
            }
            Classification {
                provider: rule.provider,
                object_id: extracted.object_id,
                theme: extracted.theme,
                params: extracted.params,
                destination: dest,
            }
        }
        None => match classify_image(&dest, title.unwrap_or_default(), alt) {
            Some(classification) => classification,
            None => return Ok(None),
        },
    };

    tracing::debug!(
        provider = %classification.provider,
        object_id = %classification.object_id,
        "Classified image"
    );
    Ok(Some(classification))
}

fn extract_tweet(dest: &Destination) -> Extracted {
    // Twitter's widget does not accept x.com status links.
    let url = if dest.host() == "x.com" {
        dest.as_str().replacen("x.com", "twitter.com", 1)
    } else {
        dest.as_str().to_owned()
    };
    Extracted::id(url).with_theme(dest)
}

fn extract_dify(dest: &Destination) -> Extracted {
    if dest.scheme() == "dify" {
        Extracted::id(format!("https://{}{}", dest.authority(), dest.path()))
    } else {
        Extracted::id(dest.as_str())
    }
}

fn extract_quail_widget(dest: &Destination) -> Extracted {
    let Some(path) = trimmed_path(dest) else {
        return Extracted::default();
    };
    if !QUAIL_PATH_RE.is_match(path) {
        return Extracted::default();
    }

    let mut extracted = Extracted::id(dest.as_str()).with_theme(dest);
    if let Some(layout) = dest.query("layout").filter(|l| !l.is_empty()) {
        extracted.params.insert(param::LAYOUT.to_owned(), layout);
    }
    extracted
}

fn extract_spotify_track(dest: &Destination) -> Extracted {
    trimmed_path(dest)
        .and_then(|path| SPOTIFY_TRACK_RE.captures(path))
        .map(|caps| Extracted::id(&caps[1]))
        .unwrap_or_default()
}

/// Path without its leading slash and surrounding slashes, if non-trivial.
fn trimmed_path(dest: &Destination) -> Option<&str> {
    let path = dest.path();
    (path.len() > 1).then(|| path[1..].trim_matches('/'))
}

/// Generic image handling: caption and size hints.
///
/// Size hints come from the `w`/`width` and `h`/`height` query parameters, then
/// from a `|WxH` suffix on the destination, then from the same suffix in the
/// alt text; later sources override earlier ones. Only the destination's own
/// suffix is stripped from it.
fn classify_image(dest: &Destination, title: &str, alt: &str) -> Option<Classification> {
    let mut width = dest.query_any(&["w", "width"]).unwrap_or_default();
    let mut height = dest.query_any(&["h", "height"]).unwrap_or_default();

    let mut source = dest.as_str();
    if let Some(pipe) = source.find('|') {
        apply_size_suffix(source, &mut width, &mut height);
        source = &source[..pipe];
    }
    apply_size_suffix(alt, &mut width, &mut height);

    let trimmed = match Destination::parse(source) {
        Ok(trimmed) => trimmed,
        Err(err) => {
            tracing::debug!(error = %err, "Trimmed destination no longer parses");
            return None;
        }
    };
    if source.is_empty() {
        return None;
    }

    if title.is_empty() && width.is_empty() && height.is_empty() {
        return Some(Classification {
            provider: Provider::RegularImage,
            object_id: source.to_owned(),
            theme: String::new(),
            params: Params::new(),
            destination: trimmed,
        });
    }

    let mut params = Params::new();
    let align = dest.query("align").unwrap_or_default();
    for (key, value) in [
        (param::TITLE, title),
        (param::ALT, alt),
        (param::WIDTH, width.as_str()),
        (param::HEIGHT, height.as_str()),
        (param::ALIGN, align.as_str()),
    ] {
        if !value.is_empty() {
            params.insert(key.to_owned(), value.to_owned());
        }
    }

    Some(Classification {
        provider: Provider::QuailImage,
        object_id: source.to_owned(),
        theme: String::new(),
        params,
        destination: trimmed,
    })
}

/// Apply the first `|W` / `|WxH` suffix found in `text`.
///
/// A bare `|W` clears any previously found height.
fn apply_size_suffix(text: &str, width: &mut String, height: &mut String) {
    if let Some(caps) = SIZE_SUFFIX_RE.captures(text) {
        caps[1].clone_into(width);
        *height = caps.get(2).map_or_else(String::new, |h| h.as_str().to_owned());
    }
}
