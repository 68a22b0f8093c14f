//! Embed markup templates.
//!
//! Templates are compiled once into a shared [`Environment`], keyed by the
//! provider tag. Values interpolated into markup go through the `attr` filter,
//! which escapes HTML special characters but leaves URLs readable.

use std::sync::LazyLock;

use minijinja::{AutoEscape, Environment};

/// Template for links rendered in place of iframes.
pub(crate) const NO_IFRAME: &str = "no-iframe";

/// Template for the Quail ad placeholder.
pub(crate) const QUAIL_AD: &str = "quail-ad";

const YOUTUBE_TPL: &str = r#"<iframe
	class="enclave-object youtube-enclave-object"
	src="https://www.youtube.com/embed/{{ video_id|attr }}"
	width="100%"
	height="400"
	title="YouTube video player"
	frameborder="0"
	allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share"
	referrerpolicy="strict-origin-when-cross-origin"
	allowfullscreen
></iframe>"#;

const BILIBILI_TPL: &str = r#"<iframe
	class="enclave-object bilibili-enclave-object"
	src="https://player.bilibili.com/player.html?bvid={{ video_id|attr }}&amp;page=1&amp;autoplay=0"
	width="100%"
	height="400"
	scrolling="no"
	frameborder="0"
	allowfullscreen
></iframe>"#;

const TWITTER_TPL: &str = r#"<blockquote class="twitter-tweet" data-theme="{{ theme }}">
	<a href="{{ tweet_url|attr }}"></a>
</blockquote>
<script async src="https://platform.twitter.com/widgets.js" charset="utf-8"></script>"#;

const TRADINGVIEW_TPL: &str = r#"<iframe
	class="enclave-object tradingview-enclave-object"
	src="https://s.tradingview.com/widgetembed/?symbol={{ symbol|attr }}&amp;interval=D&amp;theme={{ theme }}&amp;style=1&amp;locale=en"
	data-theme="{{ theme }}"
	width="100%"
	height="400"
	frameborder="0"
	allowtransparency="true"
	scrolling="no"
	allowfullscreen
></iframe>"#;

const DIFY_TPL: &str = r#"<iframe
	class="enclave-object dify-enclave-object"
	src="{{ app_url|attr }}"
	style="width: 100%; height: 100%; min-height: 700px"
	frameborder="0"
	allow="microphone"
></iframe>"#;

const QUAIL_WIDGET_TPL: &str = r#"<iframe
	src="{{ url|attr }}"
	data-theme="{{ theme }}"
	width="100%"
	height="{{ height }}"
	title="Quail Widget"
	frameborder="0"
	allow="web-share"
	allowfullscreen
></iframe>"#;

const QUAIL_AD_TPL: &str = r#"<div class="quail-ad-wrapper" style="width: 100%; height: auto; margin: 1rem 0; display: block">
	<div class="quail-ad" data-ad-uuid="{{ ad_id|attr }}" style="width: 100%; height: auto"></div>
</div>"#;

const QUAIL_IMAGE_TPL: &str = r#"<figure class="quail-image-wrapper" style="width: {{ width|attr }}; height: {{ height|attr }}; margin: {{ margin }}; display: block">
	<img src="{{ src|attr }}" alt="{{ alt|attr }}" style="width: 100%; height: auto" class="quail-image" />
	<figcaption class="quail-image-caption" style="display: block">{{ title|attr }}</figcaption>
</figure>"#;

const SPOTIFY_TPL: &str = r#"<iframe
	class="enclave-object spotify-enclave-object"
	style="border-radius: 12px"
	src="https://open.spotify.com/embed/track/{{ track_id|attr }}"
	width="100%"
	height="152"
	frameborder="0"
	allow="autoplay; clipboard-write; encrypted-media; fullscreen; picture-in-picture"
	loading="lazy"
></iframe>"#;

const HTML5_AUDIO_TPL: &str = r#"<audio class="enclave-object html5-audio-enclave-object" controls preload="metadata" src="{{ src|attr }}"{% if title %} title="{{ title|attr }}"{% endif %}></audio>"#;

const NO_IFRAME_TPL: &str =
    r#"<a class="enclave-link" href="{{ url|attr }}" target="_blank" rel="noopener noreferrer">{{ text|attr }}</a>"#;

/// All templates by name.
const TEMPLATES: [(&str, &str); 11] = [
    ("youtube", YOUTUBE_TPL),
    ("bilibili", BILIBILI_TPL),
    ("twitter", TWITTER_TPL),
    ("tradingview", TRADINGVIEW_TPL),
    ("dify", DIFY_TPL),
    ("quail-widget", QUAIL_WIDGET_TPL),
    ("quail-image", QUAIL_IMAGE_TPL),
    ("spotify", SPOTIFY_TPL),
    ("html5-audio", HTML5_AUDIO_TPL),
    (QUAIL_AD, QUAIL_AD_TPL),
    (NO_IFRAME, NO_IFRAME_TPL),
];

static ENVIRONMENT: LazyLock<Environment<'static>> =
    LazyLock::new(|| load().expect("built-in embed templates are valid"));

/// Shared template environment, compiled on first use.
pub(crate) fn environment() -> &'static Environment<'static> {
    &ENVIRONMENT
}

/// Compile every built-in template.
pub(crate) fn load() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("attr", attr_filter);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

fn attr_filter(value: String) -> String {
    escape_html(&value)
}

/// Escape HTML special characters for text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
