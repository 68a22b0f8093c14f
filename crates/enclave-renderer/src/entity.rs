//! Rendering-ready embed entities.

use crate::classify::{Classification, Provider, param};
use crate::destination::Destination;

/// Color scheme hint passed to embeddable widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Collapse a theme hint: exactly `"dark"` is dark, anything else light.
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        if hint == "dark" { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Horizontal placement of a captioned image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    /// Parse an alignment option; unknown values center the image.
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }

    /// CSS margin that places the figure.
    #[must_use]
    pub const fn margin(self) -> &'static str {
        match self {
            Self::Left => "0 auto 0 0",
            Self::Center => "0 auto",
            Self::Right => "0 0 0 auto",
        }
    }
}

/// Provider-specific embed data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Embed {
    YouTube {
        video_id: String,
    },
    Bilibili {
        video_id: String,
    },
    Twitter {
        tweet_url: String,
        theme: Theme,
    },
    TradingView {
        symbol: String,
        theme: Theme,
    },
    DifyWidget {
        app_url: String,
    },
    QuailWidget {
        widget_url: String,
        theme: Theme,
        /// Widget layout, empty for the default one.
        layout: String,
    },
    QuailImage {
        src: String,
        width: Option<String>,
        height: Option<String>,
        align: Align,
    },
    Spotify {
        track_id: String,
    },
    Html5Audio {
        src: String,
    },
}

impl Embed {
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            Self::YouTube { .. } => Provider::YouTube,
            Self::Bilibili { .. } => Provider::Bilibili,
            Self::Twitter { .. } => Provider::Twitter,
            Self::TradingView { .. } => Provider::TradingView,
            Self::DifyWidget { .. } => Provider::DifyWidget,
            Self::QuailWidget { .. } => Provider::QuailWidget,
            Self::QuailImage { .. } => Provider::QuailImage,
            Self::Spotify { .. } => Provider::Spotify,
            Self::Html5Audio { .. } => Provider::Html5Audio,
        }
    }

    /// Provider-specific identifier the embed was built from.
    #[must_use]
    pub fn object_id(&self) -> &str {
        match self {
            Self::YouTube { video_id } | Self::Bilibili { video_id } => video_id,
            Self::Twitter { tweet_url, .. } => tweet_url,
            Self::TradingView { symbol, .. } => symbol,
            Self::DifyWidget { app_url } => app_url,
            Self::QuailWidget { widget_url, .. } => widget_url,
            Self::QuailImage { src, .. } | Self::Html5Audio { src } => src,
            Self::Spotify { track_id } => track_id,
        }
    }
}

/// Pipeline-wide rendering flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render plain links instead of iframes.
    pub iframe_disabled: bool,
    /// Theme used when a destination carries no theme hint.
    pub default_theme: Theme,
}

/// A classified image ready for rendering.
///
/// Built once per matched image by [`EntityBuilder`] and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnclaveEntity {
    embed: Embed,
    destination: Destination,
    title: String,
    alt: String,
    iframe_disabled: bool,
}

impl EnclaveEntity {
    #[must_use]
    pub fn embed(&self) -> &Embed {
        &self.embed
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.embed.provider()
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        self.embed.object_id()
    }

    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Image title as written in the markdown.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Alt text reconstructed from the image's source.
    #[must_use]
    pub fn alt(&self) -> &str {
        &self.alt
    }

    #[must_use]
    pub fn iframe_disabled(&self) -> bool {
        self.iframe_disabled
    }
}

/// Combines classifier output with rendering flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityBuilder {
    options: RenderOptions,
}

impl EntityBuilder {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Build an entity from a classification.
    ///
    /// Returns `None` for [`Provider::RegularImage`], which is left to the
    /// regular image renderer.
    #[must_use]
    pub fn build(
        &self,
        classification: Classification,
        title: &str,
        alt: &str,
    ) -> Option<EnclaveEntity> {
        let theme = if classification.theme.is_empty() {
            self.options.default_theme
        } else {
            Theme::from_hint(&classification.theme)
        };
        let Classification {
            provider,
            object_id,
            mut params,
            destination,
            ..
        } = classification;

        let embed = match provider {
            Provider::YouTube => Embed::YouTube {
                video_id: object_id,
            },
            Provider::Bilibili => Embed::Bilibili {
                video_id: object_id,
            },
            Provider::Twitter => Embed::Twitter {
                tweet_url: object_id,
                theme,
            },
            Provider::TradingView => Embed::TradingView {
                symbol: object_id,
                theme,
            },
            Provider::DifyWidget => Embed::DifyWidget { app_url: object_id },
            Provider::QuailWidget => Embed::QuailWidget {
                widget_url: object_id,
                theme,
                layout: params.remove(param::LAYOUT).unwrap_or_default(),
            },
            Provider::QuailImage => Embed::QuailImage {
                src: object_id,
                width: params.remove(param::WIDTH),
                height: params.remove(param::HEIGHT),
                align: params
                    .get(param::ALIGN)
                    .map_or(Align::Center, |a| Align::from_hint(a)),
            },
            Provider::Spotify => Embed::Spotify {
                track_id: object_id,
            },
            Provider::Html5Audio => Embed::Html5Audio { src: object_id },
            Provider::RegularImage => return None,
        };

        Some(EnclaveEntity {
            embed,
            destination,
            title: title.to_owned(),
            alt: alt.to_owned(),
            iframe_disabled: self.options.iframe_disabled,
        })
    }
}
