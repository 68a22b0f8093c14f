//! Per-provider HTML synthesis.

use minijinja::{Value, context};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::classify::Provider;
use crate::entity::{EnclaveEntity, Embed};
use crate::error::RenderError;
use crate::size::normalize_size;
use crate::templates::{self, NO_IFRAME, QUAIL_AD};

/// Characters escaped in query parameter values we build.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

/// Quail widget layout rendered as an ad placeholder.
const AD_LAYOUT: &str = "ad";

/// Render an entity to an HTML fragment.
///
/// Framed providers render a plain link to the destination when the entity
/// has iframes disabled. Rendering is pure: the same entity always yields the
/// same bytes.
///
/// # Errors
///
/// Returns [`RenderError::Template`] if the provider template fails.
pub fn render(entity: &EnclaveEntity) -> Result<String, RenderError> {
    let provider = entity.provider();
    if entity.iframe_disabled() && provider.is_framed() {
        return render_no_iframe(entity);
    }

    match entity.embed() {
        Embed::YouTube { video_id } | Embed::Bilibili { video_id } => {
            render_template(provider.tag(), provider, context! { video_id => video_id })
        }
        Embed::Twitter { tweet_url, theme } => render_template(
            provider.tag(),
            provider,
            context! { tweet_url => tweet_url, theme => theme.as_str() },
        ),
        Embed::TradingView { symbol, theme } => render_template(
            provider.tag(),
            provider,
            context! {
                symbol => encode_query_value(symbol),
                theme => theme.as_str(),
            },
        ),
        Embed::DifyWidget { app_url } => {
            render_template(provider.tag(), provider, context! { app_url => app_url })
        }
        Embed::QuailWidget { layout, .. } if layout == AD_LAYOUT => {
            render_template(QUAIL_AD, provider, context! { ad_id => entity.object_id() })
        }
        Embed::QuailWidget { theme, layout, .. } => {
            let destination = entity.destination();
            let url = format!(
                "{}/widget?theme={}&layout={}&logged=ignore",
                destination.canonical(),
                theme.as_str(),
                encode_query_value(layout),
            );
            render_template(
                provider.tag(),
                provider,
                context! {
                    url => url,
                    theme => theme.as_str(),
                    height => quail_widget_height(destination.path(), layout),
                },
            )
        }
        Embed::QuailImage {
            src,
            width,
            height,
            align,
        } => render_template(
            provider.tag(),
            provider,
            context! {
                src => src,
                alt => entity.alt(),
                title => entity.title(),
                width => width.as_deref().map_or_else(|| "auto".to_owned(), normalize_size),
                height => height.as_deref().map_or_else(|| "auto".to_owned(), normalize_size),
                margin => align.margin(),
            },
        ),
        Embed::Spotify { track_id } => {
            render_template(provider.tag(), provider, context! { track_id => track_id })
        }
        Embed::Html5Audio { src } => render_template(
            provider.tag(),
            provider,
            context! { src => src, title => entity.title() },
        ),
    }
}

/// Link to the destination used when iframes are disabled.
fn render_no_iframe(entity: &EnclaveEntity) -> Result<String, RenderError> {
    let text = if entity.title().is_empty() {
        entity.object_id()
    } else {
        entity.title()
    };
    render_template(
        NO_IFRAME,
        entity.provider(),
        context! { url => entity.destination().canonical(), text => text },
    )
}

/// Frame height for a Quail widget.
///
/// Post cards have a fixed height; list widgets depend on the layout.
fn quail_widget_height(path: &str, layout: &str) -> &'static str {
    if path.contains("/p/") {
        "128px"
    } else {
        match layout {
            "subscribe_form" => "390px",
            "subscribe_form_mini" => "142px",
            _ => "auto",
        }
    }
}

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

fn render_template(name: &str, provider: Provider, ctx: Value) -> Result<String, RenderError> {
    templates::environment()
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|source| RenderError::Template {
            provider: provider.tag(),
            source,
        })
}
